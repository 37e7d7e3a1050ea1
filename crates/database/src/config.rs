use log::warn;
use std::env;

/// Database used when `DATABASE_URL` is not set
pub const DEFAULT_DATABASE_URL: &str = "sqlite://prereqs.db?mode=rwc";

/// Connection settings, built once at startup and passed to whoever needs them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub database_url: String,
}

impl DbConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
        }
    }

    /// Reads `DATABASE_URL` from the environment (and `.env`, if present)
    pub fn from_env() -> Self {
        // A missing .env file is fine; the variable may come from the shell
        let _ = dotenvy::dotenv();

        match env::var("DATABASE_URL") {
            Ok(url) => Self::new(url),
            Err(_) => {
                warn!("DATABASE_URL not set, falling back to {DEFAULT_DATABASE_URL}");
                Self::default()
            }
        }
    }

    /// The URL scheme, safe to log without leaking credentials
    pub fn backend(&self) -> &str {
        self.database_url
            .split_once(':')
            .map_or("unknown", |(scheme, _)| scheme)
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATABASE_URL)
    }
}
