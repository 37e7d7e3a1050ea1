use std::env;

/// Address used when `SERVER_ADDR` is not set
pub const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: String,
}

impl ServerConfig {
    /// Reads `SERVER_ADDR`, expecting `.env` to have been loaded already
    pub fn from_env() -> Self {
        Self {
            addr: env::var("SERVER_ADDR").unwrap_or_else(|_| DEFAULT_SERVER_ADDR.to_string()),
        }
    }
}
