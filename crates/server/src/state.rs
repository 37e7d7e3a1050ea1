use sea_orm::DatabaseConnection;

/// Shared handler state; the connection is a pool, so cloning is cheap
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
}
