use crate::config::DbConfig;
use log::info;
use sea_orm::{Database, DatabaseConnection, DbErr};

/// Creates a database connection
pub async fn create_connection(config: &DbConfig) -> Result<DatabaseConnection, DbErr> {
    info!("Connecting to {} database", config.backend());
    Database::connect(&config.database_url).await
}
