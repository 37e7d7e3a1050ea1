mod config;
mod doc;
mod dtos;
mod routes;
mod state;
mod utils;

use config::ServerConfig;
use database::{config::DbConfig, db::create_connection};
use log::info;
use state::AppState;
use utils::shutdown::shutdown_signal;

#[tokio::main]
async fn main() {
    // A missing .env file is fine; variables may come from the shell
    let _ = dotenvy::dotenv();
    env_logger::init();

    let config = ServerConfig::from_env();
    let db = create_connection(&DbConfig::from_env())
        .await
        .expect("Failed to connect to database");

    let app = routes::router(AppState { db });

    let listener = tokio::net::TcpListener::bind(&config.addr)
        .await
        .expect("Failed to bind listener");
    info!("Running axum on http://{}", config.addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}
