use clap::Parser;
use database::{config::DbConfig, db::create_connection, services::prereq::PrereqService};
use ingest::{
    loader::{IngestError, load_dir},
    util::DEFAULT_DATA_DIR,
};
use log::info;
use migration::{Migrator, MigratorTrait};
use std::path::PathBuf;

/// Load scraped prerequisite records into the database
#[derive(Debug, Parser)]
struct Args {
    /// Directory holding the scraped `*.json` files
    #[arg(long, env = "DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), IngestError> {
    env_logger::init();
    let args = Args::parse();
    let config = DbConfig::from_env();

    let db = create_connection(&config).await?;
    Migrator::up(&db, None).await?;

    info!("Loading records from {}", args.data_dir.display());
    let summary = load_dir(&db, &args.data_dir).await?;
    let counts = PrereqService::counts(&db).await?;

    println!(
        "\nDone. {} files, {} records ({} rejected). {} courses, {} prereq groups, {} options",
        summary.files,
        summary.ingested,
        summary.rejected,
        counts.courses,
        counts.groups,
        counts.options
    );

    Ok(())
}
