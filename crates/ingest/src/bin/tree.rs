use clap::Parser;
use database::{config::DbConfig, db::create_connection, services::prereq::PrereqService};
use ingest::loader::{IngestError, table_from_dir};
use models::expand;
use std::{path::PathBuf, process::ExitCode};

/// Print the full prerequisite tree of a course
#[derive(Debug, Parser)]
struct Args {
    /// Course to expand, e.g. CSE100
    course_id: String,

    /// Read scraped JSON files from this directory instead of the database
    #[arg(long, value_name = "DIR")]
    from_json: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<ExitCode, IngestError> {
    env_logger::init();
    let args = Args::parse();
    let course_id = args.course_id.to_uppercase();

    let table = match &args.from_json {
        Some(dir) => table_from_dir(dir)?,
        None => {
            let db = create_connection(&DbConfig::from_env()).await?;
            PrereqService::reachable_table(&db, &course_id).await?
        }
    };

    let tree = expand(&course_id, &table);
    if tree.groups.is_empty() {
        eprintln!("No prerequisites recorded for {course_id}.");
        return Ok(ExitCode::FAILURE);
    }

    println!("=== Prerequisite tree for {course_id} ===\n");
    print!("{tree}");

    Ok(ExitCode::SUCCESS)
}
