use crate::util::{file_name, json_files};
use database::{StoreError, services::prereq::PrereqService};
use log::{info, warn};
use models::{CourseRecord, PrereqTable};
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use sea_orm::{DatabaseConnection, DbErr};
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Errors raised while loading scraped files
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("malformed records in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

/// Outcome of loading one or more files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub files: usize,
    pub ingested: usize,
    pub rejected: usize,
}

/// Reads the course records from a single JSON file
///
/// # Arguments
/// * `path` - A file holding a JSON array of course records
///
/// # Returns
/// The parsed records, in file order
pub fn read_records(path: &Path) -> Result<Vec<CourseRecord>, IngestError> {
    let text = fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.to_owned(),
        source,
    })?;

    serde_json::from_str(&text).map_err(|source| IngestError::Json {
        path: path.to_owned(),
        source,
    })
}

/// Reads every JSON file in a directory, parsing them in parallel
///
/// # Returns
/// One entry per file, sorted by file name
pub fn read_dir(dir: &Path) -> Result<Vec<(PathBuf, Vec<CourseRecord>)>, IngestError> {
    let files = json_files(dir).map_err(|source| IngestError::Io {
        path: dir.to_owned(),
        source,
    })?;

    files
        .into_par_iter()
        .map(|path| read_records(&path).map(|records| (path, records)))
        .collect()
}

/// Builds an in-memory lookup directly from the JSON files in a directory
///
/// Invalid records are logged and skipped.
pub fn table_from_dir(dir: &Path) -> Result<PrereqTable, IngestError> {
    let records = read_dir(dir)?
        .into_iter()
        .flat_map(|(_, records)| records);

    let (table, rejected) = PrereqTable::from_records(records);
    for (record, e) in &rejected {
        warn!("Skipping {} ({}): {e}", record.course_id, record.term);
    }

    info!("Loaded {} courses from {}", table.len(), dir.display());
    Ok(table)
}

/// Stores a batch of records, skipping the ones that fail validation
///
/// Storage errors abort the batch. Records already stored stay committed,
/// since each record is written in its own transaction.
pub async fn load_records(
    db: &DatabaseConnection,
    records: &[CourseRecord],
) -> Result<LoadSummary, IngestError> {
    let mut summary = LoadSummary::default();

    for record in records {
        match PrereqService::ingest_record(db, record).await {
            Ok(()) => summary.ingested += 1,
            Err(StoreError::Validation(e)) => {
                warn!("Skipping {} ({}): {e}", record.course_id, record.term);
                summary.rejected += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(summary)
}

/// Loads every JSON file in `dir` into the store
pub async fn load_dir(db: &DatabaseConnection, dir: &Path) -> Result<LoadSummary, IngestError> {
    let files = read_dir(dir)?;
    let total = files.len();
    let mut summary = LoadSummary::default();

    for (idx, (path, records)) in files.iter().enumerate() {
        info!("[{}/{}] {}", idx + 1, total, file_name(path));

        let loaded = load_records(db, records).await?;
        summary.files += 1;
        summary.ingested += loaded.ingested;
        summary.rejected += loaded.rejected;
    }

    Ok(summary)
}
