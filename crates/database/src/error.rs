use models::ValidationError;
use sea_orm::DbErr;
use thiserror::Error;

/// Errors returned by the prerequisite store
#[derive(Debug, Error)]
pub enum StoreError {
    /// The input was rejected before anything was written
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The database failed; any open transaction was rolled back
    #[error("storage error: {0}")]
    Storage(#[from] DbErr),
}
