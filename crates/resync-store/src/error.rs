//! Error types for snapshot access.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or querying a snapshot.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("required snapshot file '{0}' is missing")]
    MissingFile(String),
    #[error("snapshot file '{file}' is missing column '{column}'")]
    MissingColumn { file: String, column: String },
}

pub type Result<T> = std::result::Result<T, StoreError>;
