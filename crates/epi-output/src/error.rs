//! Error types for epi-output.

use thiserror::Error;

use epi_state::StateError;

/// Errors that can occur when collecting or writing simulation output.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("reading agent states: {0}")]
    State(#[from] StateError),

    #[error("unknown result '{0}'")]
    UnknownResult(String),

    #[error("cannot resample: {0}")]
    Resample(String),
}

/// Alias for `Result<T, OutputError>`.
pub type OutputResult<T> = Result<T, OutputError>;
