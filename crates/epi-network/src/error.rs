//! Network error type.

use thiserror::Error;

use epi_core::{CoreError, Uid};

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("edge references unknown agent {0}")]
    InvalidUid(Uid),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type NetworkResult<T> = Result<T, NetworkError>;
