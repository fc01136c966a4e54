//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` via `From`,
//! so a malformed distribution surfaces as that crate's configuration error.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `epi-core`.
pub type CoreResult<T> = Result<T, CoreError>;
