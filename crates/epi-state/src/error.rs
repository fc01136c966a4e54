use epi_core::Uid;
use thiserror::Error;

use crate::StateKind;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("invalid uid {0}: unknown or already removed")]
    InvalidUid(Uid),

    #[error("unknown state '{0}'")]
    UnknownState(String),

    #[error("state '{0}' is already defined")]
    DuplicateState(String),

    #[error("state '{name}' has dtype {found:?}, requested {expected:?}")]
    TypeMismatch { name: String, expected: StateKind, found: StateKind },

    #[error("state '{name}': {expected} uids but {got} values")]
    LengthMismatch { name: String, expected: usize, got: usize },
}

pub type StateResult<T> = Result<T, StateError>;
