//! Disease error type.

use thiserror::Error;

use epi_core::{CoreError, Tick, Uid};
use epi_state::StateError;

#[derive(Debug, Error)]
pub enum DiseaseError {
    #[error("configuration error: {0}")]
    Config(String),

    /// A sampled duration or probability that cannot be scheduled.
    #[error("invalid prognosis for {uid} at {tick}: {field} = {value}")]
    InvalidPrognosis { uid: Uid, tick: Tick, field: &'static str, value: f64 },

    /// Mutually exclusive compartments would be (or are) set together.
    #[error("invalid state transition for {uid}: {detail}")]
    InvalidStateTransition { uid: Uid, detail: String },

    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type DiseaseResult<T> = Result<T, DiseaseError>;
