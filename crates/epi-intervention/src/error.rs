use thiserror::Error;

use epi_disease::DiseaseError;
use epi_state::StateError;

#[derive(Debug, Error)]
pub enum InterventionError {
    #[error("intervention '{name}': {reason}")]
    Config { name: String, reason: String },

    #[error(transparent)]
    Disease(#[from] DiseaseError),

    #[error(transparent)]
    State(#[from] StateError),
}

pub type InterventionResult<T> = Result<T, InterventionError>;
