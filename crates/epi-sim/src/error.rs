use thiserror::Error;

use epi_core::{CoreError, Tick};
use epi_disease::DiseaseError;
use epi_intervention::InterventionError;
use epi_network::NetworkError;
use epi_state::StateError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("{what} length {got} does not match agent count {expected}")]
    AgentCountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    /// Per-tick verification found inconsistent state.
    #[error("invariant violated: {0}")]
    Invariant(String),

    /// A module failed mid-run.  The run stops at the end of this tick's
    /// failed phase; nothing is retried.
    #[error("module '{module}' failed at {tick}: {source}")]
    Step {
        tick:   Tick,
        module: String,
        #[source]
        source: Box<SimError>,
    },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Disease(#[from] DiseaseError),

    #[error(transparent)]
    Intervention(#[from] InterventionError),
}

impl SimError {
    /// Wrap a module error with where it happened.
    pub fn at(tick: Tick, module: &str, err: impl Into<SimError>) -> Self {
        SimError::Step { tick, module: module.to_owned(), source: Box::new(err.into()) }
    }
}

pub type SimResult<T> = Result<T, SimError>;
