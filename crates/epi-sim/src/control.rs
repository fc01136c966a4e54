//! Run control: cooperative abort and the run outcome.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use epi_core::Tick;

/// Shared flag checked between ticks.  Clone it into another thread (or a
/// signal handler) and call [`abort`](Self::abort); the run stops before
/// the next tick starts.  A tick in progress always completes.
#[derive(Clone, Debug, Default)]
pub struct AbortHandle(Arc<AtomicBool>);

impl AbortHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn abort(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// How a run ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RunStatus {
    Completed,
    /// Stopped before tick `at` was processed.
    Aborted { at: Tick },
}
