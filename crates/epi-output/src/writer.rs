//! Backend seam between [`OutputObserver`](crate::OutputObserver) and a file format.

use crate::{AgentStateRow, DiseaseResultRow, OutputResult, TickSummaryRow};

/// One sink per run.  The observer keeps the first error a writer returns;
/// see [`OutputObserver::take_error`][crate::OutputObserver::take_error].
pub trait OutputWriter {
    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()>;

    /// Write one tick's counts for every disease.
    fn write_disease_results(&mut self, rows: &[DiseaseResultRow]) -> OutputResult<()>;

    /// Write a batch of per-agent states.
    fn write_agent_states(&mut self, rows: &[AgentStateRow]) -> OutputResult<()>;

    /// Flush everything.  Calling it again is a no-op.
    fn finish(&mut self) -> OutputResult<()>;
}
