//! `OutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use tracing::warn;

use epi_core::Tick;
use epi_disease::Disease;
use epi_sim::{Population, SimObserver, TickReport};

use crate::row::{AgentStateRow, DiseaseResultRow, TickSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes tick summaries, per-disease counts and
/// agent-state snapshots to any [`OutputWriter`] backend (CSV, SQLite, …).
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct OutputObserver<W: OutputWriter> {
    writer:     W,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> OutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                warn!(error = %e, "output write failed");
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for OutputObserver<W> {
    fn on_tick_end(&mut self, report: &TickReport) {
        let result = self.writer.write_tick_summary(&TickSummaryRow::from(report));
        self.store_err(result);
        let result = self.writer.write_disease_results(&DiseaseResultRow::from_report(report));
        self.store_err(result);
    }

    fn on_snapshot(&mut self, tick: Tick, population: &Population, diseases: &[Disease]) {
        let result = AgentStateRow::snapshot(tick.0, population, diseases)
            .and_then(|rows| self.writer.write_agent_states(&rows));
        self.store_err(result);
    }

    fn on_sim_end(&mut self, _final_tick: Tick) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}

/// Drive two observers from one run, e.g. a writer and a
/// [`ResultsObserver`][crate::ResultsObserver].
pub struct Both<A, B>(pub A, pub B);

impl<A: SimObserver, B: SimObserver> SimObserver for Both<A, B> {
    fn on_tick_start(&mut self, tick: Tick) {
        self.0.on_tick_start(tick);
        self.1.on_tick_start(tick);
    }

    fn on_tick_end(&mut self, report: &TickReport) {
        self.0.on_tick_end(report);
        self.1.on_tick_end(report);
    }

    fn on_snapshot(&mut self, tick: Tick, population: &Population, diseases: &[Disease]) {
        self.0.on_snapshot(tick, population, diseases);
        self.1.on_snapshot(tick, population, diseases);
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        self.0.on_sim_end(final_tick);
        self.1.on_sim_end(final_tick);
    }
}
