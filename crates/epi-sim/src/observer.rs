//! Per-tick reports and the observer hooks that receive them.

use epi_core::Tick;
use epi_disease::{Disease, DiseaseCounts};
use epi_intervention::Delivered;

use crate::Population;

/// Everything that happened in one tick, assembled after new infections
/// have been scheduled.
#[derive(Clone, Debug)]
pub struct TickReport {
    pub tick:          Tick,
    /// Model time at the start of the tick.
    pub model_time:    f64,
    pub n_alive:       usize,
    pub births:        usize,
    /// All agents removed this tick, whatever the cause.
    pub deaths:        usize,
    /// Per disease, in registration order.
    pub diseases:      Vec<(String, DiseaseCounts)>,
    /// Interventions that were due this tick.
    pub interventions: Vec<Delivered>,
}

impl TickReport {
    pub fn disease(&self, name: &str) -> Option<&DiseaseCounts> {
        self.diseases.iter().find(|(n, _)| n == name).map(|(_, c)| c)
    }
}

/// Hooks into the tick loop of [`Sim::run`][crate::Sim::run].  Every hook
/// has an empty default, so an observer implements only the ones it needs.
///
/// ```rust,ignore
/// /// Prints prevalence once per simulated week.
/// struct WeeklyPrevalence;
///
/// impl SimObserver for WeeklyPrevalence {
///     fn on_tick_end(&mut self, report: &TickReport) {
///         if report.tick.0 % 7 == 0 {
///             let sir = report.disease("sir").map_or(0.0, |c| c.prevalence);
///             println!("{}: prevalence {sir:.3}", report.tick);
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Before demographics run for `tick`.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called at the end of each tick with that tick's aggregate counts.
    fn on_tick_end(&mut self, _report: &TickReport) {}

    /// After `on_tick_end` on ticks divisible by
    /// `config.output_interval_ticks`, with read-only access to the
    /// population and every disease's columns.
    fn on_snapshot(&mut self, _tick: Tick, _population: &Population, _diseases: &[Disease]) {}

    /// Called once when the run stops, whether it completed or was aborted.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// Ignores every hook.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

/// Keeps every [`TickReport`] in memory.
#[derive(Default)]
pub struct ReportLog {
    pub reports: Vec<TickReport>,
}

impl SimObserver for ReportLog {
    fn on_tick_end(&mut self, report: &TickReport) {
        self.reports.push(report.clone());
    }
}
