//! The `Sim` struct and its tick loop.

use tracing::{debug, info, trace, warn};

use epi_core::{DrawStream, SimClock, SimConfig, StepContext, Tick, Uid};
use epi_disease::Disease;
use epi_intervention::InterventionEngine;
use epi_network::ContactNetwork;

use crate::{AbortHandle, Demographics, Population, RunStatus, SimError, SimObserver, SimResult, TickReport};

/// Module name used in errors raised by the intervention phase as a whole.
const INTERVENTIONS: &str = "interventions";

/// The main simulation runner.
///
/// `Sim` owns every module and drives a strictly sequential tick:
///
/// 1. **Demographics**: births are appended to every store; background
///    deaths are collected as removal requests.
/// 2. **Disease progression**: each disease runs its transition pipeline in
///    registration order and returns its own death requests.
/// 3. **Death resolution**: the union of requests is removed from the
///    population, every disease and every network.
/// 4. **Networks** update their edges for the surviving agents.
/// 5. **Interventions** are delivered in registration order.
/// 6. **Transmission**: each disease evaluates its edges and schedules
///    prognoses for the new cases.
/// 7. **Verification** (optional), ageing and reporting.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim {
    /// Global configuration (agent count, steps, `dt`, seed, …).
    pub config: SimConfig,

    /// Simulation clock: the current tick and its model time.
    pub clock: SimClock,

    /// Keyed draws for the whole run, derived from `config.seed`.
    pub draws: DrawStream,

    pub population: Population,

    /// Diseases in registration order.
    pub diseases: Vec<Disease>,

    /// Contact networks in registration order.  The position of a network
    /// in this list is part of its transmission draw keys.
    pub networks: Vec<Box<dyn ContactNetwork>>,

    pub interventions: InterventionEngine,

    pub demographics: Vec<Box<dyn Demographics>>,

    pub(crate) abort: AbortHandle,
}

impl Sim {
    // ── Public API ────────────────────────────────────────────────────────

    /// A handle that stops [`run`](Self::run) before its next tick.
    pub fn abort_handle(&self) -> AbortHandle {
        self.abort.clone()
    }

    pub fn disease(&self, name: &str) -> Option<&Disease> {
        self.diseases.iter().find(|d| d.name() == name)
    }

    pub fn network(&self, name: &str) -> Option<&dyn ContactNetwork> {
        self.networks.iter().find(|n| n.name() == name).map(|n| &**n)
    }

    /// Run the simulation from the current tick to `config.end_tick()`.
    ///
    /// Calls observer hooks at every tick boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    /// An error aborts the run immediately; the state of the tick that failed
    /// is partially applied and should not be inspected for results.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<RunStatus> {
        let end = self.config.end_tick();
        info!(
            agents = self.population.n_alive(),
            from = self.clock.current_tick.0,
            to = end.0,
            dt = self.config.dt,
            seed = self.config.seed,
            "run started"
        );
        loop {
            let now = self.clock.current_tick;
            if now >= end {
                break;
            }
            if self.abort.is_aborted() {
                warn!(tick = now.0, "run aborted");
                observer.on_sim_end(now);
                return Ok(RunStatus::Aborted { at: now });
            }
            self.advance(now, observer)?;
        }
        observer.on_sim_end(self.clock.current_tick);
        info!(tick = self.clock.current_tick.0, alive = self.population.n_alive(), "run completed");
        Ok(RunStatus::Completed)
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    ///
    /// Useful for tests and incremental stepping.  Does not call
    /// `on_sim_end`.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<RunStatus> {
        for _ in 0..n {
            let now = self.clock.current_tick;
            if self.abort.is_aborted() {
                warn!(tick = now.0, "run aborted");
                return Ok(RunStatus::Aborted { at: now });
            }
            self.advance(now, observer)?;
        }
        Ok(RunStatus::Completed)
    }

    fn advance<O: SimObserver>(&mut self, now: Tick, observer: &mut O) -> SimResult<()> {
        observer.on_tick_start(now);
        let report = self.process_tick(now)?;
        observer.on_tick_end(&report);
        if self.config.output_interval_ticks > 0 && now.0.is_multiple_of(self.config.output_interval_ticks) {
            observer.on_snapshot(now, &self.population, &self.diseases);
        }
        self.clock.advance();
        Ok(())
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn process_tick(&mut self, now: Tick) -> SimResult<TickReport> {
        // Explicit field borrows so the borrow checker sees disjoint access.
        let Sim { config, clock, draws, population, diseases, networks, interventions, demographics, .. } = self;
        let ctx = StepContext::new(now, config.dt, draws);

        // ── Phase 1: demographics ─────────────────────────────────────────
        let mut births = 0;
        let mut requests: Vec<Uid> = Vec::new();
        for module in demographics.iter_mut() {
            let n_new = module.births(ctx, population);
            if n_new > 0 {
                let uids = population.add_agents(&vec![0.0; n_new])?;
                for disease in diseases.iter_mut() {
                    disease.add_agents(n_new);
                }
                for network in networks.iter_mut() {
                    network.add_agents(&uids);
                }
                births += n_new;
            }
            let dying = module.deaths(ctx, population).map_err(|e| SimError::at(now, module.name(), e))?;
            requests.extend(dying);
        }

        // ── Phase 2: disease progression ──────────────────────────────────
        for disease in diseases.iter_mut() {
            let dying = disease.step_state(ctx).map_err(|e| SimError::at(now, disease.name(), e))?;
            requests.extend(dying);
        }

        // ── Phase 3: death resolution ─────────────────────────────────────
        //
        // An agent requested by several modules dies once.  Every disease
        // sees the same removal list, after all of them have progressed.
        requests.sort_unstable();
        requests.dedup();
        let deaths = requests;
        if !deaths.is_empty() {
            population.remove_agents(&deaths).map_err(|e| SimError::at(now, "population", e))?;
            for disease in diseases.iter_mut() {
                disease.step_die(now, &deaths).map_err(|e| SimError::at(now, disease.name(), e))?;
            }
            for network in networks.iter_mut() {
                network.remove_agents(&deaths);
            }
            trace!(tick = now.0, deaths = deaths.len(), "deaths resolved");
        }

        // ── Phase 4: networks ─────────────────────────────────────────────
        let alive = population.alive();
        for network in networks.iter_mut() {
            network.step(ctx, &alive).map_err(|e| SimError::at(now, network.name(), e))?;
        }

        // ── Phase 5: interventions ────────────────────────────────────────
        let ages = population.ages()?;
        let delivered = interventions
            .apply(ctx, diseases, ages)
            .map_err(|e| SimError::at(now, INTERVENTIONS, e))?;

        // ── Phase 6: transmission ─────────────────────────────────────────
        for disease in diseases.iter_mut() {
            let cases = disease
                .make_new_cases(ctx, networks)
                .map_err(|e| SimError::at(now, disease.name(), e))?;
            disease
                .set_prognoses(ctx, &cases.uids, &cases.sources)
                .map_err(|e| SimError::at(now, disease.name(), e))?;
        }

        // ── Phase 7: verification, results, ageing ────────────────────────
        let mut counts = Vec::with_capacity(diseases.len());
        for disease in diseases.iter() {
            if config.verify_invariants {
                verify(now, disease, population)?;
            }
            let c = disease.counts().map_err(|e| SimError::at(now, disease.name(), e))?;
            counts.push((disease.name().to_owned(), c));
        }
        population.age_by(config.dt)?;

        let report = TickReport {
            tick:          now,
            model_time:    clock.model_time_at(now),
            n_alive:       population.n_alive(),
            births,
            deaths:        deaths.len(),
            diseases:      counts,
            interventions: delivered,
        };
        debug!(
            tick = now.0,
            alive = report.n_alive,
            births,
            deaths = report.deaths,
            new_infections = report.diseases.iter().map(|(_, c)| c.new_infections).sum::<usize>(),
            "tick complete"
        );
        Ok(report)
    }
}

/// Compartment exclusivity, conservation, and lockstep growth of the
/// disease store with the population.
fn verify(now: Tick, disease: &Disease, population: &Population) -> SimResult<()> {
    let fail = |detail: String| SimError::at(now, disease.name(), SimError::Invariant(detail));
    disease.check_compartments().map_err(|e| SimError::at(now, disease.name(), e))?;
    let states = disease.states();
    if states.len() != population.len() || states.n_active() != population.n_alive() {
        return Err(fail(format!(
            "{} rows ({} alive) but the population has {} ({} alive)",
            states.len(),
            states.n_active(),
            population.len(),
            population.n_alive()
        )));
    }
    let counts = disease.counts().map_err(|e| SimError::at(now, disease.name(), e))?;
    if !counts.is_conserved() {
        return Err(fail(format!("compartments do not add up to {} agents: {counts:?}", counts.n_total)));
    }
    Ok(())
}
