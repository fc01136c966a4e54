//! `Disease` — one infection's states, parameters and state machine.

use tracing::debug;

use epi_core::{Purpose, StepContext, StreamId, Tick, Uid};
use epi_state::{StateKind, StateStore};

use crate::counts::Tally;
use crate::{
    DiseaseConfig, DiseaseCounts, DiseaseError, DiseaseKind, DiseasePars, DiseaseResult, InfectionRecord,
    Pipeline, Transition,
};

// ── Standard state names ──────────────────────────────────────────────────────

pub const SUSCEPTIBLE:  &str = "susceptible";
pub const EXPOSED:      &str = "exposed";
pub const INFECTED:     &str = "infected";
pub const RECOVERED:    &str = "recovered";
pub const DEAD:         &str = "dead";
pub const REL_SUS:      &str = "rel_sus";
pub const REL_TRANS:    &str = "rel_trans";
pub const TI_EXPOSED:   &str = "ti_exposed";
pub const TI_INFECTED:  &str = "ti_infected";
pub const TI_RECOVERED: &str = "ti_recovered";
pub const TI_DEAD:      &str = "ti_dead";

/// The mutually exclusive primary compartments.
pub const COMPARTMENTS: [&str; 4] = [SUSCEPTIBLE, EXPOSED, INFECTED, RECOVERED];

// ── Disease ───────────────────────────────────────────────────────────────────

/// A disease module.
///
/// Owns one row per agent in its [`StateStore`] (rows are added and removed
/// in lockstep with the population by the simulation), a validated parameter
/// set, and the transition [`Pipeline`] run by [`step_state`](Self::step_state).
///
/// # Extension points
///
/// - initial state: [`init_state`](Self::init_state) (driven by `init_prev`)
/// - who transmits: [`with_infectious`](Self::with_infectious)
/// - per-tick transitions: [`edit_pipeline`](Self::edit_pipeline)
/// - removal: [`step_die`](Self::step_die) always clears the standard states
///   before anything else touches the row
pub struct Disease {
    pub(crate) name:           String,
    pub(crate) kind:           DiseaseKind,
    pub(crate) stream:         StreamId,
    pub(crate) pars:           DiseasePars,
    pub(crate) states:         StateStore,
    pub(crate) pipeline:       Pipeline,
    pub(crate) infectious:     Vec<String>,
    pub(crate) log:            Vec<InfectionRecord>,
    pub(crate) tally:          Tally,
    /// Deaths this disease requested in the current tick.
    pub(crate) pending_deaths: Vec<Uid>,
}

impl Disease {
    /// Validate `config` and define every state (no rows yet).
    pub fn new(config: DiseaseConfig) -> DiseaseResult<Self> {
        if config.name.is_empty() {
            return Err(DiseaseError::Config("disease name must not be empty".to_owned()));
        }
        let pars = DiseasePars::from_config(&config)?;

        let mut states = StateStore::new();
        for flag in COMPARTMENTS {
            states.define(flag, flag == SUSCEPTIBLE)?;
        }
        states.define(DEAD, false)?;
        states.define(REL_SUS, 1.0)?;
        states.define(REL_TRANS, 1.0)?;
        for ti in [TI_EXPOSED, TI_INFECTED, TI_RECOVERED, TI_DEAD] {
            states.define(ti, f64::NAN)?;
        }
        for def in &config.states {
            states.define_from(def)?;
        }

        let pipeline = default_pipeline(config.kind)?;
        pipeline.validate(&states)?;

        Ok(Self {
            stream: StreamId::from_name(&config.name),
            name: config.name,
            kind: config.kind,
            pars,
            states,
            pipeline,
            infectious: vec![INFECTED.to_owned()],
            log: Vec::new(),
            tally: Tally::default(),
            pending_deaths: Vec::new(),
        })
    }

    /// Widen the infectious predicate with another bool state (e.g.
    /// `exposed` for a disease that transmits during its latent period).
    pub fn with_infectious(mut self, state: &str) -> DiseaseResult<Self> {
        self.states.column::<bool>(state)?;
        if !self.infectious.iter().any(|s| s == state) {
            self.infectious.push(state.to_owned());
        }
        Ok(self)
    }

    /// Edit the transition pipeline; the result is re-validated against the
    /// defined states.
    pub fn edit_pipeline(&mut self, edit: impl FnOnce(&mut Pipeline) -> DiseaseResult<()>) -> DiseaseResult<()> {
        let mut pipeline = self.pipeline.clone();
        edit(&mut pipeline)?;
        pipeline.validate(&self.states)?;
        self.pipeline = pipeline;
        Ok(())
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> DiseaseKind {
        self.kind
    }

    pub fn stream(&self) -> StreamId {
        self.stream
    }

    pub fn pars(&self) -> &DiseasePars {
        &self.pars
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn states(&self) -> &StateStore {
        &self.states
    }

    /// Direct state access for interventions and tests.  Writers are
    /// responsible for keeping compartments exclusive.
    pub fn states_mut(&mut self) -> &mut StateStore {
        &mut self.states
    }

    pub fn infectious_states(&self) -> &[String] {
        &self.infectious
    }

    /// Every infection so far, in the order recorded.
    pub fn infection_log(&self) -> &[InfectionRecord] {
        &self.log
    }

    // ── Infectiousness ────────────────────────────────────────────────────

    /// Per-row infectious flag (false for removed agents).  O(rows).
    pub fn infectious_mask(&self) -> DiseaseResult<Vec<bool>> {
        let mut mask = self.states.active().to_vec();
        let mut any = vec![false; mask.len()];
        for state in &self.infectious {
            for (a, &v) in any.iter_mut().zip(self.states.column::<bool>(state)?) {
                *a |= v;
            }
        }
        for (m, a) in mask.iter_mut().zip(any) {
            *m &= a;
        }
        Ok(mask)
    }

    pub fn is_infectious(&self, uid: Uid) -> DiseaseResult<bool> {
        if !self.states.is_active(uid) {
            return Ok(false);
        }
        for state in &self.infectious {
            if self.states.get_one::<bool>(state, uid)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    // ── Population boundary ───────────────────────────────────────────────

    /// Append rows for newborn (or initial) agents, all susceptible.
    pub fn add_agents(&mut self, n: usize) -> Vec<Uid> {
        self.states.add_agents(n)
    }

    /// Seed infections among `uids` with probability `init_prev` each.
    /// Returns the seeded agents.
    pub fn init_state(&mut self, ctx: StepContext<'_>, uids: &[Uid]) -> DiseaseResult<Vec<Uid>> {
        let susceptible = self.states.column::<bool>(SUSCEPTIBLE)?;
        let seeds: Vec<Uid> = uids
            .iter()
            .copied()
            .filter(|&u| self.states.is_active(u) && susceptible[u.index()])
            .filter(|&u| ctx.draws.bernoulli(ctx.key(self.stream, Purpose::InitPrev, u), self.pars.init_prev))
            .collect();
        self.infect(ctx, &seeds)?;
        debug!(disease = %self.name, seeded = seeds.len(), "initial infections");
        Ok(seeds)
    }

    /// Infect `uids` with no recorded source.
    pub fn infect(&mut self, ctx: StepContext<'_>, uids: &[Uid]) -> DiseaseResult<()> {
        let sources = vec![Uid::INVALID; uids.len()];
        self.set_prognoses(ctx, uids, &sources)
    }

    // ── Per-tick update ───────────────────────────────────────────────────

    /// Run the transition pipeline.  Returns the agents this disease wants
    /// removed; they stay in every compartment until [`step_die`](Self::step_die).
    pub fn step_state(&mut self, ctx: StepContext<'_>) -> DiseaseResult<Vec<Uid>> {
        self.tally.roll(ctx.tick);
        let outcome = self.pipeline.run(&mut self.states, ctx)?;
        debug!(
            disease = %self.name,
            tick = ctx.tick.0,
            deaths = outcome.deaths.len(),
            fired = ?outcome.fired,
            "step_state"
        );
        self.pending_deaths = outcome.deaths.clone();
        Ok(outcome.deaths)
    }

    /// Remove agents: clear every compartment and pending event, set `dead`
    /// and `ti_dead`, then mark the rows inactive.
    ///
    /// Fails with `InvalidUid` (changing nothing) if any uid is unknown or
    /// already removed.
    pub fn step_die(&mut self, tick: Tick, uids: &[Uid]) -> DiseaseResult<()> {
        self.states.remove_agents(uids)?;

        for flag in COMPARTMENTS {
            self.states.fill(flag, uids, false)?;
        }
        let timers: Vec<String> = self
            .states
            .names()
            .iter()
            .filter(|n| n.starts_with("ti_") && self.states.kind(n) == Some(StateKind::Float))
            .cloned()
            .collect();
        for ti in &timers {
            self.states.reset(ti, uids)?;
        }
        self.states.fill(DEAD, uids, true)?;
        self.states.fill(TI_DEAD, uids, tick.as_time())?;

        let own = uids.iter().filter(|u| self.pending_deaths.binary_search(u).is_ok()).count();
        self.tally.roll(tick).new_deaths += own;
        Ok(())
    }

    /// End active infections now.  SIS agents return to susceptible, others
    /// recover.  Any scheduled death is cancelled.  Returns who was cured.
    pub fn cure(&mut self, ctx: StepContext<'_>, uids: &[Uid]) -> DiseaseResult<Vec<Uid>> {
        let infected = self.states.column::<bool>(INFECTED)?;
        let cured: Vec<Uid> = uids
            .iter()
            .copied()
            .filter(|&u| self.states.is_active(u) && infected[u.index()])
            .collect();
        let to = match self.kind {
            DiseaseKind::Sis => SUSCEPTIBLE,
            DiseaseKind::Sir | DiseaseKind::Seir => RECOVERED,
        };
        self.states.fill(INFECTED, &cured, false)?;
        self.states.fill(to, &cured, true)?;
        self.states.fill(TI_RECOVERED, &cured, ctx.now())?;
        self.states.reset(TI_DEAD, &cured)?;
        Ok(cured)
    }

    // ── Invariants and results ────────────────────────────────────────────

    /// Verify that every alive agent is in exactly one compartment and every
    /// removed agent is dead and in none.  O(rows).
    pub fn check_compartments(&self) -> DiseaseResult<()> {
        let s = self.states.column::<bool>(SUSCEPTIBLE)?;
        let e = self.states.column::<bool>(EXPOSED)?;
        let i = self.states.column::<bool>(INFECTED)?;
        let r = self.states.column::<bool>(RECOVERED)?;
        let dead = self.states.column::<bool>(DEAD)?;
        let active = self.states.active();

        for row in 0..self.states.len() {
            let n = [s[row], e[row], i[row], r[row]].iter().filter(|f| **f).count();
            let problem = match (active[row], dead[row]) {
                (_, _) if n > 1 => Some(format!("{n} primary compartments set")),
                (true, true) => Some("dead agent is still active".to_owned()),
                (false, false) => Some("removed agent is not marked dead".to_owned()),
                (true, false) if n == 0 => Some("alive agent is in no compartment".to_owned()),
                (false, true) if n > 0 => Some("dead agent is in a compartment".to_owned()),
                _ => None,
            };
            if let Some(detail) = problem {
                return Err(DiseaseError::InvalidStateTransition { uid: Uid(row as u32), detail });
            }
        }
        Ok(())
    }

    /// Aggregate counts for the current tick.
    pub fn counts(&self) -> DiseaseResult<DiseaseCounts> {
        let alive = self.states.n_active();
        let n_infected = self.states.count(INFECTED)?;
        Ok(DiseaseCounts {
            n_susceptible:  self.states.count(SUSCEPTIBLE)?,
            n_exposed:      self.states.count(EXPOSED)?,
            n_infected,
            n_recovered:    self.states.count(RECOVERED)?,
            n_dead:         self.states.count_all(DEAD)?,
            n_total:        self.states.len(),
            new_infections: self.tally.new_infections,
            new_deaths:     self.tally.new_deaths,
            prevalence:     if alive == 0 { 0.0 } else { n_infected as f64 / alive as f64 },
        })
    }
}

/// Death first, so it pre-empts every other transition due the same tick.
fn default_pipeline(kind: DiseaseKind) -> DiseaseResult<Pipeline> {
    let mut pipeline = Pipeline::new();
    pipeline.push("die", Transition::die(TI_DEAD))?;
    match kind {
        DiseaseKind::Sir => {
            pipeline.push("recover", Transition::progress(INFECTED, RECOVERED, TI_RECOVERED))?;
        }
        DiseaseKind::Sis => {
            pipeline.push("recover", Transition::progress(INFECTED, SUSCEPTIBLE, TI_RECOVERED))?;
        }
        DiseaseKind::Seir => {
            pipeline.push("infect", Transition::progress(EXPOSED, INFECTED, TI_INFECTED))?;
            pipeline.push("recover", Transition::progress(INFECTED, RECOVERED, TI_RECOVERED))?;
        }
    }
    Ok(pipeline)
}
