//! Ordered, editable transition pipelines.
//!
//! # Design
//!
//! A disease's per-tick state machine is a list of named [`Stage`]s run in
//! order.  Each stage is built from a small library of combinators:
//!
//! | Combinator                 | Effect once `ti <= now`                          |
//! |----------------------------|--------------------------------------------------|
//! | [`Transition::progress`]   | `from = false`, `to = true` for agents in `from` |
//! | [`Transition::die`]        | request removal of the agent                     |
//! | [`Transition::Custom`]     | arbitrary update over the state store            |
//!
//! Agents requested for death by an earlier stage are skipped by every later
//! stage of the same tick, so the order of the list *is* the precedence
//! rule.  The default pipelines put `die` first; a derived disease that
//! wants a different precedence says so explicitly with
//! [`Pipeline::insert_before`] / [`Pipeline::move_before`] rather than by
//! overriding anything.

use tracing::trace;

use epi_core::{StepContext, Uid};
use epi_state::StateStore;

use crate::{DiseaseError, DiseaseResult};

/// Signature of a custom stage.  Push uids onto `outcome.deaths` to request
/// removal; agents already in that list must be left alone.
pub type TransitionFn = fn(&mut StateStore, StepContext<'_>, &mut StepOutcome) -> DiseaseResult<()>;

#[derive(Clone, Debug)]
pub enum Transition {
    Progress { from: String, to: String, ti: String },
    Die { ti: String },
    Custom(TransitionFn),
}

impl Transition {
    pub fn progress(from: &str, to: &str, ti: &str) -> Self {
        Transition::Progress { from: from.to_owned(), to: to.to_owned(), ti: ti.to_owned() }
    }

    pub fn die(ti: &str) -> Self {
        Transition::Die { ti: ti.to_owned() }
    }
}

#[derive(Clone, Debug)]
pub struct Stage {
    pub name:       String,
    pub transition: Transition,
}

/// What one run of the pipeline did.
#[derive(Clone, Debug, Default)]
pub struct StepOutcome {
    /// Agents requested for removal, ascending and without duplicates.
    pub deaths: Vec<Uid>,
    /// `(stage, agents affected)` in run order.
    pub fired:  Vec<(String, usize)>,
}

impl StepOutcome {
    #[inline]
    pub fn is_dying(&self, uid: Uid) -> bool {
        self.deaths.binary_search(&uid).is_ok()
    }

    /// Add death requests, keeping `deaths` sorted and unique.
    pub fn request_deaths(&mut self, uids: impl IntoIterator<Item = Uid>) {
        self.deaths.extend(uids);
        self.deaths.sort_unstable();
        self.deaths.dedup();
    }
}

#[derive(Clone, Debug, Default)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage names in run order.
    pub fn names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Append a stage.
    pub fn push(&mut self, name: &str, transition: Transition) -> DiseaseResult<()> {
        self.check_new(name)?;
        self.stages.push(Stage { name: name.to_owned(), transition });
        Ok(())
    }

    /// Insert a stage directly before the stage named `anchor`.
    pub fn insert_before(&mut self, anchor: &str, name: &str, transition: Transition) -> DiseaseResult<()> {
        self.check_new(name)?;
        let at = self.position(anchor)?;
        self.stages.insert(at, Stage { name: name.to_owned(), transition });
        Ok(())
    }

    /// Move stage `name` so that it runs directly before `anchor`.
    pub fn move_before(&mut self, name: &str, anchor: &str) -> DiseaseResult<()> {
        if name == anchor {
            return Ok(());
        }
        let from = self.position(name)?;
        self.position(anchor)?;
        let stage = self.stages.remove(from);
        let at = self.position(anchor)?;
        self.stages.insert(at, stage);
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> DiseaseResult<Stage> {
        let at = self.position(name)?;
        Ok(self.stages.remove(at))
    }

    /// Check that every state a stage names exists with the right dtype.
    pub(crate) fn validate(&self, store: &StateStore) -> DiseaseResult<()> {
        for stage in &self.stages {
            match &stage.transition {
                Transition::Progress { from, to, ti } => {
                    store.column::<bool>(from)?;
                    store.column::<bool>(to)?;
                    store.column::<f64>(ti)?;
                }
                Transition::Die { ti } => {
                    store.column::<f64>(ti)?;
                }
                Transition::Custom(_) => {}
            }
        }
        Ok(())
    }

    /// Run every stage in order.
    pub fn run(&self, store: &mut StateStore, ctx: StepContext<'_>) -> DiseaseResult<StepOutcome> {
        let now = ctx.now();
        let mut outcome = StepOutcome::default();

        for stage in &self.stages {
            let affected = match &stage.transition {
                Transition::Progress { from, to, ti } => {
                    let mut due = store.uids_due(from, ti, now)?;
                    due.retain(|u| !outcome.is_dying(*u));
                    store.fill(from, &due, false)?;
                    store.fill(to, &due, true)?;
                    due.len()
                }
                Transition::Die { ti } => {
                    let due = store.uids_matching::<f64>(ti, |t| t <= now)?;
                    let before = outcome.deaths.len();
                    outcome.request_deaths(due);
                    outcome.deaths.len() - before
                }
                Transition::Custom(f) => {
                    let before = outcome.deaths.len();
                    f(store, ctx, &mut outcome)?;
                    outcome.deaths.sort_unstable();
                    outcome.deaths.dedup();
                    outcome.deaths.len() - before
                }
            };
            trace!(stage = %stage.name, tick = ctx.tick.0, affected, "transition stage");
            outcome.fired.push((stage.name.clone(), affected));
        }
        Ok(outcome)
    }

    fn position(&self, name: &str) -> DiseaseResult<usize> {
        self.stages
            .iter()
            .position(|s| s.name == name)
            .ok_or_else(|| DiseaseError::Config(format!("no transition stage named '{name}'")))
    }

    fn check_new(&self, name: &str) -> DiseaseResult<()> {
        if self.stages.iter().any(|s| s.name == name) {
            return Err(DiseaseError::Config(format!("transition stage '{name}' already exists")));
        }
        Ok(())
    }
}
