//! The people every module shares: who is alive and how old they are.
//!
//! Disease state lives in each disease's own `StateStore`; the population
//! only keeps the attributes that are not owned by any one disease.  All
//! stores grow in lockstep, so row `i` is the same agent everywhere.

use epi_core::Uid;
use epi_state::{StateInit, StateResult, StateStore, StateStoreBuilder};

/// Age column, in model time units.
pub const AGE: &str = "age";

pub struct Population {
    states: StateStore,
}

impl Population {
    pub fn new() -> StateResult<Self> {
        let states = StateStoreBuilder::new(0).define(AGE, StateInit::Float(0.0)).build()?;
        Ok(Self { states })
    }

    /// Rows ever created, including removed agents.
    #[inline]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    #[inline]
    pub fn n_alive(&self) -> usize {
        self.states.n_active()
    }

    #[inline]
    pub fn is_alive(&self, uid: Uid) -> bool {
        self.states.is_active(uid)
    }

    /// Alive uids in ascending order.  O(rows).
    pub fn alive(&self) -> Vec<Uid> {
        self.states.active_uids()
    }

    /// Ages indexed by `Uid`.  Removed agents keep their age at death.
    pub fn ages(&self) -> StateResult<&[f64]> {
        self.states.column::<f64>(AGE)
    }

    pub fn states(&self) -> &StateStore {
        &self.states
    }

    /// Append one agent per entry of `ages`.
    pub fn add_agents(&mut self, ages: &[f64]) -> StateResult<Vec<Uid>> {
        let uids = self.states.add_agents(ages.len());
        self.states.set(AGE, &uids, ages)?;
        Ok(uids)
    }

    /// Mark agents dead.  Fails without changing anything if any uid is
    /// unknown, already removed, or repeated.
    pub fn remove_agents(&mut self, uids: &[Uid]) -> StateResult<()> {
        self.states.remove_agents(uids)
    }

    /// Advance every living agent's age by `dt`.
    pub fn age_by(&mut self, dt: f64) -> StateResult<()> {
        let alive = self.states.active().to_vec();
        let ages = self.states.column_mut::<f64>(AGE)?;
        for (age, _) in ages.iter_mut().zip(alive).filter(|(_, a)| *a) {
            *age += dt;
        }
        Ok(())
    }
}
