//! Read-only aggregates a disease exposes each tick.

use serde::Serialize;

use epi_core::{Tick, Uid};

/// Compartment totals plus this tick's event counts.
///
/// `n_dead` counts every removed agent (whatever the cause), so
/// `n_susceptible + n_exposed + n_infected + n_recovered + n_dead` equals
/// `n_total`.  `new_deaths` only counts deaths this disease caused.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
pub struct DiseaseCounts {
    pub n_susceptible:  usize,
    pub n_exposed:      usize,
    pub n_infected:     usize,
    pub n_recovered:    usize,
    pub n_dead:         usize,
    /// Rows ever created.
    pub n_total:        usize,
    pub new_infections: usize,
    pub new_deaths:     usize,
    /// `n_infected / alive`; 0 when nobody is alive.
    pub prevalence:     f64,
}

impl DiseaseCounts {
    /// `(result name, value)` pairs in a fixed order.
    pub fn named(&self) -> [(&'static str, f64); 9] {
        [
            ("n_susceptible", self.n_susceptible as f64),
            ("n_exposed", self.n_exposed as f64),
            ("n_infected", self.n_infected as f64),
            ("n_recovered", self.n_recovered as f64),
            ("n_dead", self.n_dead as f64),
            ("n_total", self.n_total as f64),
            ("new_infections", self.new_infections as f64),
            ("new_deaths", self.new_deaths as f64),
            ("prevalence", self.prevalence),
        ]
    }

    /// `true` if the compartments account for every agent ever created.
    pub fn is_conserved(&self) -> bool {
        self.n_susceptible + self.n_exposed + self.n_infected + self.n_recovered + self.n_dead == self.n_total
    }
}

/// Event counters for the tick they were recorded in.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct Tally {
    pub tick:           Tick,
    pub new_infections: usize,
    pub new_deaths:     usize,
}

impl Tally {
    /// Start a fresh count when `tick` moves on.
    pub fn roll(&mut self, tick: Tick) -> &mut Self {
        if tick != self.tick {
            *self = Tally { tick, ..Tally::default() };
        }
        self
    }
}

/// One infection event.  `source` is `Uid::INVALID` for seeded infections.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InfectionRecord {
    pub tick:   Tick,
    pub target: Uid,
    pub source: Uid,
}
