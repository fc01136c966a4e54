//! Population turnover unrelated to any disease.
//!
//! Rates are per `1 / units` people per model time unit: with the default
//! `units = 1e-3`, `birth_rate = 30` means 30 births per 1,000 people per
//! unit of time.  Both become per-timestep probabilities as
//! `clamp(rate * units * dt, 0, 1)`.
//!
//! Background deaths can also follow an age schedule ([`AgeRates`]), e.g.
//! life-table mortality per 1,000 for the age groups 0, 1, 5, 15, …

use tracing::trace;

use epi_core::{Purpose, StepContext, StreamId, Uid};

use crate::{Population, SimError, SimResult};

/// A source of births and background deaths, stepped once per tick before
/// any disease.
pub trait Demographics: Send {
    /// Unique module name.  Also seeds this module's draw stream.
    fn name(&self) -> &str;

    /// How many agents to add this tick.
    fn births(&mut self, _ctx: StepContext<'_>, _population: &Population) -> usize {
        0
    }

    /// Alive agents to remove this tick.  The simulation resolves them
    /// together with disease deaths.
    fn deaths(&mut self, _ctx: StepContext<'_>, _population: &Population) -> SimResult<Vec<Uid>> {
        Ok(Vec::new())
    }
}

fn check_rate(module: &str, par: &str, value: f64) -> SimResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SimError::Config(format!("{module}: {par} must be finite and non-negative, got {value}")))
    }
}

fn per_step(rate: f64, units: f64, dt: f64) -> f64 {
    (rate * units * dt).clamp(0.0, 1.0)
}

// ── Births ────────────────────────────────────────────────────────────────────

/// Crude birth rate applied to the living population.
#[derive(Clone, Debug)]
pub struct Births {
    name:       String,
    birth_rate: f64,
    units:      f64,
}

impl Births {
    pub fn new(birth_rate: f64) -> SimResult<Self> {
        let births = Self { name: "births".to_owned(), birth_rate, units: 1e-3 };
        check_rate(&births.name, "birth_rate", birth_rate)?;
        Ok(births)
    }

    /// Scale of `birth_rate`; use `1.0` for a rate given as a fraction.
    pub fn units(mut self, units: f64) -> SimResult<Self> {
        check_rate(&self.name, "units", units)?;
        self.units = units;
        Ok(self)
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn birth_rate(&self) -> f64 {
        self.birth_rate
    }
}

impl Demographics for Births {
    fn name(&self) -> &str {
        &self.name
    }

    /// `floor(n_alive * p)`: deterministic, so no draws are consumed.
    fn births(&mut self, ctx: StepContext<'_>, population: &Population) -> usize {
        let p = per_step(self.birth_rate, self.units, ctx.dt);
        let n_new = (population.n_alive() as f64 * p).floor() as usize;
        trace!(module = %self.name, tick = ctx.tick.0, n_new, "births");
        n_new
    }
}

// ── Age schedules ─────────────────────────────────────────────────────────────

/// Piecewise-constant rates by age group.  `ages` holds the first age of
/// each group, strictly ascending; an agent younger than the first group
/// gets the first group's rate.
#[derive(Clone, Debug, PartialEq)]
pub struct AgeRates {
    ages:  Vec<f64>,
    rates: Vec<f64>,
}

impl AgeRates {
    pub fn new(ages: Vec<f64>, rates: Vec<f64>) -> SimResult<Self> {
        if ages.is_empty() || ages.len() != rates.len() {
            return Err(SimError::Config(format!(
                "age rates need one rate per age group, got {} groups and {} rates",
                ages.len(),
                rates.len()
            )));
        }
        if ages.iter().any(|a| !a.is_finite()) || ages.windows(2).any(|w| w[0] >= w[1]) {
            return Err(SimError::Config(format!("age groups must be finite and strictly ascending, got {ages:?}")));
        }
        for &rate in &rates {
            check_rate("age rates", "rate", rate)?;
        }
        Ok(Self { ages, rates })
    }

    /// Rate of the last group starting at or below `age`.
    pub fn rate_at(&self, age: f64) -> f64 {
        let group = self.ages.partition_point(|&start| start <= age).saturating_sub(1);
        self.rates[group]
    }

    pub fn ages(&self) -> &[f64] {
        &self.ages
    }

    pub fn rates(&self) -> &[f64] {
        &self.rates
    }
}

// ── Deaths ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum DeathRates {
    /// The same rate for everyone.
    Crude(f64),
    ByAge(AgeRates),
}

/// Background mortality: each living agent dies this tick with a per-step
/// probability from a crude rate or its age group's rate.
#[derive(Clone, Debug)]
pub struct Deaths {
    name:      String,
    stream:    StreamId,
    rates:     DeathRates,
    /// Multiplier on every rate.
    rel_death: f64,
    units:     f64,
}

impl Deaths {
    pub fn new(death_rate: f64) -> SimResult<Self> {
        check_rate("deaths", "death_rate", death_rate)?;
        Ok(Self::with_rates(DeathRates::Crude(death_rate)))
    }

    /// Mortality by age group, read from each agent's current age.
    pub fn by_age(rates: AgeRates) -> Self {
        Self::with_rates(DeathRates::ByAge(rates))
    }

    fn with_rates(rates: DeathRates) -> Self {
        let name = "deaths".to_owned();
        Self { stream: StreamId::from_name(&name), name, rates, rel_death: 1.0, units: 1e-3 }
    }

    pub fn units(mut self, units: f64) -> SimResult<Self> {
        check_rate(&self.name, "units", units)?;
        self.units = units;
        Ok(self)
    }

    pub fn rel_death(mut self, rel_death: f64) -> SimResult<Self> {
        check_rate(&self.name, "rel_death", rel_death)?;
        self.rel_death = rel_death;
        Ok(self)
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self.stream = StreamId::from_name(&self.name);
        self
    }

    pub fn rates(&self) -> &DeathRates {
        &self.rates
    }
}

impl Demographics for Deaths {
    fn name(&self) -> &str {
        &self.name
    }

    fn deaths(&mut self, ctx: StepContext<'_>, population: &Population) -> SimResult<Vec<Uid>> {
        let scale = self.rel_death * self.units;
        let dying: Vec<Uid> = match &self.rates {
            DeathRates::Crude(rate) => {
                let p = per_step(*rate, scale, ctx.dt);
                if p <= 0.0 {
                    return Ok(Vec::new());
                }
                population
                    .alive()
                    .into_iter()
                    .filter(|&u| ctx.draws.bernoulli(ctx.key(self.stream, Purpose::BackgroundDeath, u), p))
                    .collect()
            }
            DeathRates::ByAge(table) => {
                let ages = population.ages()?;
                population
                    .alive()
                    .into_iter()
                    .filter(|&u| {
                        let p = per_step(table.rate_at(ages[u.index()]), scale, ctx.dt);
                        p > 0.0 && ctx.draws.bernoulli(ctx.key(self.stream, Purpose::BackgroundDeath, u), p)
                    })
                    .collect()
            }
        };
        trace!(module = %self.name, tick = ctx.tick.0, deaths = dying.len(), "background deaths");
        Ok(dying)
    }
}
