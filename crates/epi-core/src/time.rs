//! Simulation time model.
//!
//! # Design
//!
//! Time advances in whole timesteps counted by `Tick`.  Each timestep spans
//! `dt` model time units (days or years; the kernel does not care):
//!
//!   model_time = start + tick * dt
//!
//! Scheduled event times (`ti_*` state columns) are stored in *timestep
//! units*, i.e. on the same axis as `Tick`, so "has this event come due?" is
//! `ti <= tick as f64`.  Sampled durations are in model time units and are
//! divided by `dt` before being added to the current tick.

use std::fmt;

use crate::{CoreError, CoreResult};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute timestep counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// This tick on the float axis used by `ti_*` event fields.
    #[inline]
    pub fn as_time(self) -> f64 {
        self.0 as f64
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Tracks the current tick and maps it onto model time.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Model time of tick 0 (e.g. `2020.0` for a calendar-year model).
    pub start: f64,
    /// Model time units per tick.
    pub dt: f64,
    /// Advanced by `SimClock::advance()` once per tick.
    pub current_tick: Tick,
}

impl SimClock {
    pub fn new(start: f64, dt: f64) -> Self {
        Self { start, dt, current_tick: Tick::ZERO }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    /// Model time at the current tick.
    #[inline]
    pub fn model_time(&self) -> f64 {
        self.model_time_at(self.current_tick)
    }

    #[inline]
    pub fn model_time_at(&self, tick: Tick) -> f64 {
        self.start + tick.0 as f64 * self.dt
    }

    /// Convert a duration in model time units to timestep units.
    #[inline]
    pub fn to_steps(&self, duration: f64) -> f64 {
        duration / self.dt
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (t={:.3})", self.current_tick, self.model_time())
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Agents created before tick 0.
    pub n_agents: usize,

    /// Total ticks to simulate.
    pub n_steps: u64,

    /// Model time units per tick.  Must be positive and finite.
    pub dt: f64,

    /// Model time of tick 0.
    pub start: f64,

    /// Master seed.  The same seed always produces identical trajectories.
    pub seed: u64,

    /// Check compartment exclusivity and conservation after every tick.
    /// O(agents) per tick; on by default, turn off for large production runs.
    pub verify_invariants: bool,

    /// Report a full agent snapshot every N ticks.  0 disables snapshots.
    pub output_interval_ticks: u64,

    /// Real people represented by each agent.  Count results are multiplied
    /// by this when they are finalized; proportions are not.
    #[cfg_attr(feature = "serde", serde(default = "default_pop_scale"))]
    pub pop_scale: f64,
}

#[cfg(feature = "serde")]
fn default_pop_scale() -> f64 {
    1.0
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            n_agents:              1_000,
            n_steps:               100,
            dt:                    1.0,
            start:                 0.0,
            seed:                  1,
            verify_invariants:     true,
            output_interval_ticks: 0,
            pop_scale:             1.0,
        }
    }
}

impl SimConfig {
    /// The tick at which the simulation ends (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.n_steps)
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.start, self.dt)
    }

    pub fn validate(&self) -> CoreResult<()> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(CoreError::Config(format!("dt must be positive and finite, got {}", self.dt)));
        }
        if !self.start.is_finite() {
            return Err(CoreError::Config(format!("start must be finite, got {}", self.start)));
        }
        if !(self.pop_scale.is_finite() && self.pop_scale > 0.0) {
            return Err(CoreError::Config(format!("pop_scale must be positive and finite, got {}", self.pop_scale)));
        }
        Ok(())
    }
}
