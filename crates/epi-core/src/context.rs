//! Per-tick view handed to every module.

use crate::{DrawKey, DrawStream, Purpose, StreamId, Tick, Uid};

/// The current tick, the timestep length and the run's draw stream.
///
/// Built once per tick by the simulation loop and passed by value (it is
/// `Copy`) to disease, network, intervention and demographic updates.
#[derive(Copy, Clone, Debug)]
pub struct StepContext<'a> {
    pub tick:  Tick,
    /// Model time units per tick.
    pub dt:    f64,
    pub draws: &'a DrawStream,
}

impl<'a> StepContext<'a> {
    #[inline]
    pub fn new(tick: Tick, dt: f64, draws: &'a DrawStream) -> Self {
        Self { tick, dt, draws }
    }

    /// Current time on the `ti_*` axis.
    #[inline]
    pub fn now(&self) -> f64 {
        self.tick.as_time()
    }

    /// Draw key for this tick.
    #[inline]
    pub fn key(&self, stream: StreamId, purpose: Purpose, uid: Uid) -> DrawKey {
        DrawKey::new(self.tick, stream, purpose, uid)
    }

    /// Convert a per-unit-time probability into a per-timestep probability.
    #[inline]
    pub fn prob_per_step(&self, p: f64) -> f64 {
        let p = p.clamp(0.0, 1.0);
        if p >= 1.0 {
            return 1.0;
        }
        1.0 - (1.0 - p).powf(self.dt)
    }
}
