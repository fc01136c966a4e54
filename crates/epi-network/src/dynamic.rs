//! Edges that form at a constant rate and persist for a sampled duration.

use tracing::trace;

use epi_core::{Dist, Purpose, Sampler, StepContext, StreamId, Uid};

use crate::{ContactNetwork, Edge, EdgeList, NetworkError, NetworkResult};

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct DynamicNetConfig {
    pub name:           String,
    /// Probability per unit time that an agent starts a new partnership.
    pub formation_rate: f64,
    /// Partnership length in model time units.
    pub duration:       Dist,
    pub beta:           f64,
}

impl Default for DynamicNetConfig {
    fn default() -> Self {
        Self {
            name:           "dynamic".to_owned(),
            formation_rate: 0.1,
            duration:       Dist::Exponential { mean: 10.0 },
            beta:           1.0,
        }
    }
}

pub struct DynamicNetwork {
    name:           String,
    stream:         StreamId,
    formation_rate: f64,
    duration:       Sampler,
    beta:           f64,
    edges:          EdgeList,
}

impl DynamicNetwork {
    pub fn new(config: DynamicNetConfig) -> NetworkResult<Self> {
        let duration = config.duration.duration_sampler("duration")?;
        if !(0.0..=1.0).contains(&config.formation_rate) {
            return Err(NetworkError::Config(format!(
                "{}: formation_rate must be in [0, 1], got {}",
                config.name, config.formation_rate
            )));
        }
        if !(config.beta.is_finite() && config.beta >= 0.0) {
            return Err(NetworkError::Config(format!(
                "{}: beta must be finite and non-negative, got {}",
                config.name, config.beta
            )));
        }
        Ok(Self {
            stream: StreamId::from_name(&config.name),
            name: config.name,
            formation_rate: config.formation_rate,
            duration,
            beta: config.beta,
            edges: EdgeList::new(),
        })
    }
}

impl ContactNetwork for DynamicNetwork {
    fn name(&self) -> &str {
        &self.name
    }

    fn edges(&self) -> &EdgeList {
        &self.edges
    }

    fn step(&mut self, ctx: StepContext<'_>, alive: &[Uid]) -> NetworkResult<()> {
        let dissolved = self.edges.prune_expired(ctx.tick);
        if alive.len() < 2 {
            return Ok(());
        }

        let p = ctx.prob_per_step(self.formation_rate);
        let last = alive.len() - 1;
        let mut formed = 0usize;
        for &uid in alive {
            let key = ctx.key(self.stream, Purpose::Formation, uid);
            if !ctx.draws.bernoulli(key, p) {
                continue;
            }
            // Uniform over everyone else: an index landing on `uid` maps to the
            // last slot, which the range never reaches otherwise.
            let j = ctx.draws.index(key.with_sub(1), last);
            let partner = if alive[j] == uid { alive[last] } else { alive[j] };

            let dur = ctx.draws.sample(ctx.key(self.stream, Purpose::EdgeDuration, uid), &self.duration) / ctx.dt;
            // Lasts at least the tick it was formed in.
            self.edges.push(Edge { p1: uid, p2: partner, beta: self.beta, dur: dur.max(1.0), start: ctx.tick });
            formed += 1;
        }
        trace!(network = %self.name, tick = ctx.tick.0, formed, dissolved, edges = self.edges.len(), "dynamic network step");
        Ok(())
    }

    fn remove_agents(&mut self, uids: &[Uid]) {
        self.edges.remove_agents(uids);
    }
}
