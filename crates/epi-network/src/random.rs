//! Random contacts, redrawn every tick.

use tracing::trace;

use epi_core::{Dist, Purpose, Sampler, StepContext, StreamId, Uid};

use crate::{ContactNetwork, Edge, EdgeList, NetworkError, NetworkResult};

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct RandomNetConfig {
    pub name:       String,
    /// Contacts per agent per tick.  Each agent contributes half of its
    /// draw as edge stubs, so the mean degree matches the distribution mean.
    pub n_contacts: Dist,
    /// Weight given to every edge.
    pub beta:       f64,
}

impl Default for RandomNetConfig {
    fn default() -> Self {
        Self {
            name:       "random".to_owned(),
            n_contacts: Dist::Poisson { lam: 4.0 },
            beta:       1.0,
        }
    }
}

/// Each tick, every alive agent draws a contact count, its stubs are paired
/// with a shuffled copy of all stubs, and self-pairs are dropped.  Edges
/// live for exactly one tick.
pub struct RandomNetwork {
    name:       String,
    stream:     StreamId,
    n_contacts: Sampler,
    beta:       f64,
    edges:      EdgeList,
}

impl RandomNetwork {
    pub fn new(config: RandomNetConfig) -> NetworkResult<Self> {
        let n_contacts = config.n_contacts.duration_sampler("n_contacts")?;
        if !(config.beta.is_finite() && config.beta >= 0.0) {
            return Err(NetworkError::Config(format!(
                "{}: beta must be finite and non-negative, got {}",
                config.name, config.beta
            )));
        }
        Ok(Self {
            stream: StreamId::from_name(&config.name),
            name: config.name,
            n_contacts,
            beta: config.beta,
            edges: EdgeList::new(),
        })
    }
}

impl ContactNetwork for RandomNetwork {
    fn name(&self) -> &str {
        &self.name
    }

    fn edges(&self) -> &EdgeList {
        &self.edges
    }

    fn step(&mut self, ctx: StepContext<'_>, alive: &[Uid]) -> NetworkResult<()> {
        self.edges.clear();

        let mut stubs = Vec::new();
        for &uid in alive {
            let key = ctx.key(self.stream, Purpose::Contacts, uid);
            let drawn = ctx.draws.sample(key, &self.n_contacts).round().max(0.0) as usize;
            // An odd count rounds its half-stub up or down with equal odds.
            let half = drawn / 2 + usize::from(drawn % 2 == 1 && ctx.draws.bernoulli(key.with_sub(1), 0.5));
            stubs.extend(std::iter::repeat_n(uid, half));
        }

        let mut partners = stubs.clone();
        ctx.draws
            .rng(ctx.key(self.stream, Purpose::Contacts, Uid::INVALID))
            .shuffle(&mut partners);

        for (&p1, &p2) in stubs.iter().zip(&partners) {
            if p1 != p2 {
                self.edges.push(Edge { p1, p2, beta: self.beta, dur: 1.0, start: ctx.tick });
            }
        }
        trace!(network = %self.name, tick = ctx.tick.0, edges = self.edges.len(), "random network rebuilt");
        Ok(())
    }

    fn remove_agents(&mut self, uids: &[Uid]) {
        self.edges.remove_agents(uids);
    }
}
