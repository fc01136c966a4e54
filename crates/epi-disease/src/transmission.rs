//! Network transmission: which susceptible agents are infected this tick,
//! and by whom.
//!
//! # Exposure policy
//!
//! Every (source, target) opportunity is an independent Bernoulli trial and
//! the target is infected if at least one trial succeeds, i.e. with
//! probability `1 - Π(1 - p_i)`.  The trial for an edge is keyed by
//! `(tick, disease, target, source, network slot)`, so:
//!
//! - the result never depends on edge or network iteration order;
//! - two identical edges in the same network are the *same* opportunity
//!   (same key, same outcome) and count once;
//! - the same pair in two networks gets two independent trials.
//!
//! When several sources succeed, one is attributed uniformly at random from
//! the distinct successful sources in ascending uid order, using a draw
//! keyed by the target alone.

use epi_core::{Purpose, StepContext, Uid};
use epi_network::ContactNetwork;

use crate::disease::{REL_SUS, REL_TRANS, SUSCEPTIBLE};
use crate::{Disease, DiseaseResult};

/// Newly infected agents (ascending) with the source chosen for each.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NewCases {
    pub uids:    Vec<Uid>,
    pub sources: Vec<Uid>,
}

impl NewCases {
    pub fn len(&self) -> usize {
        self.uids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uids.is_empty()
    }
}

impl Disease {
    /// Per-timestep transmission probability for one opportunity.
    #[inline]
    pub fn transmission_prob(beta_dt: f64, weight: f64, rel_trans: f64, rel_sus: f64) -> f64 {
        let p = beta_dt * weight * rel_trans * rel_sus;
        if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) }
    }

    /// Evaluate every edge of every network once.  Does not change state;
    /// pass the result to [`set_prognoses`](Self::set_prognoses).
    pub fn make_new_cases(
        &self,
        ctx: StepContext<'_>,
        networks: &[Box<dyn ContactNetwork>],
    ) -> DiseaseResult<NewCases> {
        let beta_dt = ctx.prob_per_step(self.pars.beta);
        if beta_dt <= 0.0 {
            return Ok(NewCases::default());
        }

        let infectious = self.infectious_mask()?;
        let susceptible = self.states.column::<bool>(SUSCEPTIBLE)?;
        let rel_sus = self.states.column::<f64>(REL_SUS)?;
        let rel_trans = self.states.column::<f64>(REL_TRANS)?;
        let active = self.states.active();
        let n = self.states.len();

        let can_infect = |src: Uid, tgt: Uid| {
            let (s, t) = (src.index(), tgt.index());
            s < n && t < n && infectious[s] && active[t] && susceptible[t]
        };

        // (target, source) for every successful trial.
        let mut hits: Vec<(Uid, Uid)> = Vec::new();
        for (slot, network) in networks.iter().enumerate() {
            let directed = network.directed();
            for edge in network.edges().iter() {
                let both = [(edge.p1, edge.p2), (edge.p2, edge.p1)];
                let tries = if directed { &both[..1] } else { &both[..] };
                let Some(&(src, tgt)) = tries.iter().find(|&&(s, t)| can_infect(s, t)) else {
                    continue;
                };
                let p = Self::transmission_prob(beta_dt, edge.beta, rel_trans[src.index()], rel_sus[tgt.index()]);
                let sub = (src.0 as u64) | ((slot as u64) << 32);
                if ctx.draws.bernoulli(ctx.key(self.stream, Purpose::Transmission, tgt).with_sub(sub), p) {
                    hits.push((tgt, src));
                }
            }
        }

        hits.sort_unstable();
        hits.dedup();

        let mut cases = NewCases::default();
        for group in hits.chunk_by(|a, b| a.0 == b.0) {
            let target = group[0].0;
            let pick = if group.len() == 1 {
                0
            } else {
                ctx.draws.index(ctx.key(self.stream, Purpose::SourcePick, target), group.len())
            };
            cases.uids.push(target);
            cases.sources.push(group[pick].1);
        }
        Ok(cases)
    }
}
