//! Structure-of-Arrays edge storage.
//!
//! # Data layout
//!
//! Edge `i` is `(p1[i], p2[i], beta[i], dur[i], start[i])`.  All arrays have
//! the same length; iteration over the active edges of a network is a
//! contiguous scan.  `dur` is in timestep units, so an edge formed at tick
//! `start` expires once `tick >= start + dur`.

use rustc_hash::FxHashSet;

use epi_core::{Tick, Uid};

/// One edge, copied out of an [`EdgeList`].
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Edge {
    pub p1:    Uid,
    pub p2:    Uid,
    /// Per-edge transmission weight.
    pub beta:  f64,
    /// Lifetime in timesteps; `f64::INFINITY` for permanent edges.
    pub dur:   f64,
    pub start: Tick,
}

impl Edge {
    /// `true` once the edge's lifetime has elapsed at `tick`.
    #[inline]
    pub fn expired_at(&self, tick: Tick) -> bool {
        tick.0.saturating_sub(self.start.0) as f64 >= self.dur
    }

    #[inline]
    pub fn touches(&self, uid: Uid) -> bool {
        self.p1 == uid || self.p2 == uid
    }
}

#[derive(Clone, Debug, Default)]
pub struct EdgeList {
    pub p1:    Vec<Uid>,
    pub p2:    Vec<Uid>,
    pub beta:  Vec<f64>,
    pub dur:   Vec<f64>,
    pub start: Vec<Tick>,
}

impl EdgeList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            p1:    Vec::with_capacity(n),
            p2:    Vec::with_capacity(n),
            beta:  Vec::with_capacity(n),
            dur:   Vec::with_capacity(n),
            start: Vec::with_capacity(n),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.p1.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.p1.is_empty()
    }

    pub fn push(&mut self, edge: Edge) {
        self.p1.push(edge.p1);
        self.p2.push(edge.p2);
        self.beta.push(edge.beta);
        self.dur.push(edge.dur);
        self.start.push(edge.start);
    }

    #[inline]
    pub fn get(&self, i: usize) -> Edge {
        Edge {
            p1:    self.p1[i],
            p2:    self.p2[i],
            beta:  self.beta[i],
            dur:   self.dur[i],
            start: self.start[i],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Edge> + '_ {
        (0..self.len()).map(|i| self.get(i))
    }

    pub fn clear(&mut self) {
        self.p1.clear();
        self.p2.clear();
        self.beta.clear();
        self.dur.clear();
        self.start.clear();
    }

    /// Keep only edges for which `keep` returns `true`, preserving order.
    /// Returns the number of edges removed.
    pub fn retain(&mut self, mut keep: impl FnMut(&Edge) -> bool) -> usize {
        let n = self.len();
        let mut w = 0;
        for r in 0..n {
            let edge = self.get(r);
            if keep(&edge) {
                if w != r {
                    self.p1[w] = edge.p1;
                    self.p2[w] = edge.p2;
                    self.beta[w] = edge.beta;
                    self.dur[w] = edge.dur;
                    self.start[w] = edge.start;
                }
                w += 1;
            }
        }
        self.p1.truncate(w);
        self.p2.truncate(w);
        self.beta.truncate(w);
        self.dur.truncate(w);
        self.start.truncate(w);
        n - w
    }

    /// Drop every edge touching one of `uids`.
    pub fn remove_agents(&mut self, uids: &[Uid]) -> usize {
        if uids.is_empty() {
            return 0;
        }
        let gone: FxHashSet<Uid> = uids.iter().copied().collect();
        self.retain(|e| !gone.contains(&e.p1) && !gone.contains(&e.p2))
    }

    /// Drop edges whose lifetime has elapsed at `tick`.
    pub fn prune_expired(&mut self, tick: Tick) -> usize {
        self.retain(|e| !e.expired_at(tick))
    }
}
