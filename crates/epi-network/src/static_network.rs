//! A fixed edge list.

use rustc_hash::FxHashMap;

use epi_core::{StepContext, Tick, Uid};

use crate::{ContactNetwork, Edge, EdgeList, NetworkResult};

/// Edges given at construction; only removals change them.
///
/// Keeps a uid → edge-index map so [`contacts`](ContactNetwork::contacts)
/// is O(degree).
pub struct StaticNetwork {
    name:     String,
    directed: bool,
    edges:    EdgeList,
    index:    FxHashMap<Uid, Vec<u32>>,
}

impl StaticNetwork {
    /// Permanent edges of weight `beta` between each pair.
    pub fn from_pairs(name: impl Into<String>, pairs: &[(Uid, Uid)], beta: f64) -> Self {
        let mut edges = EdgeList::with_capacity(pairs.len());
        for &(p1, p2) in pairs {
            edges.push(Edge { p1, p2, beta, dur: f64::INFINITY, start: Tick::ZERO });
        }
        Self::from_edges(name, edges)
    }

    pub fn from_edges(name: impl Into<String>, edges: EdgeList) -> Self {
        let mut net = Self { name: name.into(), directed: false, edges, index: FxHashMap::default() };
        net.reindex();
        net
    }

    /// Every pair among agents `0..n`, weight 1.
    pub fn complete(name: impl Into<String>, n: usize) -> Self {
        let mut pairs = Vec::with_capacity(n * n.saturating_sub(1) / 2);
        for i in 0..n {
            for j in (i + 1)..n {
                pairs.push((Uid(i as u32), Uid(j as u32)));
            }
        }
        Self::from_pairs(name, &pairs, 1.0)
    }

    pub fn directed(mut self, directed: bool) -> Self {
        self.directed = directed;
        self
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (i, e) in self.edges.iter().enumerate() {
            self.index.entry(e.p1).or_default().push(i as u32);
            if e.p2 != e.p1 {
                self.index.entry(e.p2).or_default().push(i as u32);
            }
        }
    }
}

impl ContactNetwork for StaticNetwork {
    fn name(&self) -> &str {
        &self.name
    }

    fn edges(&self) -> &EdgeList {
        &self.edges
    }

    fn directed(&self) -> bool {
        self.directed
    }

    fn contacts(&self, uid: Uid) -> Vec<(Uid, f64)> {
        let Some(ids) = self.index.get(&uid) else {
            return Vec::new();
        };
        ids.iter()
            .filter_map(|&i| {
                let e = self.edges.get(i as usize);
                if e.p1 == uid {
                    Some((e.p2, e.beta))
                } else if !self.directed {
                    Some((e.p1, e.beta))
                } else {
                    None
                }
            })
            .collect()
    }

    fn step(&mut self, _ctx: StepContext<'_>, _alive: &[Uid]) -> NetworkResult<()> {
        Ok(())
    }

    fn remove_agents(&mut self, uids: &[Uid]) {
        if self.edges.remove_agents(uids) > 0 {
            self.reindex();
        }
    }
}
