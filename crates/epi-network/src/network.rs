//! The seam between diseases and topology.

use epi_core::{StepContext, Uid};

use crate::{EdgeList, NetworkResult};

/// A set of edges between agents, updated once per tick.
///
/// Diseases only read a network through [`edges`](Self::edges) and
/// [`contacts`](Self::contacts); they never own or mutate topology.
///
/// An undirected edge is a single transmission opportunity in whichever
/// direction is valid.  A directed network only transmits `p1 -> p2`.
pub trait ContactNetwork: Send {
    /// Unique module name.  Also seeds this network's draw stream.
    fn name(&self) -> &str;

    fn edges(&self) -> &EdgeList;

    fn directed(&self) -> bool {
        false
    }

    /// `(peer, weight)` for every edge along which `uid` could infect or be
    /// infected.  O(edges) unless the implementation keeps an index.
    fn contacts(&self, uid: Uid) -> Vec<(Uid, f64)> {
        let directed = self.directed();
        self.edges()
            .iter()
            .filter_map(|e| {
                if e.p1 == uid {
                    Some((e.p2, e.beta))
                } else if e.p2 == uid && !directed {
                    Some((e.p1, e.beta))
                } else {
                    None
                }
            })
            .collect()
    }

    /// Update topology for the current tick.  `alive` lists every active
    /// agent in ascending uid order.
    fn step(&mut self, ctx: StepContext<'_>, alive: &[Uid]) -> NetworkResult<()>;

    /// Newly born agents.  Most networks pick them up at the next `step`.
    fn add_agents(&mut self, _uids: &[Uid]) {}

    /// Drop every edge touching a removed agent.
    fn remove_agents(&mut self, uids: &[Uid]);
}
