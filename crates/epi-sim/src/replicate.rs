//! Independent replicate runs.
//!
//! Each replicate builds its own [`Sim`] and observer from its seed, so no
//! mutable state is shared.  With the `parallel` feature the replicates run
//! on Rayon's thread pool; results come back in seed order either way.

use tracing::info;

use crate::{RunStatus, Sim, SimObserver, SimResult};

/// One finished replicate.
pub struct Replicate<O> {
    pub seed:     u64,
    pub status:   RunStatus,
    pub observer: O,
}

/// Build and run one simulation per seed.
///
/// `factory(seed)` must return a fresh `Sim` (typically built with
/// `config.seed = seed`) and the observer that will collect its results.
/// The first error stops the whole batch.
pub fn run_replicates<F, O>(seeds: &[u64], factory: F) -> SimResult<Vec<Replicate<O>>>
where
    F: Fn(u64) -> SimResult<(Sim, O)> + Sync,
    O: SimObserver + Send,
{
    info!(replicates = seeds.len(), parallel = cfg!(feature = "parallel"), "running replicates");

    let run_one = |&seed: &u64| -> SimResult<Replicate<O>> {
        let (mut sim, mut observer) = factory(seed)?;
        let status = sim.run(&mut observer)?;
        Ok(Replicate { seed, status, observer })
    };

    #[cfg(not(feature = "parallel"))]
    {
        seeds.iter().map(run_one).collect()
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        seeds.par_iter().map(run_one).collect()
    }
}
