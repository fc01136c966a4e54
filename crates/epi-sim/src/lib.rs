//! `epi-sim` — tick scheduler for the rust_epi simulation kernel.
//!
//! # Tick loop
//!
//! ```text
//! for tick in 0..config.n_steps:
//!   ① Demographics — births append agents to every store;
//!                    background deaths become removal requests.
//!   ② Progression  — Disease::step_state for each disease, in order.
//!   ③ Deaths       — union of requests removed from the population,
//!                    every disease (step_die) and every network.
//!   ④ Networks     — ContactNetwork::step over the surviving agents.
//!   ⑤ Interventions— InterventionEngine::apply, in registration order.
//!   ⑥ Transmission — make_new_cases then set_prognoses, per disease.
//!   ⑦ Report       — optional invariant checks, ageing, observer hooks.
//! ```
//!
//! Every random value comes from the run's `DrawStream`, keyed by tick,
//! module and agent, so a run is a pure function of its configuration and
//! seed.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | `run_replicates` uses Rayon's thread pool.             |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use epi_core::SimConfig;
//! use epi_disease::{Disease, DiseaseConfig, DiseaseKind};
//! use epi_network::{RandomNetConfig, RandomNetwork};
//! use epi_sim::{NoopObserver, SimBuilder};
//!
//! let sir = Disease::new(DiseaseConfig::new("sir", DiseaseKind::Sir).par("beta", 0.1))?;
//! let mut sim = SimBuilder::new(SimConfig::default())
//!     .disease(sir)
//!     .network(RandomNetwork::new(RandomNetConfig::default())?)
//!     .build()?;
//! sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod control;
pub mod demographics;
pub mod error;
pub mod observer;
pub mod population;
pub mod replicate;
pub mod sim;


pub use builder::SimBuilder;
pub use control::{AbortHandle, RunStatus};
pub use demographics::{AgeRates, Births, DeathRates, Deaths, Demographics};
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, ReportLog, SimObserver, TickReport};
pub use population::Population;
pub use replicate::{Replicate, run_replicates};
pub use sim::Sim;
