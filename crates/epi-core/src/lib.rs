//! `epi-core` — foundational types for the `rust_epi` simulation kernel.
//!
//! This crate is a dependency of every other `epi-*` crate.  It has no
//! `epi-*` dependencies and only a handful of external ones (`rand`,
//! `rand_distr`, `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                               |
//! |-----------------|--------------------------------------------------------|
//! | [`ids`]         | `Uid`                                                  |
//! | [`time`]        | `Tick`, `SimClock`, `SimConfig`                        |
//! | [`rng`]         | `DrawStream`, `DrawKey`, `Purpose`, `StreamId`, `StreamRng` |
//! | [`dist`]        | `Dist` (config form), `Sampler` (validated form)       |
//! | [`context`]     | `StepContext` — per-tick view handed to every module   |
//! | [`error`]       | `CoreError`, `CoreResult`                              |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to config-facing types.     |

pub mod context;
pub mod dist;
pub mod error;
pub mod ids;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use context::StepContext;
pub use dist::{Dist, Sampler};
pub use error::{CoreError, CoreResult};
pub use ids::Uid;
pub use rng::{DrawKey, DrawStream, Purpose, StreamId, StreamRng};
pub use time::{SimClock, SimConfig, Tick};
