//! `epi-disease` — disease modules for the `rust_epi` simulation kernel.
//!
//! # Crate layout
//!
//! | Module           | Contents                                                   |
//! |------------------|------------------------------------------------------------|
//! | [`config`]       | `DiseaseKind`, `ParValue`, `DiseaseConfig`, `DiseasePars`  |
//! | [`disease`]      | `Disease`, standard state names                            |
//! | [`pipeline`]     | `Pipeline`, `Stage`, `Transition`, `StepOutcome`           |
//! | [`transmission`] | `Disease::make_new_cases`, `NewCases`                      |
//! | [`prognosis`]    | `Disease::set_prognoses`                                   |
//! | [`counts`]       | `DiseaseCounts`, `InfectionRecord`                         |
//! | [`error`]        | `DiseaseError`, `DiseaseResult<T>`                         |
//!
//! # Time
//!
//! `ti_*` columns hold event times in timestep units (the `Tick` axis);
//! `NaN` means "not scheduled".  An event is due once `ti <= tick`.
//! Durations in [`DiseasePars`] are in model time units and are divided by
//! `dt` when scheduled.
//!
//! # A tick, from a disease's point of view
//!
//! 1. [`Disease::step_state`] runs the pipeline and returns death requests.
//! 2. The simulation removes the dead everywhere via [`Disease::step_die`].
//! 3. Interventions may edit states (e.g. `rel_sus`, [`Disease::cure`]).
//! 4. [`Disease::make_new_cases`] evaluates every network edge, then
//!    [`Disease::set_prognoses`] applies the result.

pub mod config;
pub mod counts;
pub mod disease;
pub mod error;
pub mod pipeline;
pub mod prognosis;
pub mod transmission;

#[cfg(test)]
mod tests;

pub use config::{DiseaseConfig, DiseaseKind, DiseasePars, ParValue};
pub use counts::{DiseaseCounts, InfectionRecord};
pub use disease::Disease;
pub use error::{DiseaseError, DiseaseResult};
pub use pipeline::{Pipeline, Stage, StepOutcome, Transition, TransitionFn};
pub use transmission::NewCases;
