//! `epi-intervention` — interventions for the `rust_epi` simulation kernel.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`product`]     | `Product` (`Vaccine`, `Treatment`, `Diagnostic`)           |
//! | [`eligibility`] | `Eligibility` — declarative targeting rules                |
//! | [`config`]      | `InterventionConfig`, `Delivery`                           |
//! | [`engine`]      | `InterventionEngine`, `Intervention`, `Delivered`          |
//! | [`error`]       | `InterventionError`, `InterventionResult<T>`               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                      |
//! |---------|-------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on the configuration types. |

pub mod config;
pub mod eligibility;
pub mod engine;
pub mod error;
pub mod product;


pub use config::{Delivery, InterventionConfig};
pub use eligibility::{Eligibility, EligibilityFn};
pub use engine::{Delivered, Intervention, InterventionEngine};
pub use error::{InterventionError, InterventionResult};
pub use product::Product;
