//! `epi-state` — named, typed per-agent state columns for `rust_epi`.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                    |
//! |---------------|-------------------------------------------------------------|
//! | [`column`]    | `StateKind`, `StateValue`, `StateColumn`, `TypedColumn<T>`, `ColumnMap` |
//! | [`store`]     | `StateStore` (columns + active mask)                        |
//! | [`builder`]   | `StateStoreBuilder` (fluent construction)                   |
//! | [`def`]       | `StateDef`, `StateInit` (configuration records)             |
//! | [`error`]     | `StateError`, `StateResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                      |
//! |---------|-------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `StateDef`, `StateInit`, `StateKind`. |

pub mod builder;
pub mod column;
pub mod def;
pub mod error;
pub mod store;


pub use builder::StateStoreBuilder;
pub use column::{ColumnMap, StateColumn, StateKind, StateValue, TypedColumn};
pub use def::{StateDef, StateInit};
pub use error::{StateError, StateResult};
pub use store::StateStore;
