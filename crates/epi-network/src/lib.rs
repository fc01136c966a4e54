//! `epi-network` — contact networks for the `rust_epi` simulation kernel.
//!
//! # Crate layout
//!
//! | Module               | Contents                                          |
//! |----------------------|---------------------------------------------------|
//! | [`edges`]            | `Edge`, `EdgeList` (SoA edge storage)             |
//! | [`network`]          | `ContactNetwork` trait                            |
//! | [`static_network`]   | `StaticNetwork` — fixed edges, indexed contacts   |
//! | [`random`]           | `RandomNetwork` — redrawn every tick              |
//! | [`dynamic`]          | `DynamicNetwork` — formation rate + durations     |
//! | [`error`]            | `NetworkError`, `NetworkResult`                   |
//!
//! All randomness comes from keyed draws on the network's own stream (derived
//! from its name), so a network's topology does not depend on which other
//! modules are registered.

pub mod dynamic;
pub mod edges;
pub mod error;
pub mod network;
pub mod random;
pub mod static_network;


pub use dynamic::{DynamicNetConfig, DynamicNetwork};
pub use edges::{Edge, EdgeList};
pub use error::{NetworkError, NetworkResult};
pub use network::ContactNetwork;
pub use random::{RandomNetConfig, RandomNetwork};
pub use static_network::StaticNetwork;
