//! Fluent builder for a pre-sized `StateStore`.
//!
//! # Usage
//!
//! ```rust
//! use epi_state::{StateInit, StateStoreBuilder};
//!
//! let store = StateStoreBuilder::new(10_000)
//!     .define("infected", StateInit::Bool(false))
//!     .define("rel_sus", StateInit::Float(1.0))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(store.len(), 10_000);
//! assert_eq!(store.n_active(), 10_000);
//! ```

use crate::{StateDef, StateInit, StateResult, StateStore};

/// Collects column definitions, then allocates every column at its final
/// length in one pass.
pub struct StateStoreBuilder {
    count: usize,
    defs:  Vec<StateDef>,
}

impl StateStoreBuilder {
    /// A builder for a store with `count` active rows.
    pub fn new(count: usize) -> Self {
        Self { count, defs: Vec::new() }
    }

    pub fn define(mut self, name: impl Into<String>, default: StateInit) -> Self {
        self.defs.push(StateDef { name: name.into(), default });
        self
    }

    pub fn states<'a>(mut self, defs: impl IntoIterator<Item = &'a StateDef>) -> Self {
        self.defs.extend(defs.into_iter().cloned());
        self
    }

    /// Fails with `DuplicateState` if a name was defined twice.
    pub fn build(self) -> StateResult<StateStore> {
        let mut store = StateStore::new();
        for def in &self.defs {
            store.define_from(def)?;
        }
        store.add_agents(self.count);
        Ok(store)
    }
}
