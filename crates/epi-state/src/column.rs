//! Type-erased, heterogeneous state columns keyed by name.
//!
//! # Design
//!
//! Each state is stored as a `TypedColumn<T>` (a `Vec<T>` plus its default)
//! behind a `Box<dyn StateColumn>` in a `HashMap<String, …>`.  Indexing is
//! always by `Uid` (`values[uid.index()]`), so every column in a store has
//! the same length as the store itself.
//!
//! The sealed [`StateValue`] trait limits element types to `bool` flags,
//! `f64` values and `u16` categorical codes.

use std::any::Any;
use std::collections::HashMap;
use std::fmt::Debug;

// ── Element types ─────────────────────────────────────────────────────────────

/// The dtype of a state column.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum StateKind {
    Bool,
    Float,
    Cat,
}

/// A type that can be stored in a state column.
pub trait StateValue: Copy + PartialEq + Debug + Send + Sync + 'static + sealed::Sealed {
    const KIND: StateKind;
}

impl StateValue for bool {
    const KIND: StateKind = StateKind::Bool;
}

impl StateValue for f64 {
    const KIND: StateKind = StateKind::Float;
}

impl StateValue for u16 {
    const KIND: StateKind = StateKind::Cat;
}

// ── Trait object ──────────────────────────────────────────────────────────────

/// Type-erased interface for one per-agent column.
///
/// Sealed so that external implementations cannot break the length
/// invariant.
pub trait StateColumn: Send + Sync + 'static + sealed::Sealed {
    /// Append the column default for a newly created agent.
    fn push_default(&mut self);

    /// Current element count (always equals the owning store's length).
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn kind(&self) -> StateKind;

    /// Restore the default value at `index`.
    fn reset(&mut self, index: usize);

    #[doc(hidden)]
    fn as_any(&self) -> &dyn Any;

    #[doc(hidden)]
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

mod sealed {
    pub trait Sealed {}

    impl Sealed for bool {}
    impl Sealed for f64 {}
    impl Sealed for u16 {}
}

// ── Concrete column ───────────────────────────────────────────────────────────

/// A `Vec<T>` and the value new rows start with.
pub struct TypedColumn<T: StateValue> {
    pub default: T,
    pub values:  Vec<T>,
}

impl<T: StateValue> sealed::Sealed for TypedColumn<T> {}

impl<T: StateValue> StateColumn for TypedColumn<T> {
    fn push_default(&mut self) {
        self.values.push(self.default);
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    fn kind(&self) -> StateKind {
        T::KIND
    }

    fn reset(&mut self, index: usize) {
        self.values[index] = self.default;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ── ColumnMap ─────────────────────────────────────────────────────────────────

/// Registry of named columns, remembering definition order.
#[derive(Default)]
pub struct ColumnMap {
    map:   HashMap<String, Box<dyn StateColumn>>,
    order: Vec<String>,
}

impl ColumnMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register column `name`, pre-filling `current_count` default values.
    ///
    /// Returns `false` (and leaves existing data untouched) if the name is
    /// already taken.
    pub fn register<T: StateValue>(&mut self, name: &str, default: T, current_count: usize) -> bool {
        if self.map.contains_key(name) {
            return false;
        }
        let column = TypedColumn { default, values: vec![default; current_count] };
        self.map.insert(name.to_owned(), Box::new(column));
        self.order.push(name.to_owned());
        true
    }

    /// Append the default for every registered column.
    pub(crate) fn push_defaults(&mut self) {
        for column in self.map.values_mut() {
            column.push_default();
        }
    }

    pub fn get_dyn(&self, name: &str) -> Option<&(dyn StateColumn + 'static)> {
        self.map.get(name).map(|c| &**c)
    }

    pub fn get_dyn_mut(&mut self, name: &str) -> Option<&mut (dyn StateColumn + 'static)> {
        self.map.get_mut(name).map(|c| &mut **c)
    }

    /// Typed column, or `None` if absent or of a different dtype.
    pub fn get<T: StateValue>(&self, name: &str) -> Option<&TypedColumn<T>> {
        self.get_dyn(name)
            .and_then(|c| c.as_any().downcast_ref::<TypedColumn<T>>())
    }

    /// Column names in definition order.
    pub fn names(&self) -> &[String] {
        &self.order
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
