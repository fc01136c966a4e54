//! `StateStore` — per-agent state columns plus the active-row mask.
//!
//! # Row lifecycle
//!
//! Rows are only ever appended.  Removing an agent clears its `active` bit
//! but keeps every column value, so event records that mention a dead
//! agent's `Uid` can still be resolved.  Reads and writes address rows by
//! `Uid` and cost O(k) for k uids; nothing here scans the population unless
//! the method name says so (`uids_where`, `count`, `set_where`, …).

use epi_core::Uid;

use crate::column::{ColumnMap, StateColumn, StateKind, StateValue, TypedColumn};
use crate::{StateDef, StateError, StateInit, StateResult};

/// Structure-of-Arrays storage for one module's per-agent states.
///
/// ```ignore
/// let infected: &[bool] = store.column::<bool>("infected")?;
/// if infected[uid.index()] { … }          // O(1), cache-friendly
/// ```
#[derive(Default)]
pub struct StateStore {
    count:    usize,
    active:   Vec<bool>,
    n_active: usize,
    columns:  ColumnMap,
}

impl StateStore {
    /// An empty store with no rows and no columns.
    pub fn new() -> Self {
        Self::default()
    }

    // ── Rows ──────────────────────────────────────────────────────────────

    /// Rows ever created (active or not).
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    pub fn n_active(&self) -> usize {
        self.n_active
    }

    /// `false` for removed agents and for uids never created.
    #[inline]
    pub fn is_active(&self, uid: Uid) -> bool {
        self.active.get(uid.index()).copied().unwrap_or(false)
    }

    /// The active mask, indexed by `Uid`.
    pub fn active(&self) -> &[bool] {
        &self.active
    }

    /// All active uids in ascending order.  O(rows).
    pub fn active_uids(&self) -> Vec<Uid> {
        self.active
            .iter()
            .enumerate()
            .filter(|(_, a)| **a)
            .map(|(i, _)| Uid(i as u32))
            .collect()
    }

    /// Append `n` rows with default values in every column.
    pub fn add_agents(&mut self, n: usize) -> Vec<Uid> {
        let start = self.count;
        for _ in 0..n {
            self.columns.push_defaults();
            self.active.push(true);
        }
        self.count += n;
        self.n_active += n;
        Uid::range(start, self.count).collect()
    }

    /// Mark rows inactive.
    ///
    /// All uids are validated before anything changes: an unknown uid, an
    /// already-removed uid, or a uid repeated in `uids` fails the whole call
    /// with [`StateError::InvalidUid`].
    pub fn remove_agents(&mut self, uids: &[Uid]) -> StateResult<()> {
        if let Some(&bad) = uids.iter().find(|u| !self.is_active(**u)) {
            return Err(StateError::InvalidUid(bad));
        }
        let mut sorted = uids.to_vec();
        sorted.sort_unstable();
        if let Some(w) = sorted.windows(2).find(|w| w[0] == w[1]) {
            return Err(StateError::InvalidUid(w[0]));
        }
        for &uid in uids {
            self.active[uid.index()] = false;
        }
        self.n_active -= uids.len();
        Ok(())
    }

    /// Fail with `InvalidUid` if any uid was never created.
    pub fn check_uids(&self, uids: &[Uid]) -> StateResult<()> {
        match uids.iter().find(|u| u.index() >= self.count) {
            Some(&bad) => Err(StateError::InvalidUid(bad)),
            None => Ok(()),
        }
    }

    // ── Schema ────────────────────────────────────────────────────────────

    /// Add a column; every existing row gets `default`.
    pub fn define<T: StateValue>(&mut self, name: &str, default: T) -> StateResult<()> {
        if self.columns.register(name, default, self.count) {
            Ok(())
        } else {
            Err(StateError::DuplicateState(name.to_owned()))
        }
    }

    /// Add a column from its configuration record.
    pub fn define_from(&mut self, def: &StateDef) -> StateResult<()> {
        match def.default {
            StateInit::Bool(v) => self.define(&def.name, v),
            StateInit::Float(v) => self.define(&def.name, v),
            StateInit::Cat(v) => self.define(&def.name, v),
        }
    }

    /// Add a column unless one with the same name and dtype already exists.
    pub fn ensure<T: StateValue>(&mut self, name: &str, default: T) -> StateResult<()> {
        match self.kind(name) {
            None => self.define(name, default),
            Some(kind) if kind == T::KIND => Ok(()),
            Some(found) => Err(StateError::TypeMismatch {
                name:     name.to_owned(),
                expected: T::KIND,
                found,
            }),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains(name)
    }

    pub fn kind(&self, name: &str) -> Option<StateKind> {
        self.columns.get_dyn(name).map(|c| c.kind())
    }

    /// Column names in definition order.
    pub fn names(&self) -> &[String] {
        self.columns.names()
    }

    // ── Whole-column access ───────────────────────────────────────────────

    /// Read-only slice of column `name`, indexed by `Uid`.
    pub fn column<T: StateValue>(&self, name: &str) -> StateResult<&[T]> {
        Ok(&self.typed::<T>(name)?.values)
    }

    /// Mutable slice of column `name`.  The length is fixed; rows are only
    /// added through [`add_agents`](Self::add_agents).
    pub fn column_mut<T: StateValue>(&mut self, name: &str) -> StateResult<&mut [T]> {
        Ok(&mut self.typed_mut::<T>(name)?.values)
    }

    pub fn default_of<T: StateValue>(&self, name: &str) -> StateResult<T> {
        Ok(self.typed::<T>(name)?.default)
    }

    // ── Indexed access ────────────────────────────────────────────────────

    pub fn get<T: StateValue>(&self, name: &str, uids: &[Uid]) -> StateResult<Vec<T>> {
        self.check_uids(uids)?;
        let values = self.column::<T>(name)?;
        Ok(uids.iter().map(|u| values[u.index()]).collect())
    }

    pub fn get_one<T: StateValue>(&self, name: &str, uid: Uid) -> StateResult<T> {
        self.check_uids(&[uid])?;
        Ok(self.column::<T>(name)?[uid.index()])
    }

    /// Write `values[i]` to row `uids[i]`.
    pub fn set<T: StateValue>(&mut self, name: &str, uids: &[Uid], values: &[T]) -> StateResult<()> {
        if uids.len() != values.len() {
            return Err(StateError::LengthMismatch {
                name:     name.to_owned(),
                expected: uids.len(),
                got:      values.len(),
            });
        }
        self.check_uids(uids)?;
        let column = self.column_mut::<T>(name)?;
        for (uid, &v) in uids.iter().zip(values) {
            column[uid.index()] = v;
        }
        Ok(())
    }

    /// Write the same value to every row in `uids`.
    pub fn fill<T: StateValue>(&mut self, name: &str, uids: &[Uid], value: T) -> StateResult<()> {
        self.check_uids(uids)?;
        let column = self.column_mut::<T>(name)?;
        for uid in uids {
            column[uid.index()] = value;
        }
        Ok(())
    }

    /// Restore the column default for `uids`, whatever the dtype.
    pub fn reset(&mut self, name: &str, uids: &[Uid]) -> StateResult<()> {
        self.check_uids(uids)?;
        let column = self
            .columns
            .get_dyn_mut(name)
            .ok_or_else(|| StateError::UnknownState(name.to_owned()))?;
        for uid in uids {
            column.reset(uid.index());
        }
        Ok(())
    }

    // ── Mask queries and bulk updates ─────────────────────────────────────

    /// Active uids whose bool column `mask` is true.  O(rows).
    pub fn uids_where(&self, mask: &str) -> StateResult<Vec<Uid>> {
        let flags = self.column::<bool>(mask)?;
        Ok(flags
            .iter()
            .zip(&self.active)
            .enumerate()
            .filter(|(_, (f, a))| **f && **a)
            .map(|(i, _)| Uid(i as u32))
            .collect())
    }

    /// Active uids for which `pred` holds on column `name`.  O(rows).
    pub fn uids_matching<T: StateValue>(
        &self,
        name: &str,
        pred: impl Fn(T) -> bool,
    ) -> StateResult<Vec<Uid>> {
        let values = self.column::<T>(name)?;
        Ok(values
            .iter()
            .zip(&self.active)
            .enumerate()
            .filter(|(_, (v, a))| **a && pred(**v))
            .map(|(i, _)| Uid(i as u32))
            .collect())
    }

    /// Active uids with `flag` set and event time `ti` at or before `now`.
    /// Unscheduled (NaN) times never match.  O(rows).
    pub fn uids_due(&self, flag: &str, ti: &str, now: f64) -> StateResult<Vec<Uid>> {
        let flags = self.column::<bool>(flag)?;
        let times = self.column::<f64>(ti)?;
        Ok((0..self.count)
            .filter(|&i| self.active[i] && flags[i] && times[i] <= now)
            .map(|i| Uid(i as u32))
            .collect())
    }

    /// Set `name = value` on every active row where `mask` is true.
    /// Returns the number of rows written.
    pub fn set_where<T: StateValue>(&mut self, name: &str, mask: &str, value: T) -> StateResult<usize> {
        let uids = self.uids_where(mask)?;
        self.fill(name, &uids, value)?;
        Ok(uids.len())
    }

    /// Number of active rows where bool column `mask` is true.  O(rows).
    pub fn count(&self, mask: &str) -> StateResult<usize> {
        let flags = self.column::<bool>(mask)?;
        Ok(flags.iter().zip(&self.active).filter(|(f, a)| **f && **a).count())
    }

    /// Number of rows (active or not) where bool column `mask` is true.
    pub fn count_all(&self, mask: &str) -> StateResult<usize> {
        Ok(self.column::<bool>(mask)?.iter().filter(|f| **f).count())
    }

    // ── Internal ──────────────────────────────────────────────────────────

    fn typed<T: StateValue>(&self, name: &str) -> StateResult<&TypedColumn<T>> {
        let column = self
            .columns
            .get_dyn(name)
            .ok_or_else(|| StateError::UnknownState(name.to_owned()))?;
        let found = column.kind();
        column
            .as_any()
            .downcast_ref::<TypedColumn<T>>()
            .ok_or_else(|| StateError::TypeMismatch { name: name.to_owned(), expected: T::KIND, found })
    }

    fn typed_mut<T: StateValue>(&mut self, name: &str) -> StateResult<&mut TypedColumn<T>> {
        let column = self
            .columns
            .get_dyn_mut(name)
            .ok_or_else(|| StateError::UnknownState(name.to_owned()))?;
        let found = column.kind();
        column
            .as_any_mut()
            .downcast_mut::<TypedColumn<T>>()
            .ok_or_else(|| StateError::TypeMismatch { name: name.to_owned(), expected: T::KIND, found })
    }
}
