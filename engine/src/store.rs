//! Store engine: the mutable state owned by one scope.
//!
//! An untyped arena of cells keyed by [`RefId`]. Typing and scope tagging
//! are layered on top by [`Scope`](crate::Scope) and
//! [`EpochStore`](crate::EpochStore); this type only knows ids.
//!
//! # Invariants
//!
//! - Every key in `cells` is strictly below `next`.
//! - Cells are never removed while the store lives, so the key set is
//!   exactly the set of ids handed out so far.

use std::any::Any;
use std::collections::HashMap;
use std::mem;

use corral_types::{RefId, StoreError};

/// Sizing hints for a fresh store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreOptions {
    capacity_hint: usize,
}

impl StoreOptions {
    #[must_use]
    pub const fn with_capacity_hint(mut self, cells: usize) -> Self {
        self.capacity_hint = cells;
        self
    }

    #[must_use]
    pub const fn capacity_hint(&self) -> usize {
        self.capacity_hint
    }
}

pub(crate) struct StoreEngine {
    next: u64,
    cells: HashMap<RefId, Box<dyn Any>>,
}

impl StoreEngine {
    pub(crate) fn new(options: &StoreOptions) -> Self {
        Self {
            next: 0,
            cells: HashMap::with_capacity(options.capacity_hint()),
        }
    }

    pub(crate) fn allocate<T: Any>(&mut self, value: T) -> RefId {
        let id = RefId::new(self.next);
        self.next += 1;
        self.cells.insert(id, Box::new(value));
        id
    }

    pub(crate) fn get<T: Any>(&self, id: RefId) -> Result<&T, StoreError> {
        let cell = self
            .cells
            .get(&id)
            .ok_or(StoreError::DanglingReference { id })?;
        cell.downcast_ref::<T>()
            .ok_or_else(|| StoreError::type_mismatch::<T>(id))
    }

    pub(crate) fn get_mut<T: Any>(&mut self, id: RefId) -> Result<&mut T, StoreError> {
        let cell = self
            .cells
            .get_mut(&id)
            .ok_or(StoreError::DanglingReference { id })?;
        cell.downcast_mut::<T>()
            .ok_or_else(|| StoreError::type_mismatch::<T>(id))
    }

    pub(crate) fn read<T: Any + Clone>(&self, id: RefId) -> Result<T, StoreError> {
        self.get::<T>(id).cloned()
    }

    pub(crate) fn write<T: Any>(&mut self, id: RefId, value: T) -> Result<(), StoreError> {
        *self.get_mut::<T>(id)? = value;
        Ok(())
    }

    pub(crate) fn replace<T: Any>(&mut self, id: RefId, value: T) -> Result<T, StoreError> {
        Ok(mem::replace(self.get_mut::<T>(id)?, value))
    }

    pub(crate) fn modify<T: Any, F>(&mut self, id: RefId, f: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut T),
    {
        f(self.get_mut::<T>(id)?);
        Ok(())
    }

    /// Number of ids handed out; also the next id to be allocated.
    pub(crate) const fn allocated(&self) -> u64 {
        self.next
    }

    pub(crate) fn live(&self) -> usize {
        self.cells.len()
    }

    pub(crate) fn check_invariants(&self) -> bool {
        self.cells.keys().all(|id| id.value() < self.next)
            && self.cells.len() as u64 == self.next
    }

    /// Drops every cell. Used by stores with an explicit close.
    pub(crate) fn clear(&mut self) {
        self.cells.clear();
    }
}
