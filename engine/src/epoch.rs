//! Epoch-checked store.
//!
//! The dynamic counterpart of [`Scope`](crate::Scope). Handles are plain
//! `'static` values stamped with the epoch of the store that minted them, so
//! they can be stored anywhere, including past the end of their scope. The
//! border check moves to run time: every access compares the handle's epoch
//! with the store's and refuses closed stores.
//!
//! Useful where a handle must outlive a closure (stored in a long-lived
//! structure, shipped across an API that cannot carry a lifetime), at the
//! cost of turning compile errors into [`StoreError::ForeignReference`] and
//! [`StoreError::ScopeClosed`].

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;

use corral_types::{RefId, ScopeSerial, ScopeState, StoreError};

use crate::scope::{next_serial, opened};
use crate::store::{StoreEngine, StoreOptions};

/// Handle into an [`EpochStore`].
///
/// Invariant in `T`, like [`Ref`](crate::Ref):
///
/// ```compile_fail
/// corral_engine::run_epoch_scoped(|store| {
///     let cell = store.alloc::<for<'a> fn(&'a u8)>(|_| {}).unwrap();
///     let widened: corral_engine::EpochRef<fn(&'static u8)> = cell;
/// });
/// ```
pub struct EpochRef<T> {
    epoch: ScopeSerial,
    id: RefId,
    _cell: PhantomData<fn(T) -> T>,
}

impl<T> EpochRef<T> {
    #[must_use]
    pub fn id(&self) -> RefId {
        self.id
    }

    /// Epoch of the store that minted this handle.
    #[must_use]
    pub fn epoch(&self) -> ScopeSerial {
        self.epoch
    }
}

impl<T> Clone for EpochRef<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for EpochRef<T> {}

impl<T> PartialEq for EpochRef<T> {
    fn eq(&self, other: &Self) -> bool {
        self.epoch == other.epoch && self.id == other.id
    }
}

impl<T> Eq for EpochRef<T> {}

impl<T> fmt::Debug for EpochRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EpochRef")
            .field("epoch", &self.epoch.value())
            .field("id", &self.id.value())
            .finish()
    }
}

/// A store whose scope tag is a runtime epoch.
///
/// Lifecycle is explicit: [`EpochStore::open`] yields an open store,
/// [`EpochStore::close`] discards every cell and refuses further access.
/// Dropping an open store closes it.
pub struct EpochStore {
    store: StoreEngine,
    epoch: ScopeSerial,
    state: ScopeState,
}

impl EpochStore {
    #[must_use]
    pub fn open(options: &StoreOptions) -> Self {
        let epoch = next_serial();
        tracing::debug!(scope = %epoch, "epoch store opened");
        Self {
            store: StoreEngine::new(options),
            epoch,
            state: opened(),
        }
    }

    #[must_use]
    pub const fn epoch(&self) -> ScopeSerial {
        self.epoch
    }

    #[must_use]
    pub const fn state(&self) -> ScopeState {
        self.state
    }

    pub fn alloc<T: Any>(&mut self, value: T) -> Result<EpochRef<T>, StoreError> {
        self.ensure_open()?;
        let id = self.store.allocate(value);
        tracing::trace!(scope = %self.epoch, cell = %id, "alloc");
        Ok(EpochRef {
            epoch: self.epoch,
            id,
            _cell: PhantomData,
        })
    }

    pub fn read<T: Any + Clone>(&self, cell: EpochRef<T>) -> Result<T, StoreError> {
        self.ensure_owned(cell)?;
        self.store.read(cell.id)
    }

    pub fn get<T: Any>(&self, cell: EpochRef<T>) -> Result<&T, StoreError> {
        self.ensure_owned(cell)?;
        self.store.get(cell.id)
    }

    pub fn write<T: Any>(&mut self, cell: EpochRef<T>, value: T) -> Result<(), StoreError> {
        self.ensure_owned(cell)?;
        self.store.write(cell.id, value)
    }

    /// Write `value` and return what the cell held before.
    pub fn replace<T: Any>(&mut self, cell: EpochRef<T>, value: T) -> Result<T, StoreError> {
        self.ensure_owned(cell)?;
        self.store.replace(cell.id, value)
    }

    pub fn modify<T: Any, F>(&mut self, cell: EpochRef<T>, f: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut T),
    {
        self.ensure_owned(cell)?;
        self.store.modify(cell.id, f)
    }

    /// Close the store and drop every cell. Handles minted here become
    /// permanently unusable.
    pub fn close(&mut self) -> Result<(), StoreError> {
        self.state = self
            .state
            .close()
            .map_err(|_| StoreError::ScopeClosed { scope: self.epoch })?;
        let cells = self.store.live();
        self.store.clear();
        tracing::debug!(scope = %self.epoch, cells, "epoch store closed");
        Ok(())
    }

    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.state.is_open() {
            Ok(())
        } else {
            Err(StoreError::ScopeClosed { scope: self.epoch })
        }
    }

    fn ensure_owned<T>(&self, cell: EpochRef<T>) -> Result<(), StoreError> {
        self.ensure_open()?;
        if cell.epoch != self.epoch {
            tracing::warn!(
                handle = %cell.epoch,
                store = %self.epoch,
                "rejected reference from another scope"
            );
            return Err(StoreError::ForeignReference {
                handle: cell.epoch,
                store: self.epoch,
            });
        }
        Ok(())
    }
}

impl Drop for EpochStore {
    fn drop(&mut self) {
        if self.state.is_open() {
            let _ = self.close();
        }
    }
}

/// Open an [`EpochStore`], run `f` against it, and close it on every exit
/// path.
pub fn run_epoch_scoped<R, F>(f: F) -> R
where
    F: FnOnce(&mut EpochStore) -> R,
{
    run_epoch_scoped_with(&StoreOptions::default(), f)
}

pub fn run_epoch_scoped_with<R, F>(options: &StoreOptions, f: F) -> R
where
    F: FnOnce(&mut EpochStore) -> R,
{
    let mut store = EpochStore::open(options);
    f(&mut store)
}
