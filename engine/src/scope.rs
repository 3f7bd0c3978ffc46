//! Scope boundary.
//!
//! [`run_scoped`] opens a fresh store, hands the caller a `&mut Scope<'id>`
//! for a brand-new `'id`, and discards the store when the closure returns.
//!
//! # Key Invariant
//!
//! The closure must be valid for *every* `'id` (`for<'id> FnOnce(...)`), and
//! its result type `R` is chosen outside that binder, so `R` cannot mention
//! `'id`. A handle therefore cannot be returned from a scope:
//!
//! ```compile_fail
//! let leaked = corral_engine::run_scoped(|scope| scope.alloc("a"));
//! ```
//!
//! Nor can a handle minted by one scope be used against another, because
//! the two brands never unify:
//!
//! ```compile_fail
//! corral_engine::run_scoped(|a| {
//!     let first = a.alloc(1);
//!     let _second = a.alloc(2);
//!     let _third = a.alloc(3);
//!     corral_engine::run_scoped(|b| b.read(first))
//! });
//! ```
//!
//! Smuggling a handle out through captured state fails the same way:
//!
//! ```compile_fail
//! let mut slot = None;
//! corral_engine::run_scoped(|scope| {
//!     slot = Some(scope.alloc(0_u8));
//! });
//! ```

use std::any::Any;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;

use corral_types::{RefId, ScopeSerial, ScopeState, StoreError};

use crate::brand::Brand;
use crate::handle::Ref;
use crate::store::{StoreEngine, StoreOptions};

static SCOPE_SERIAL: AtomicU64 = AtomicU64::new(1);

pub(crate) fn next_serial() -> ScopeSerial {
    ScopeSerial::new(SCOPE_SERIAL.fetch_add(1, Ordering::Relaxed))
}

/// State of a store that was just created.
pub(crate) fn opened() -> ScopeState {
    ScopeState::default()
        .open()
        .expect("a new store starts unopened")
}

/// The live store of one `run_scoped` call.
///
/// Possessing `&mut Scope<'id>` is the proof that the scope is open; the
/// value is dropped, and the store discarded, before `run_scoped` returns.
pub struct Scope<'id> {
    store: StoreEngine,
    serial: ScopeSerial,
    state: ScopeState,
    _brand: Brand<'id>,
}

impl Scope<'_> {
    fn open(options: &StoreOptions) -> Self {
        let serial = next_serial();
        tracing::debug!(scope = %serial, capacity = options.capacity_hint(), "scope opened");
        Self {
            store: StoreEngine::new(options),
            serial,
            state: opened(),
            _brand: Brand::new(),
        }
    }
}

impl<'id> Scope<'id> {
    /// Allocate a new cell holding `value`.
    pub fn alloc<T: Any>(&mut self, value: T) -> Ref<'id, T> {
        let id = self.store.allocate(value);
        tracing::trace!(scope = %self.serial, cell = %id, "alloc");
        Ref::new(id)
    }

    /// Clone the current value out of a cell.
    pub fn read<T: Any + Clone>(&self, cell: Ref<'id, T>) -> Result<T, StoreError> {
        tracing::trace!(scope = %self.serial, cell = %cell.id(), "read");
        self.store.read(cell.id())
    }

    /// Borrow a cell's value without cloning it.
    pub fn get<T: Any>(&self, cell: Ref<'id, T>) -> Result<&T, StoreError> {
        tracing::trace!(scope = %self.serial, cell = %cell.id(), "get");
        self.store.get(cell.id())
    }

    pub fn write<T: Any>(&mut self, cell: Ref<'id, T>, value: T) -> Result<(), StoreError> {
        tracing::trace!(scope = %self.serial, cell = %cell.id(), "write");
        self.store.write(cell.id(), value)
    }

    /// Write `value` and return what the cell held before.
    pub fn replace<T: Any>(&mut self, cell: Ref<'id, T>, value: T) -> Result<T, StoreError> {
        tracing::trace!(scope = %self.serial, cell = %cell.id(), "replace");
        self.store.replace(cell.id(), value)
    }

    /// Update a cell in place.
    pub fn modify<T: Any, F>(&mut self, cell: Ref<'id, T>, f: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut T),
    {
        tracing::trace!(scope = %self.serial, cell = %cell.id(), "modify");
        self.store.modify(cell.id(), f)
    }

    #[must_use]
    pub const fn serial(&self) -> ScopeSerial {
        self.serial
    }

    /// Number of cells allocated so far in this scope.
    #[must_use]
    pub const fn allocated(&self) -> u64 {
        self.store.allocated()
    }

    /// Id the next `alloc` will return.
    #[must_use]
    pub const fn next_id(&self) -> RefId {
        RefId::new(self.store.allocated())
    }
}

impl Drop for Scope<'_> {
    fn drop(&mut self) {
        debug_assert!(self.store.check_invariants(), "store invariants violated");
        // Open -> Closed is the only edge out of a live scope.
        if let Ok(closed) = self.state.close() {
            self.state = closed;
        }
        tracing::debug!(
            scope = %self.serial,
            state = %self.state,
            cells = self.store.live(),
            panicking = thread::panicking(),
            "scope closed"
        );
    }
}

/// Run `f` against a fresh store and return its scope-independent result.
///
/// ```
/// use corral_engine::{StoreError, run_scoped};
///
/// let answer = run_scoped(|scope| -> Result<i32, StoreError> {
///     let h1 = scope.alloc(1);
///     let _h2 = scope.alloc(2);
///     scope.write(h1, 42)?;
///     scope.read(h1)
/// });
/// assert_eq!(answer, Ok(42));
/// ```
pub fn run_scoped<R, F>(f: F) -> R
where
    F: for<'id> FnOnce(&mut Scope<'id>) -> R,
{
    run_scoped_with(&StoreOptions::default(), f)
}

pub fn run_scoped_with<R, F>(options: &StoreOptions, f: F) -> R
where
    F: for<'id> FnOnce(&mut Scope<'id>) -> R,
{
    let mut scope = Scope::open(options);
    f(&mut scope)
}

/// [`run_scoped`] for computations that fail.
///
/// Store errors convert into the caller's error type, so `?` works on every
/// scope operation inside the closure.
pub fn try_run_scoped<R, E, F>(f: F) -> Result<R, E>
where
    E: From<StoreError>,
    F: for<'id> FnOnce(&mut Scope<'id>) -> Result<R, E>,
{
    try_run_scoped_with(&StoreOptions::default(), f)
}

pub fn try_run_scoped_with<R, E, F>(options: &StoreOptions, f: F) -> Result<R, E>
where
    E: From<StoreError>,
    F: for<'id> FnOnce(&mut Scope<'id>) -> Result<R, E>,
{
    let mut scope = Scope::open(options);
    let outcome = f(&mut scope);
    if outcome.is_err() {
        tracing::debug!(scope = %scope.serial(), "scope failed; discarding store");
    }
    outcome
}
