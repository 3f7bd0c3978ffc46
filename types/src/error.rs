//! Error kinds shared by every store flavour.

use std::any::type_name;

use thiserror::Error;

use crate::{RefId, ScopeSerial};

/// Runtime failure inside a store.
///
/// With the lifetime-branded API none of these are reachable: a handle can
/// only name a cell of the store that minted it, with the type it was
/// minted at. They exist as internal-consistency checks, and as the
/// dynamic rendering of scope violations in the epoch-checked store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("dangling reference: cell {id} is not live in this store")]
    DanglingReference { id: RefId },
    #[error("cell {id} does not hold a value of type `{expected}`")]
    TypeMismatch { id: RefId, expected: &'static str },
    #[error("reference minted by scope {handle} used in scope {store}")]
    ForeignReference {
        handle: ScopeSerial,
        store: ScopeSerial,
    },
    #[error("scope {scope} is closed")]
    ScopeClosed { scope: ScopeSerial },
}

impl StoreError {
    #[must_use]
    pub fn type_mismatch<T: ?Sized>(id: RefId) -> Self {
        Self::TypeMismatch {
            id,
            expected: type_name::<T>(),
        }
    }

    /// True for the conditions that mean a handle crossed a scope border.
    #[must_use]
    pub const fn is_border_crossing(&self) -> bool {
        matches!(
            self,
            Self::ForeignReference { .. } | Self::ScopeClosed { .. }
        )
    }
}

/// A computation was assembled in a way that depends on a foreign scope.
///
/// Raised at compose time, before any scope opens. For closures passed to
/// `run_scoped` the compiler raises it; for scripted programs the validator
/// does.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeViolation {
    #[error("result `{name}` is a reference cell; references cannot leave the scope that created them")]
    EscapingReference { name: String },
    #[error("step {step} uses reference `{name}`, which was not allocated in this scope")]
    ForeignReference { step: usize, name: String },
}

impl ScopeViolation {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::EscapingReference { name } | Self::ForeignReference { name, .. } => name,
        }
    }
}
