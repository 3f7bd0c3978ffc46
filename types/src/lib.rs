//! Core domain types for Corral.
//!
//! This crate contains pure domain types with no IO and no scope machinery.
//! The branded handles and stores that give these types meaning live in
//! `corral-engine`.

mod error;
mod ids;
mod state;
mod value;

pub use error::{ScopeViolation, StoreError};
pub use ids::{RefId, ScopeSerial};
pub use state::{ScopeState, ScopeTransitionError};
pub use value::{Value, ValueKind};
