//! Scoped mutable store for Corral.
//!
//! # Architecture
//!
//! ```text
//! run_scoped(|scope| ...)            run_epoch_scoped(|store| ...)
//!        |                                     |
//!        v                                     v
//!   Scope<'id>  --- Ref<'id, T>          EpochStore --- EpochRef<T>
//!        \                                   /
//!         +-------- StoreEngine ------------+
//!                 (RefId -> cell)
//! ```
//!
//! - [`run_scoped`] is the primary boundary. The scope tag is a lifetime
//!   brand, so every border-crossing bug is a compile error.
//! - [`run_epoch_scoped`] trades that for `'static` handles checked at
//!   run time against the store's epoch.
//! - [`program`] runs TOML-described computations through `run_scoped`
//!   after validating them, so scope violations in scripts are reported
//!   before any scope opens.

mod brand;
mod epoch;
mod handle;
pub mod program;
mod scope;
mod store;

pub use brand::Brand;
pub use epoch::{EpochRef, EpochStore, run_epoch_scoped, run_epoch_scoped_with};
pub use handle::Ref;
pub use program::{ExecutionReport, Operand, Program, ProgramError, Step, ValidatedProgram};
pub use scope::{Scope, run_scoped, run_scoped_with, try_run_scoped, try_run_scoped_with};
pub use store::StoreOptions;

pub use corral_types::{RefId, ScopeSerial, ScopeState, ScopeViolation, StoreError, Value, ValueKind};
