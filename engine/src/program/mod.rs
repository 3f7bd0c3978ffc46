//! Scripted scoped computations.
//!
//! A [`Program`] is the data form of a closure passed to `run_scoped`: a
//! list of steps over named bindings, read from TOML:
//!
//! ```toml
//! name = "overwrite"
//! result = { var = "x" }
//!
//! [[steps]]
//! op = "alloc"
//! bind = "h1"
//! init = 1
//!
//! [[steps]]
//! op = "write"
//! cell = "h1"
//! value = 42
//!
//! [[steps]]
//! op = "read"
//! bind = "x"
//! cell = "h1"
//! ```
//!
//! Names are the only way a program can refer to a cell, and a name only
//! resolves to a cell allocated earlier in the same program. [`validate`]
//! enforces that, plus the no-escape rule for the result, before any scope
//! is opened. Possessing a [`ValidatedProgram`] is the proof that the
//! program is scope-safe and well-kinded; running it cannot hit a scope
//! violation.

mod exec;
mod report;
mod validate;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use toml::de::Error as TomlError;

use corral_types::{ScopeViolation, StoreError, Value, ValueKind};

pub use report::ExecutionReport;
pub use validate::{ValidatedProgram, validate};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Program {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub steps: Vec<Step>,
    pub result: Operand,
}

/// One step of a program. Steps execute strictly in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// Allocate a cell initialised with `init`, bound to `bind`.
    Alloc { bind: String, init: Operand },
    /// Copy the current value of `cell` into the value binding `bind`.
    Read { bind: String, cell: String },
    Write { cell: String, value: Operand },
    /// Add `add` to an integer cell in place.
    Modify { cell: String, add: Operand },
    /// Integer addition of two operands, bound to `bind`.
    Add {
        bind: String,
        lhs: Operand,
        rhs: Operand,
    },
}

impl Step {
    #[must_use]
    pub const fn op(&self) -> &'static str {
        match self {
            Self::Alloc { .. } => "alloc",
            Self::Read { .. } => "read",
            Self::Write { .. } => "write",
            Self::Modify { .. } => "modify",
            Self::Add { .. } => "add",
        }
    }
}

/// A literal value or a reference to an earlier value binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Operand {
    Var { var: String },
    Lit(Value),
}

impl Operand {
    #[must_use]
    pub fn var(name: impl Into<String>) -> Self {
        Self::Var { var: name.into() }
    }

    #[must_use]
    pub fn lit(value: impl Into<Value>) -> Self {
        Self::Lit(value.into())
    }
}

#[derive(Debug, Error)]
pub enum ProgramError {
    #[error("failed to parse program{}: {error}", origin_suffix(.origin.as_ref()))]
    Parse {
        origin: Option<PathBuf>,
        error: TomlError,
    },
    #[error(transparent)]
    ScopeViolation(#[from] ScopeViolation),
    #[error("step {step}: `{name}` is not bound")]
    UnboundVariable { step: usize, name: String },
    #[error("step {step}: `{name}` is already bound")]
    DuplicateBinding { step: usize, name: String },
    #[error("step {step}: `{name}` is a value, not a cell")]
    NotACell { step: usize, name: String },
    #[error("step {step}: cell `{name}` cannot be used as a value; read it first")]
    CellUsedAsValue { step: usize, name: String },
    #[error("step {step}: expected {expected}, found {found}")]
    KindMismatch {
        step: usize,
        expected: ValueKind,
        found: ValueKind,
    },
    #[error("step {step}: integer overflow")]
    Overflow { step: usize },
    #[error(transparent)]
    Store(#[from] StoreError),
}

fn origin_suffix(origin: Option<&PathBuf>) -> String {
    origin.map_or_else(String::new, |path| format!(" {}", path.display()))
}

impl ProgramError {
    /// True when the program was rejected at compose time, before a scope
    /// was opened.
    #[must_use]
    pub const fn is_compose_time(&self) -> bool {
        !matches!(self, Self::Overflow { .. } | Self::Store(_))
    }

    #[must_use]
    pub const fn scope_violation(&self) -> Option<&ScopeViolation> {
        match self {
            Self::ScopeViolation(violation) => Some(violation),
            _ => None,
        }
    }
}

impl Program {
    pub fn from_toml_str(source: &str) -> Result<Self, ProgramError> {
        toml::from_str(source).map_err(|error| ProgramError::Parse {
            origin: None,
            error,
        })
    }

    /// Parse, remembering where the text came from for error messages.
    pub fn from_toml_file_contents(
        path: impl Into<PathBuf>,
        source: &str,
    ) -> Result<Self, ProgramError> {
        toml::from_str(source).map_err(|error| ProgramError::Parse {
            origin: Some(path.into()),
            error,
        })
    }

    pub fn validate(self) -> Result<ValidatedProgram, ProgramError> {
        validate(self)
    }
}
