//! Scope lifecycle.
//!
//! A scope moves `Unopened -> Open -> Closed` exactly once. There is no
//! edge back to `Open`; a new scope is always a new store instance.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeState {
    #[default]
    Unopened,
    Open,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("illegal scope transition {from} -> {to}")]
pub struct ScopeTransitionError {
    pub from: ScopeState,
    pub to: ScopeState,
}

impl ScopeState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unopened => "unopened",
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }

    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }

    pub fn open(self) -> Result<Self, ScopeTransitionError> {
        match self {
            Self::Unopened => Ok(Self::Open),
            from => Err(ScopeTransitionError {
                from,
                to: Self::Open,
            }),
        }
    }

    /// Closing is allowed from `Open` only. Closing an already closed scope
    /// is reported so callers can tell a double teardown apart.
    pub fn close(self) -> Result<Self, ScopeTransitionError> {
        match self {
            Self::Open => Ok(Self::Closed),
            from => Err(ScopeTransitionError {
                from,
                to: Self::Closed,
            }),
        }
    }
}

impl fmt::Display for ScopeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
