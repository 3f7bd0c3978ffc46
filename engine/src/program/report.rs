use std::fmt;

use serde::Serialize;

use corral_types::{ScopeSerial, Value};

/// Outcome of one program run.
///
/// Everything here is scope-independent: the scope serial is a plain
/// number for log correlation, not a handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionReport {
    pub program: String,
    pub scope: ScopeSerial,
    pub steps: usize,
    /// Cells allocated before the scope closed.
    pub cells: u64,
    pub result: Value,
}

impl fmt::Display for ExecutionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "program: {}", self.program)?;
        writeln!(f, "steps:   {}", self.steps)?;
        writeln!(f, "cells:   {}", self.cells)?;
        write!(f, "result:  {} ({})", self.result, self.result.kind())
    }
}
