//! Compose-time checks for programs.
//!
//! Walks the steps once, tracking what each name is bound to. No scope is
//! opened and no cell is allocated here.

use std::collections::HashMap;

use corral_types::{ScopeViolation, ValueKind};

use super::{Operand, Program, ProgramError, Step};

/// A program that passed [`validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedProgram {
    program: Program,
    result_kind: ValueKind,
}

impl ValidatedProgram {
    #[must_use]
    pub fn program(&self) -> &Program {
        &self.program
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.program.name
    }

    /// Kind of value the program returns.
    #[must_use]
    pub const fn result_kind(&self) -> ValueKind {
        self.result_kind
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Binding {
    Cell(ValueKind),
    Value(ValueKind),
}

#[derive(Default)]
struct Env<'p> {
    bindings: HashMap<&'p str, Binding>,
}

impl<'p> Env<'p> {
    fn bind(&mut self, step: usize, name: &'p str, binding: Binding) -> Result<(), ProgramError> {
        if self.bindings.insert(name, binding).is_some() {
            return Err(ProgramError::DuplicateBinding {
                step,
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn cell(&self, step: usize, name: &str) -> Result<ValueKind, ProgramError> {
        match self.bindings.get(name) {
            Some(Binding::Cell(kind)) => Ok(*kind),
            Some(Binding::Value(_)) => Err(ProgramError::NotACell {
                step,
                name: name.to_string(),
            }),
            None => Err(ScopeViolation::ForeignReference {
                step,
                name: name.to_string(),
            }
            .into()),
        }
    }

    fn operand(&self, step: usize, operand: &Operand) -> Result<ValueKind, ProgramError> {
        let name = match operand {
            Operand::Lit(value) => return Ok(value.kind()),
            Operand::Var { var } => var,
        };
        match self.bindings.get(name.as_str()) {
            Some(Binding::Value(kind)) => Ok(*kind),
            Some(Binding::Cell(_)) => Err(ProgramError::CellUsedAsValue {
                step,
                name: name.clone(),
            }),
            None => Err(ProgramError::UnboundVariable {
                step,
                name: name.clone(),
            }),
        }
    }
}

fn expect_kind(step: usize, expected: ValueKind, found: ValueKind) -> Result<(), ProgramError> {
    if expected == found {
        Ok(())
    } else {
        Err(ProgramError::KindMismatch {
            step,
            expected,
            found,
        })
    }
}

/// Check a program without running it.
///
/// Steps are numbered from 1 in errors. The result operand is checked as
/// if it were one step past the last.
pub fn validate(program: Program) -> Result<ValidatedProgram, ProgramError> {
    let result_kind = check(&program)
        .inspect_err(|err| tracing::debug!(program = %program.name, "rejected: {err}"))?;
    tracing::debug!(program = %program.name, steps = program.steps.len(), "validated");
    Ok(ValidatedProgram {
        program,
        result_kind,
    })
}

fn check(program: &Program) -> Result<ValueKind, ProgramError> {
    let mut env = Env::default();

    for (index, step) in program.steps.iter().enumerate() {
        let n = index + 1;
        match step {
            Step::Alloc { bind, init } => {
                let kind = env.operand(n, init)?;
                env.bind(n, bind, Binding::Cell(kind))?;
            }
            Step::Read { bind, cell } => {
                let kind = env.cell(n, cell)?;
                env.bind(n, bind, Binding::Value(kind))?;
            }
            Step::Write { cell, value } => {
                let cell_kind = env.cell(n, cell)?;
                expect_kind(n, cell_kind, env.operand(n, value)?)?;
            }
            Step::Modify { cell, add } => {
                expect_kind(n, ValueKind::Int, env.cell(n, cell)?)?;
                expect_kind(n, ValueKind::Int, env.operand(n, add)?)?;
            }
            Step::Add { bind, lhs, rhs } => {
                expect_kind(n, ValueKind::Int, env.operand(n, lhs)?)?;
                expect_kind(n, ValueKind::Int, env.operand(n, rhs)?)?;
                env.bind(n, bind, Binding::Value(ValueKind::Int))?;
            }
        }
    }

    let after_last = program.steps.len() + 1;
    match &program.result {
        Operand::Var { var } if matches!(env.bindings.get(var.as_str()), Some(Binding::Cell(_))) => {
            Err(ScopeViolation::EscapingReference { name: var.clone() }.into())
        }
        result => env.operand(after_last, result),
    }
}
