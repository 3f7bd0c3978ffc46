use std::collections::HashMap;

use corral_types::{Value, ValueKind};

use super::{ExecutionReport, Operand, ProgramError, Step, ValidatedProgram};
use crate::handle::Ref;
use crate::scope::{Scope, try_run_scoped_with};
use crate::store::StoreOptions;

enum Slot<'id> {
    Cell(Ref<'id, Value>),
    Value(Value),
}

struct Frame<'p, 'id> {
    slots: HashMap<&'p str, Slot<'id>>,
}

impl<'p, 'id> Frame<'p, 'id> {
    fn cell(&self, name: &str) -> Result<Ref<'id, Value>, ProgramError> {
        match self.slots.get(name) {
            Some(Slot::Cell(cell)) => Ok(*cell),
            _ => Err(missing(name)),
        }
    }

    fn value(&self, operand: &Operand) -> Result<Value, ProgramError> {
        match operand {
            Operand::Lit(value) => Ok(value.clone()),
            Operand::Var { var } => match self.slots.get(var.as_str()) {
                Some(Slot::Value(value)) => Ok(value.clone()),
                _ => Err(missing(var)),
            },
        }
    }

    fn int(&self, step: usize, operand: &Operand) -> Result<i64, ProgramError> {
        let value = self.value(operand)?;
        value.as_int().ok_or(ProgramError::KindMismatch {
            step,
            expected: ValueKind::Int,
            found: value.kind(),
        })
    }

    fn insert(&mut self, name: &'p str, slot: Slot<'id>) {
        self.slots.insert(name, slot);
    }
}

// Validation guarantees every name resolves; reaching this means the
// validated program was altered, which the API does not allow.
fn missing(name: &str) -> ProgramError {
    ProgramError::UnboundVariable {
        step: 0,
        name: name.to_string(),
    }
}

impl ValidatedProgram {
    /// Run the program in a fresh scope with default store options.
    pub fn run(&self) -> Result<ExecutionReport, ProgramError> {
        self.run_with(&StoreOptions::default())
    }

    pub fn run_with(&self, options: &StoreOptions) -> Result<ExecutionReport, ProgramError> {
        let program = self.program();
        let span = tracing::debug_span!("program", name = %program.name);
        let _entered = span.enter();

        try_run_scoped_with(options, |scope| -> Result<ExecutionReport, ProgramError> {
            let result = execute(program.steps.as_slice(), &program.result, scope)?;
            Ok(ExecutionReport {
                program: program.name.clone(),
                scope: scope.serial(),
                steps: program.steps.len(),
                cells: scope.allocated(),
                result,
            })
        })
    }
}

fn execute<'p, 'id>(
    steps: &'p [Step],
    result: &Operand,
    scope: &mut Scope<'id>,
) -> Result<Value, ProgramError> {
    let mut frame = Frame {
        slots: HashMap::new(),
    };

    for (index, step) in steps.iter().enumerate() {
        let n = index + 1;
        match step {
            Step::Alloc { bind, init } => {
                let cell = scope.alloc(frame.value(init)?);
                frame.insert(bind, Slot::Cell(cell));
            }
            Step::Read { bind, cell } => {
                let value = scope.read(frame.cell(cell)?)?;
                frame.insert(bind, Slot::Value(value));
            }
            Step::Write { cell, value } => {
                let value = frame.value(value)?;
                scope.write(frame.cell(cell)?, value)?;
            }
            Step::Modify { cell, add } => {
                let delta = frame.int(n, add)?;
                let cell = frame.cell(cell)?;
                let mut outcome: Result<(), ProgramError> = Ok(());
                scope.modify(cell, |value: &mut Value| match value {
                    Value::Int(current) => match current.checked_add(delta) {
                        Some(sum) => *current = sum,
                        None => outcome = Err(ProgramError::Overflow { step: n }),
                    },
                    other => {
                        outcome = Err(ProgramError::KindMismatch {
                            step: n,
                            expected: ValueKind::Int,
                            found: other.kind(),
                        });
                    }
                })?;
                outcome?;
            }
            Step::Add { bind, lhs, rhs } => {
                let sum = frame
                    .int(n, lhs)?
                    .checked_add(frame.int(n, rhs)?)
                    .ok_or(ProgramError::Overflow { step: n })?;
                frame.insert(bind, Slot::Value(Value::Int(sum)));
            }
        }
    }

    frame.value(result)
}
