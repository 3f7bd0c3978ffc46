//! Scripted programs: validation before a scope opens, execution inside one

use corral_engine::{Program, ProgramError, ScopeViolation, StoreOptions, Value, ValueKind};

use crate::common::demo_source;

fn load(file: &str) -> Program {
    Program::from_toml_file_contents(file, &demo_source(file)).expect("demo parses")
}

#[test]
fn overwrite_demo_returns_42() {
    let report = load("overwrite.toml").validate().unwrap().run().unwrap();
    assert_eq!(report.result, Value::Int(42));
    assert_eq!(report.cells, 2);
    insta::assert_snapshot!(report.to_string(), @r"
    program: overwrite
    steps:   4
    cells:   2
    result:  42 (int)
    ");
}

#[test]
fn round_trip_demo_returns_value_unchanged() {
    let report = load("round_trip.toml").validate().unwrap().run().unwrap();
    assert_eq!(report.result, Value::from("hello"));
}

#[test]
fn counter_demo_modifies_in_place() {
    let validated = load("counter.toml").validate().unwrap();
    assert_eq!(validated.result_kind(), ValueKind::Int);
    let report = validated
        .run_with(&StoreOptions::default().with_capacity_hint(1))
        .unwrap();
    assert_eq!(report.result, Value::Int(103));
    assert_eq!(report.cells, 1);
}

#[test]
fn returning_a_handle_is_rejected_before_running() {
    let err = load("escape.toml").validate().unwrap_err();
    assert!(err.is_compose_time());
    assert_eq!(
        err.scope_violation(),
        Some(&ScopeViolation::EscapingReference {
            name: "h".to_string()
        })
    );
}

#[test]
fn handle_from_another_run_is_rejected_before_running() {
    // Call A allocates h1..h3 and finishes normally.
    let first = load("three_cells.toml").validate().unwrap().run().unwrap();
    assert_eq!(first.result, Value::Int(4));
    assert_eq!(first.cells, 3);

    // Call B names h1, which no step of B allocated.
    let err = load("foreign_handle.toml").validate().unwrap_err();
    assert!(matches!(
        err.scope_violation(),
        Some(ScopeViolation::ForeignReference { step: 1, name }) if name == "h1"
    ));
}

#[test]
fn repeated_runs_do_not_share_cells() {
    let validated = load("counter.toml").validate().unwrap();
    let first = validated.run().unwrap();
    let second = validated.run().unwrap();
    assert_eq!(first.result, second.result);
    assert_ne!(first.scope, second.scope);
}

#[test]
fn overflow_is_a_runtime_failure() {
    let program = Program::from_toml_str(
        r#"
name = "overflow"
result = { var = "n" }

[[steps]]
op = "alloc"
bind = "big"
init = 9223372036854775807

[[steps]]
op = "modify"
cell = "big"
add = 1

[[steps]]
op = "read"
bind = "n"
cell = "big"
"#,
    )
    .unwrap();
    let err = program.validate().unwrap().run().unwrap_err();
    assert!(matches!(err, ProgramError::Overflow { step: 2 }));
    assert!(!err.is_compose_time());
}

#[test]
fn add_overflow_is_reported_on_its_step() {
    let program = Program::from_toml_str(
        r#"
name = "add-overflow"
result = { var = "z" }

[[steps]]
op = "add"
bind = "y"
lhs = 9223372036854775807
rhs = 0

[[steps]]
op = "add"
bind = "z"
lhs = { var = "y" }
rhs = 1
"#,
    )
    .unwrap();
    let err = program.validate().unwrap().run().unwrap_err();
    assert!(matches!(err, ProgramError::Overflow { step: 2 }));
}
