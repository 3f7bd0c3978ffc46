//! End-to-end tests of the `corral` binary

use std::process::Output;

use tempfile::tempdir;

use crate::common::{corral, demo_path, write_program};

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn run_prints_report() {
    let home = tempdir().unwrap();
    let assert = corral(home.path())
        .arg("run")
        .arg(demo_path("overwrite.toml"))
        .assert()
        .success();
    let stdout = stdout_of(assert.get_output());
    assert!(stdout.contains("program: overwrite"), "{stdout}");
    assert!(stdout.contains("result:  42 (int)"), "{stdout}");
}

#[test]
fn run_json_emits_one_line_per_program() {
    let home = tempdir().unwrap();
    let assert = corral(home.path())
        .arg("run")
        .arg("--json")
        .arg(demo_path("overwrite.toml"))
        .arg(demo_path("round_trip.toml"))
        .assert()
        .success();
    let stdout = stdout_of(assert.get_output());
    let lines: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["result"], 42);
    assert_eq!(lines[1]["result"], "hello");
    assert_ne!(lines[0]["scope"], lines[1]["scope"]);
}

#[test]
fn run_fails_on_escaping_handle() {
    let home = tempdir().unwrap();
    let assert = corral(home.path())
        .arg("run")
        .arg(demo_path("escape.toml"))
        .assert()
        .failure();
    let output = assert.get_output();
    assert!(stdout_of(output).is_empty());
    let stderr = stderr_of(output);
    assert!(stderr.contains("reference cell"), "{stderr}");
    assert!(stderr.contains("1 of 1 programs failed"), "{stderr}");
}

#[test]
fn run_keeps_going_after_a_rejected_program() {
    let home = tempdir().unwrap();
    let assert = corral(home.path())
        .arg("run")
        .arg(demo_path("foreign_handle.toml"))
        .arg(demo_path("counter.toml"))
        .assert()
        .failure();
    let output = assert.get_output();
    let stdout = stdout_of(output);
    assert!(stdout.starts_with("program: counter\n"), "{stdout:?}");
    assert!(stdout.contains("result:  103 (int)"));
    assert!(stderr_of(output).contains("not allocated in this scope"));
}

#[test]
fn run_separates_reports_with_one_blank_line() {
    let home = tempdir().unwrap();
    let assert = corral(home.path())
        .arg("run")
        .arg(demo_path("overwrite.toml"))
        .arg(demo_path("escape.toml"))
        .arg(demo_path("round_trip.toml"))
        .assert()
        .failure();
    let stdout = stdout_of(assert.get_output());
    assert!(
        stdout.contains("result:  42 (int)\n\nprogram: round-trip"),
        "{stdout:?}"
    );
}

#[test]
fn check_validates_without_running() {
    let home = tempdir().unwrap();
    let assert = corral(home.path())
        .arg("check")
        .arg(demo_path("three_cells.toml"))
        .assert()
        .success();
    assert_eq!(
        stdout_of(assert.get_output()).trim(),
        "ok: three-cells (6 steps, returns int)"
    );
}

#[test]
fn check_reports_parse_errors_with_path() {
    let home = tempdir().unwrap();
    let bad = write_program(home.path(), "bad.toml", "name = \"bad\"\n");
    let assert = corral(home.path())
        .arg("check")
        .arg(&bad)
        .assert()
        .failure();
    let stderr = stderr_of(assert.get_output());
    assert!(stderr.contains("bad.toml"), "{stderr}");
}

#[test]
fn demo_runs_every_bundled_program() {
    let home = tempdir().unwrap();
    let assert = corral(home.path()).arg("demo").assert().success();
    let stdout = stdout_of(assert.get_output());
    assert!(stdout.contains("== overwrite.toml: accepted"));
    assert!(stdout.contains("== escape.toml: rejected before running"));
    assert!(stdout.contains("== foreign_handle.toml: rejected before running"));
}

#[test]
fn config_can_default_to_json() {
    let home = tempdir().unwrap();
    write_program(home.path(), "config.toml", "[app]\njson = true\n");
    let assert = corral(home.path())
        .arg("run")
        .arg(demo_path("round_trip.toml"))
        .assert()
        .success();
    let stdout = stdout_of(assert.get_output());
    let report: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(report["program"], "round-trip");
}

#[test]
fn explicit_missing_config_is_fatal() {
    let home = tempdir().unwrap();
    let assert = corral(home.path())
        .arg("--config")
        .arg(home.path().join("nope.toml"))
        .arg("demo")
        .assert()
        .failure();
    assert!(stderr_of(assert.get_output()).contains("does not exist"));
}
