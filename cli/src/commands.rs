//! Subcommand implementations.
//!
//! Every program runs in its own scope; nothing is shared between files on
//! the same command line.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use corral_engine::{ExecutionReport, Program, ProgramError, StoreOptions, ValidatedProgram};

use crate::demos::{DEMOS, Expect};

fn load(path: &Path) -> Result<ValidatedProgram> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let program = Program::from_toml_file_contents(path, &source)?;
    program
        .validate()
        .with_context(|| format!("{} rejected", path.display()))
}

fn print_report(report: &ExecutionReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(report)?);
    } else {
        println!("{report}");
    }
    Ok(())
}

pub fn run(files: &[PathBuf], json: bool, options: &StoreOptions) -> Result<()> {
    let mut failed = 0_usize;
    let mut printed = false;
    for path in files {
        let outcome = load(path).and_then(|program| {
            program
                .run_with(options)
                .with_context(|| format!("{} failed", path.display()))
        });
        match outcome {
            Ok(report) => {
                if printed && !json {
                    println!();
                }
                print_report(&report, json)?;
                printed = true;
            }
            Err(err) => {
                failed += 1;
                tracing::debug!(path = %path.display(), "program failed");
                eprintln!("error: {err:#}");
            }
        }
    }
    if failed > 0 {
        bail!("{failed} of {} programs failed", files.len());
    }
    Ok(())
}

pub fn check(files: &[PathBuf]) -> Result<()> {
    let mut failed = 0_usize;
    for path in files {
        match load(path) {
            Ok(program) => println!(
                "ok: {} ({} steps, returns {})",
                program.name(),
                program.program().steps.len(),
                program.result_kind()
            ),
            Err(err) => {
                failed += 1;
                eprintln!("error: {err:#}");
            }
        }
    }
    if failed > 0 {
        bail!("{failed} of {} programs rejected", files.len());
    }
    Ok(())
}

fn run_demo(file: &str, source: &str, options: &StoreOptions) -> Result<ExecutionReport, ProgramError> {
    Program::from_toml_file_contents(file, source)?
        .validate()?
        .run_with(options)
}

pub fn demo(options: &StoreOptions) -> Result<()> {
    let mut surprises = 0_usize;
    for (index, demo) in DEMOS.iter().enumerate() {
        if index > 0 {
            println!();
        }
        match (run_demo(demo.file, demo.source, options), demo.expect) {
            (Ok(report), Expect::Accepted) => {
                println!("== {}: accepted", demo.file);
                println!("{report}");
            }
            (Err(err), Expect::Rejected) if err.is_compose_time() => {
                println!("== {}: rejected before running", demo.file);
                println!("{err}");
            }
            (Ok(_), Expect::Rejected) => {
                surprises += 1;
                eprintln!("== {}: ran, but should have been rejected", demo.file);
            }
            (Err(err), _) => {
                surprises += 1;
                eprintln!("== {}: unexpected failure: {err}", demo.file);
            }
        }
    }
    if surprises > 0 {
        bail!("{surprises} demo(s) did not behave as expected");
    }
    Ok(())
}
