//! Corral CLI - binary entry point.
//!
//! ```text
//! main() -> load config -> init_tracing() -> run | check | demo
//!                                              |
//!                                              v
//!                         Program -> validate -> run_scoped -> report
//! ```
//!
//! Reports go to stdout, diagnostics and logs to stderr.

mod commands;
mod demos;

use std::io::stderr;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use corral_config::{ConfigError, CorralConfig};

/// Environment variable holding a `tracing` filter directive.
const LOG_ENV: &str = "CORRAL_LOG";

/// Corral - run programs against a scoped mutable store
#[derive(Parser, Debug)]
#[command(name = "corral")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Config file to use instead of ~/.corral/config.toml
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate and run programs, each in a fresh scope
    Run {
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,

        /// Print one JSON report per line
        #[arg(long)]
        json: bool,
    },
    /// Validate programs without running them
    Check {
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,
    },
    /// Run the bundled demo programs
    Demo,
}

fn init_tracing(config: Option<&CorralConfig>) {
    let env_filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(config.and_then(CorralConfig::log_filter).unwrap_or("warn")))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(stderr).with_target(false))
        .with(env_filter)
        .init();
}

/// Explicit `--config` failures are fatal; problems with the default file
/// are logged and the defaults used.
fn load_config(explicit: Option<&PathBuf>) -> Result<(Option<CorralConfig>, Option<ConfigError>)> {
    if let Some(path) = explicit {
        let config = CorralConfig::load_from(path)?
            .with_context(|| format!("config file {} does not exist", path.display()))?;
        return Ok((Some(config), None));
    }
    match CorralConfig::load() {
        Ok(config) => Ok((config, None)),
        Err(err) => Ok((None, Some(err))),
    }
}

fn run(cli: Cli) -> Result<()> {
    let (config, deferred) = load_config(cli.config.as_ref())?;
    init_tracing(config.as_ref());
    if let Some(err) = deferred {
        tracing::warn!("Ignoring config: {err}");
    }

    let options = config
        .as_ref()
        .map(CorralConfig::store_options)
        .unwrap_or_default();
    let json_default = config.as_ref().is_some_and(CorralConfig::json);

    match cli.command {
        Command::Run { files, json } => commands::run(&files, json || json_default, &options),
        Command::Check { files } => commands::check(&files),
        Command::Demo => commands::demo(&options),
    }
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("corral: {err:#}");
            ExitCode::FAILURE
        }
    }
}
