//! CLI command handlers.

use std::path::Path;
use std::process::ExitCode;

use serde::Serialize;
use tracing::error;

use super::args::RunOverrides;
use super::output::{
    print_equilibrium, print_help, print_reference, print_report, print_version,
};
use super::{Args, Command};
use crate::config::StabilityConfig;
use crate::engine::StabilityEngine;
use crate::error::SimResult;
use crate::tracker::ReferenceTrajectory;

/// Main CLI entry point.
///
/// Dispatches to the appropriate command handler based on parsed arguments.
#[must_use]
pub fn run_cli(args: Args) -> ExitCode {
    match args.command {
        Command::Run {
            config_path,
            overrides,
            json,
            verbose,
        } => run_stability(&config_path, overrides, json, verbose),
        Command::Equilibrium { config_path, json } => equilibrium(&config_path, json),
        Command::Tracker { data_path, json } => tracker(&data_path, json),
        Command::Help => {
            print_help();
            ExitCode::SUCCESS
        }
        Command::Version => {
            print_version();
            ExitCode::SUCCESS
        }
    }
}

/// Load a configuration file and apply command-line overrides.
///
/// # Errors
///
/// Returns error if the file cannot be loaded or the overridden
/// configuration fails validation.
pub fn load_config(path: &Path, overrides: RunOverrides) -> SimResult<StabilityConfig> {
    let mut config = StabilityConfig::load(path)?;
    if let Some(dt) = overrides.dt {
        config.simulation.dt = dt;
    }
    if let Some(horizon) = overrides.horizon {
        config.simulation.horizon = horizon;
    }
    if let Some(integrator) = overrides.integrator {
        config.simulation.integrator = integrator;
    }
    config.validate_all()?;
    Ok(config)
}

/// Run a stability simulation from a TOML file.
#[must_use]
pub fn run_stability(path: &Path, overrides: RunOverrides, json: bool, verbose: bool) -> ExitCode {
    let report = load_config(path, overrides)
        .and_then(|config| StabilityEngine::new(&config))
        .and_then(|engine| engine.run());

    match report {
        Ok(report) => {
            if json {
                print_json(&report)
            } else {
                println!("Configuration: {}\n", path.display());
                print_report(&report, verbose);
                ExitCode::SUCCESS
            }
        }
        Err(e) => fail(&e),
    }
}

/// Print the equilibrium snapshot of a configuration.
#[must_use]
pub fn equilibrium(path: &Path, json: bool) -> ExitCode {
    match StabilityConfig::load(path).and_then(|config| config.assembly()) {
        Ok(assembly) => {
            let snapshot = assembly.equilibrium();
            if json {
                print_json(&snapshot)
            } else {
                print_equilibrium(&snapshot);
                ExitCode::SUCCESS
            }
        }
        Err(e) => fail(&e),
    }
}

/// Print the heel series derived from a tracker export.
#[must_use]
pub fn tracker(path: &Path, json: bool) -> ExitCode {
    match ReferenceTrajectory::load(path) {
        Ok(reference) => {
            if json {
                print_json(&reference)
            } else {
                print_reference(&reference);
                ExitCode::SUCCESS
            }
        }
        Err(e) => fail(&e),
    }
}

fn print_json<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(text) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(%e, "failed to serialize output");
            ExitCode::from(1)
        }
    }
}

fn fail(e: &crate::error::SimError) -> ExitCode {
    error!(%e, "command failed");
    eprintln!("Error: {e}");
    ExitCode::from(if e.is_config_error() { 2 } else { 1 })
}
