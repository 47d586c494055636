//! CLI module tests.

#![allow(clippy::unwrap_used, clippy::panic)]

use super::args::{Args, Command, RunOverrides};
use super::commands::{load_config, run_cli};
use super::output::{format_equilibrium, format_reference, format_report};
use crate::config::StabilityConfig;
use crate::domains::dynamics::IntegratorKind;
use crate::engine::StabilityEngine;
use crate::tracker::ReferenceTrajectory;
use std::path::PathBuf;
use std::process::ExitCode;

fn write_temp(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("heelsim-cli-{}-{name}", std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
}

// ============================================================================
// Args parsing tests
// ============================================================================

#[test]
fn test_parse_no_args_shows_help() {
    let args = Args::parse_from(["heelsim"]);
    assert_eq!(args.command, Command::Help);
}

#[test]
fn test_parse_help_variants() {
    for flag in ["-h", "--help", "help"] {
        assert_eq!(Args::parse_from(["heelsim", flag]).command, Command::Help);
    }
}

#[test]
fn test_parse_version_variants() {
    for flag in ["-V", "--version", "version"] {
        assert_eq!(Args::parse_from(["heelsim", flag]).command, Command::Version);
    }
}

#[test]
fn test_parse_unknown_command() {
    let args = Args::parse_from(["heelsim", "capsize"]);
    assert_eq!(args.command, Command::Help);
}

#[test]
fn test_parse_run_command() {
    let args = Args::parse_from(["heelsim", "run", "barge.toml"]);
    assert_eq!(
        args.command,
        Command::Run {
            config_path: PathBuf::from("barge.toml"),
            overrides: RunOverrides::default(),
            json: false,
            verbose: false,
        }
    );
    assert!(!args.verbose());
}

#[test]
fn test_parse_run_with_overrides() {
    let args = Args::parse_from([
        "heelsim",
        "run",
        "barge.toml",
        "--dt",
        "0.0005",
        "--horizon",
        "4",
        "--integrator",
        "RK4",
        "--json",
        "-v",
    ]);
    match args.command {
        Command::Run {
            overrides,
            json,
            verbose,
            ..
        } => {
            assert_eq!(overrides.dt, Some(0.0005));
            assert_eq!(overrides.horizon, Some(4.0));
            assert_eq!(overrides.integrator, Some(IntegratorKind::Rk4));
            assert!(json);
            assert!(verbose);
        }
        other => panic!("expected run, got {other:?}"),
    }
}

#[test]
fn test_parse_run_bad_values_are_ignored() {
    let args = Args::parse_from([
        "heelsim",
        "run",
        "barge.toml",
        "--dt",
        "fast",
        "--integrator",
        "verlet",
    ]);
    match args.command {
        Command::Run { overrides, .. } => assert_eq!(overrides, RunOverrides::default()),
        other => panic!("expected run, got {other:?}"),
    }
}

#[test]
fn test_parse_run_flag_without_value() {
    let args = Args::parse_from(["heelsim", "run", "barge.toml", "--dt"]);
    match args.command {
        Command::Run { overrides, .. } => assert!(overrides.dt.is_none()),
        other => panic!("expected run, got {other:?}"),
    }
}

#[test]
fn test_parse_run_missing_path() {
    let args = Args::parse_from(["heelsim", "run"]);
    assert_eq!(args.command, Command::Help);
}

#[test]
fn test_parse_equilibrium_and_tracker() {
    let args = Args::parse_from(["heelsim", "equilibrium", "barge.toml", "--json"]);
    assert_eq!(
        args.command,
        Command::Equilibrium {
            config_path: PathBuf::from("barge.toml"),
            json: true,
        }
    );

    let args = Args::parse_from(["heelsim", "tracker", "video.txt"]);
    assert_eq!(
        args.command,
        Command::Tracker {
            data_path: PathBuf::from("video.txt"),
            json: false,
        }
    );

    assert_eq!(
        Args::parse_from(["heelsim", "tracker"]).command,
        Command::Help
    );
}

// ============================================================================
// Command tests
// ============================================================================

#[test]
fn test_load_config_applies_overrides() {
    let text = StabilityConfig::reference().to_toml().unwrap();
    let path = write_temp("overrides.toml", &text);
    let overrides = RunOverrides {
        dt: Some(0.002),
        horizon: Some(1.0),
        integrator: Some(IntegratorKind::Rk4),
    };
    let config = load_config(&path, overrides).unwrap();
    assert!((config.simulation.dt - 0.002).abs() < f64::EPSILON);
    assert!((config.simulation.horizon - 1.0).abs() < f64::EPSILON);
    assert_eq!(config.simulation.integrator, IntegratorKind::Rk4);
    let _ = std::fs::remove_file(path);
}

#[test]
fn test_load_config_rejects_invalid_override() {
    let text = StabilityConfig::reference().to_toml().unwrap();
    let path = write_temp("bad-override.toml", &text);
    let overrides = RunOverrides {
        dt: Some(-1.0),
        ..RunOverrides::default()
    };
    assert!(load_config(&path, overrides).unwrap_err().is_config_error());
    let _ = std::fs::remove_file(path);
}

#[test]
fn test_run_cli_missing_file_fails() {
    let code = run_cli(Args::parse_from(["heelsim", "run", "/nonexistent/barge.toml"]));
    assert_eq!(code, ExitCode::from(1));
}

#[test]
fn test_run_cli_invalid_config_exit_code() {
    let path = write_temp("invalid.toml", "[barge]\nlength = 7.0\n");
    let code = run_cli(Args::parse_from(["heelsim", "equilibrium", path.to_str().unwrap()]));
    assert_eq!(code, ExitCode::from(2));
    let _ = std::fs::remove_file(path);
}

#[test]
fn test_run_cli_help_and_version() {
    assert_eq!(run_cli(Args::parse_from(["heelsim"])), ExitCode::SUCCESS);
    assert_eq!(
        run_cli(Args::parse_from(["heelsim", "version"])),
        ExitCode::SUCCESS
    );
}

// ============================================================================
// Output tests
// ============================================================================

#[test]
fn test_format_equilibrium() {
    let assembly = StabilityConfig::reference().assembly().unwrap();
    let text = format_equilibrium(&assembly.equilibrium());
    assert!(text.contains("Draft:"));
    assert!(text.contains("23200.0 kg"));
    assert!(text.contains("Max stable angle"));
}

#[test]
fn test_format_report() {
    let mut config = StabilityConfig::reference();
    config.simulation.horizon = 2.0;
    let report = StabilityEngine::new(&config).unwrap().run().unwrap();

    let text = format_report(&report, false);
    assert!(text.contains("Outcome:"));
    assert!(text.contains("Step size:         ✓"));
    assert!(!text.contains("ω_n·dt = 0.0000"));
    assert!(text.contains("Energy drift:"));

    let verbose = format_report(&report, true);
    // One row per simulated second plus the header.
    assert!(verbose.lines().count() >= text.lines().count() + 3);
}

#[test]
fn test_report_json_carries_energy_series() {
    let mut config = StabilityConfig::reference();
    config.simulation.horizon = 0.1;
    let report = StabilityEngine::new(&config).unwrap().run().unwrap();

    let json = serde_json::to_value(&report).unwrap();
    let energy = json["energy"].as_array().unwrap();
    assert_eq!(energy.len(), report.trajectory.len());
    assert!(energy[1]["ek"].is_number());
}

#[test]
fn test_format_reference() {
    let reference = ReferenceTrajectory::parse("0 1 0 0 0 0 1\n0.1 1 0 0 0 -1 1\n").unwrap();
    let text = format_reference(&reference);
    assert_eq!(text.lines().count(), 3);
    assert!(text.contains("0.785398"));
}
