//! CLI argument parsing.
//!
//! Hand-rolled so that parsing stays testable from any iterator of strings.

use std::path::PathBuf;

use crate::domains::dynamics::IntegratorKind;

/// CLI arguments container.
#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    /// The command to execute.
    pub command: Command,
}

/// Overrides applied on top of the `[simulation]` section.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunOverrides {
    /// `--dt`
    pub dt: Option<f64>,
    /// `--horizon`
    pub horizon: Option<f64>,
    /// `--integrator`
    pub integrator: Option<IntegratorKind>,
}

/// Available CLI commands.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Integrate the heel and report the outcome.
    Run {
        /// Path to the TOML configuration.
        config_path: PathBuf,
        /// Simulation parameter overrides.
        overrides: RunOverrides,
        /// Print the report as JSON.
        json: bool,
        /// Enable verbose output.
        verbose: bool,
    },
    /// Print the static equilibrium quantities.
    Equilibrium {
        /// Path to the TOML configuration.
        config_path: PathBuf,
        /// Print as JSON.
        json: bool,
    },
    /// Derive a reference heel series from a tracker export.
    Tracker {
        /// Path to the tracker export.
        data_path: PathBuf,
        /// Print as JSON.
        json: bool,
    },
    /// Show help
    Help,
    /// Show version
    Version,
}

impl Args {
    /// Parse command-line arguments from an iterator.
    ///
    /// This method is testable as it accepts any iterator of strings,
    /// not just `std::env::args()`.
    #[must_use]
    pub fn parse_from<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();
        Self::parse_from_vec(&args)
    }

    /// Parse command-line arguments from the environment.
    #[must_use]
    pub fn parse() -> Self {
        Self::parse_from(std::env::args())
    }

    /// Whether `-v`/`--verbose` was given.
    #[must_use]
    pub const fn verbose(&self) -> bool {
        matches!(self.command, Command::Run { verbose: true, .. })
    }

    fn parse_from_vec(args: &[String]) -> Self {
        if args.len() < 2 {
            return Self {
                command: Command::Help,
            };
        }

        let command = match args[1].as_str() {
            "run" => Self::parse_run_command(args),
            "equilibrium" => Self::parse_equilibrium_command(args),
            "tracker" => Self::parse_tracker_command(args),
            "-h" | "--help" | "help" => Command::Help,
            "-V" | "--version" | "version" => Command::Version,
            unknown => {
                eprintln!("Unknown command: {unknown}");
                Command::Help
            }
        };

        Self { command }
    }

    fn parse_run_command(args: &[String]) -> Command {
        if args.len() < 3 {
            eprintln!("Error: 'run' command requires a configuration path");
            return Command::Help;
        }

        let mut overrides = RunOverrides::default();
        let mut json = false;
        let mut verbose = false;

        let mut i = 3;
        while i < args.len() {
            match args[i].as_str() {
                "--dt" => {
                    overrides.dt = Self::value(args, i).and_then(|v| v.parse().ok());
                    i += 2;
                }
                "--horizon" => {
                    overrides.horizon = Self::value(args, i).and_then(|v| v.parse().ok());
                    i += 2;
                }
                "--integrator" => {
                    overrides.integrator = Self::value(args, i).and_then(|v| {
                        v.parse()
                            .map_err(|e| eprintln!("Warning: {e}, keeping configured integrator"))
                            .ok()
                    });
                    i += 2;
                }
                "--json" => {
                    json = true;
                    i += 1;
                }
                "-v" | "--verbose" => {
                    verbose = true;
                    i += 1;
                }
                _ => i += 1,
            }
        }

        Command::Run {
            config_path: PathBuf::from(&args[2]),
            overrides,
            json,
            verbose,
        }
    }

    fn parse_equilibrium_command(args: &[String]) -> Command {
        if args.len() < 3 {
            eprintln!("Error: 'equilibrium' command requires a configuration path");
            return Command::Help;
        }

        Command::Equilibrium {
            config_path: PathBuf::from(&args[2]),
            json: args[3..].iter().any(|a| a == "--json"),
        }
    }

    fn parse_tracker_command(args: &[String]) -> Command {
        if args.len() < 3 {
            eprintln!("Error: 'tracker' command requires a data file path");
            return Command::Help;
        }

        Command::Tracker {
            data_path: PathBuf::from(&args[2]),
            json: args[3..].iter().any(|a| a == "--json"),
        }
    }

    fn value(args: &[String], flag: usize) -> Option<&str> {
        args.get(flag + 1).map(String::as_str)
    }
}
