//! CLI module for heelsim.
//!
//! All CLI logic lives here rather than in main.rs so it can be tested.
//! The entry point `run_cli` is called from main.rs with parsed arguments.

mod args;
mod commands;
mod output;

pub use args::{Args, Command, RunOverrides};
pub use commands::{equilibrium, load_config, run_cli, run_stability, tracker};
pub use output::{
    format_equilibrium, format_reference, format_report, print_equilibrium, print_help,
    print_reference, print_report, print_version,
};

#[cfg(test)]
mod tests;
