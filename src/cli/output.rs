//! CLI output formatting.
//!
//! Formatting is split from printing so the text can be tested.

use std::fmt::Write as _;

use crate::domains::assembly::EquilibriumSnapshot;
use crate::domains::energy::total_energy_drift;
use crate::engine::{Outcome, StabilityReport};
use crate::tracker::ReferenceTrajectory;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Print version information.
pub fn print_version() {
    println!("heelsim {}", env!("HEELSIM_VERSION"));
}

/// Print help message.
pub fn print_help() {
    println!(
        r"heelsim - Heel stability of a barge carrying an articulated crane

USAGE:
    heelsim <COMMAND> [OPTIONS]

COMMANDS:
    run <config.toml>           Integrate the heel angle and classify the run
        --dt <S>                Override simulation.dt
        --horizon <S>           Override simulation.horizon
        --integrator <NAME>     euler (default) or rk4
        --json                  Print the full report as JSON
        -v, --verbose           Debug logging and per-second samples

    equilibrium <config.toml>   Print the static quantities at zero heel
        --json                  Print as JSON

    tracker <data.txt>          Heel series from a tracker export (t x1 y1 x2 y2 x3 y3)
        --json                  Print as JSON

    help                        Show this help message
    version                     Show version information

EXAMPLES:
    heelsim run configs/barge.toml
    heelsim run configs/barge.toml --dt 0.0005 --integrator rk4
    heelsim equilibrium configs/barge.toml --json

Set RUST_LOG to control log output (default: info).
"
    );
}

/// Render the equilibrium snapshot as text.
#[must_use]
pub fn format_equilibrium(eq: &EquilibriumSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Equilibrium (zero heel):");
    let _ = writeln!(out, "  Total mass:            {:.1} kg", eq.total_mass);
    let _ = writeln!(out, "  Crane mass:            {:.1} kg", eq.crane_mass);
    let _ = writeln!(out, "  Draft:                 {:.4} m", eq.draft);
    let _ = writeln!(out, "  Submerged area:        {:.4} m²", eq.submerged_area);
    let _ = writeln!(
        out,
        "  Crane COM (crane):     ({:.4}, {:.4}) m",
        eq.crane_center_of_mass_local.x, eq.crane_center_of_mass_local.y
    );
    let _ = writeln!(
        out,
        "  Crane COM:             ({:.4}, {:.4}) m",
        eq.crane_center_of_mass.x, eq.crane_center_of_mass.y
    );
    let _ = writeln!(
        out,
        "  Barge COM:             ({:.4}, {:.4}) m",
        eq.barge_center_of_mass.x, eq.barge_center_of_mass.y
    );
    let _ = writeln!(
        out,
        "  Total COM:             ({:.4}, {:.4}) m",
        eq.total_center_of_mass.x, eq.total_center_of_mass.y
    );
    let _ = writeln!(
        out,
        "  Center of pressure:    ({:.4}, {:.4}) m",
        eq.center_of_pressure.x, eq.center_of_pressure.y
    );
    let _ = writeln!(out, "  Moment of inertia:     {:.1} kg·m²", eq.moment_of_inertia);
    let _ = writeln!(
        out,
        "  Immersion angle:       {:.4} rad ({:.2}°)",
        eq.immersion_angle,
        eq.immersion_angle.to_degrees()
    );
    let _ = writeln!(
        out,
        "  Emergence angle:       {:.4} rad ({:.2}°)",
        eq.emergence_angle,
        eq.emergence_angle.to_degrees()
    );
    let _ = writeln!(
        out,
        "  Max stable angle:      {:.4} rad ({:.2}°)",
        eq.max_stable_angle,
        eq.max_stable_angle.to_degrees()
    );
    out
}

/// Render a stability report as text.
#[must_use]
pub fn format_report(report: &StabilityReport, verbose: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(
        out,
        "Outcome: {}",
        report.outcome.label().to_ascii_uppercase()
    );
    let _ = writeln!(out, "{RULE}\n");

    match report.outcome {
        Outcome::Capsized {
            t,
            theta,
            violation,
        } => {
            let _ = writeln!(out, "  Capsized at t = {t:.4} s, θ = {theta:.6} rad: {violation}");
        }
        Outcome::Settled { angle } => {
            let _ = writeln!(
                out,
                "  Settled heel:      {angle:.6} rad ({:.3}°)",
                angle.to_degrees()
            );
        }
        Outcome::Oscillating { mean, amplitude } => {
            let _ = writeln!(out, "  Mean heel:         {mean:.6} rad");
            let _ = writeln!(out, "  Amplitude:         {amplitude:.6} rad");
        }
    }

    let _ = writeln!(
        out,
        "  Max |θ|:           {:.6} rad",
        report.trajectory.max_abs_angle()
    );
    let _ = writeln!(
        out,
        "  Max stable angle:  {:.6} rad",
        report.max_stable_angle
    );
    let _ = writeln!(
        out,
        "  Integrator:        {:?}, dt = {} s, {} samples",
        report.integrator,
        report.dt,
        report.trajectory.len()
    );

    let step = &report.step_size;
    let sym = if step.stable { "✓" } else { "✗" };
    let _ = writeln!(
        out,
        "  Step size:         {sym} ω_n = {:.4} rad/s, ω_n·dt = {:.4}",
        step.natural_frequency, step.stability_number
    );
    let _ = writeln!(
        out,
        "  Energy drift:      {:.6e} J",
        total_energy_drift(&report.energy)
    );
    if let Some(t) = report.diverged_at {
        let _ = writeln!(out, "  Diverged:          |θ| exceeded the limit at t = {t:.4} s");
    }

    if verbose {
        let _ = writeln!(out, "\n{:>10} {:>14} {:>14} {:>14}", "t", "θ", "ω", "α");
        let per_second = (1.0 / report.dt).round().max(1.0) as usize;
        for s in report.trajectory.samples().iter().step_by(per_second) {
            let _ = writeln!(
                out,
                "{:>10.3} {:>14.6e} {:>14.6e} {:>14.6e}",
                s.t, s.theta, s.omega, s.alpha
            );
        }
    }

    out
}

/// Render a tracker reference series as text.
#[must_use]
pub fn format_reference(reference: &ReferenceTrajectory) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:>10} {:>14} {:>14}", "t", "angle", "heel");
    for ((t, angle), heel) in reference
        .times()
        .iter()
        .zip(reference.angles())
        .zip(reference.heel_series())
    {
        let _ = writeln!(out, "{t:>10.4} {angle:>14.6} {heel:>14.6}");
    }
    out
}

/// Print the equilibrium snapshot.
pub fn print_equilibrium(eq: &EquilibriumSnapshot) {
    print!("{}", format_equilibrium(eq));
}

/// Print a stability report.
pub fn print_report(report: &StabilityReport, verbose: bool) {
    print!("{}", format_report(report, verbose));
}

/// Print a tracker reference series.
pub fn print_reference(reference: &ReferenceTrajectory) {
    print!("{}", format_reference(reference));
}
