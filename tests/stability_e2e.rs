//! End-to-end stability scenarios.
//!
//! Each test states the hypothesis it tries to falsify.

#![allow(clippy::unwrap_used, clippy::panic, clippy::float_cmp)]

use heelsim::config::BargeConfig;
use heelsim::domains::dynamics::TorqueField;
use heelsim::domains::energy::total_energy_drift;
use heelsim::domains::hydrostatics::DomainViolation;
use heelsim::prelude::*;

fn reference(damping: f64) -> StabilityConfig {
    let mut config = StabilityConfig::reference();
    config.barge.damping = damping;
    config
}

fn single_socle(crane_offset: f64) -> StabilityConfig {
    StabilityConfig::builder()
        .barge(BargeConfig {
            length: 7.0,
            height: 3.0,
            mass: 20_000.0,
            crane_offset,
            damping: 0.0,
        })
        .socle(2.0, 1.0, 500.0)
        .dt(1e-4)
        .horizon(1e-4)
        .build()
}

fn top_heavy() -> StabilityConfig {
    StabilityConfig::builder()
        .barge(BargeConfig {
            length: 7.0,
            height: 3.0,
            mass: 3000.0,
            crane_offset: 6.5,
            damping: 0.0,
        })
        .socle(1.0, 0.6, 2000.0)
        .segment(6.0, 3000.0)
        .segment(6.0, 3000.0)
        .angles(vec![0.0, 0.0])
        .build()
}

// H0: a damped barge keeps rolling forever.
#[test]
fn damped_reference_settles_at_small_heel() {
    let report = StabilityEngine::new(&reference(2.0e5))
        .unwrap()
        .run()
        .unwrap();

    match report.outcome {
        Outcome::Settled { angle } => {
            assert!((angle + 0.001_397_5).abs() < 1e-5, "angle {angle}");
        }
        other => panic!("expected settled, got {other:?}"),
    }
    assert_eq!(report.trajectory.len(), 9001);
    assert!(report.trajectory.max_abs_angle() < report.max_stable_angle);
    assert!(!report.diverged);
}

// H0: without damping the heel still decays.
#[test]
fn undamped_reference_keeps_oscillating() {
    let report = StabilityEngine::new(&reference(0.0)).unwrap().run().unwrap();
    match report.outcome {
        Outcome::Oscillating { mean, amplitude } => {
            assert!(amplitude > 1e-3, "amplitude {amplitude}");
            assert!(mean < 0.0);
        }
        other => panic!("expected oscillating, got {other:?}"),
    }
}

// H0: a crane far outboard on a light hull does not lift the other edge.
#[test]
fn top_heavy_crane_capsizes() {
    let report = StabilityEngine::new(&top_heavy()).unwrap().run().unwrap();

    match report.outcome {
        Outcome::Capsized {
            t,
            theta,
            violation,
        } => {
            assert!((t - 0.107).abs() < 1e-9, "t {t}");
            assert!(theta < 0.0);
            assert!(matches!(violation, DomainViolation::Emergence { .. }));
        }
        other => panic!("expected capsize, got {other:?}"),
    }

    // The rejected step is not part of the trajectory.
    assert_eq!(report.trajectory.len(), 107);
    let last = report.trajectory.last().unwrap();
    assert!(last.t < 0.107);
}

// H0: explicit Euler is insensitive to the step size.
#[test]
fn doubling_dt_past_stability_limit_capsizes() {
    let mut coarse = reference(2.0e5);
    coarse.simulation.dt = 0.3;
    let coarse_report = StabilityEngine::new(&coarse).unwrap().run().unwrap();
    assert!(coarse_report.step_size.stable);
    assert!(!coarse_report.outcome.is_capsized());

    let mut doubled = coarse.clone();
    doubled.simulation.dt = 0.6;
    let doubled_report = StabilityEngine::new(&doubled).unwrap().run().unwrap();
    assert!(!doubled_report.step_size.stable);
    assert!(doubled_report.step_size.stability_number > 2.0);
    match doubled_report.outcome {
        Outcome::Capsized { t, .. } => assert!((t - 1.8).abs() < 1e-9),
        other => panic!("expected capsize, got {other:?}"),
    }
}

// H0: RK4 disagrees with Euler on where the barge settles.
#[test]
fn rk4_agrees_with_euler_on_settled_heel() {
    let euler = StabilityEngine::new(&reference(2.0e5)).unwrap().run().unwrap();
    let mut config = reference(2.0e5);
    config.simulation.integrator = IntegratorKind::Rk4;
    let rk4 = StabilityEngine::new(&config).unwrap().run().unwrap();

    match (euler.outcome, rk4.outcome) {
        (Outcome::Settled { angle: a }, Outcome::Settled { angle: b }) => {
            assert!((a - b).abs() < 1e-6);
        }
        other => panic!("expected both settled, got {other:?}"),
    }
}

// H0: the first Euler step already moves the heel.
#[test]
fn first_step_follows_the_recurrence_exactly() {
    let engine = StabilityEngine::new(&single_socle(2.0)).unwrap();
    let report = engine.run().unwrap();
    let model = engine.torque_model();
    let dt = 1e-4;

    let alpha = model.angular_acceleration(0.0, 0.0);
    let omega = alpha * dt;
    let step = report.trajectory.samples()[1];
    assert_eq!(step.alpha, alpha);
    assert_eq!(step.omega, omega);
    assert_eq!(step.theta, omega * dt);
    assert!(alpha > 0.0);
}

// H0: a crane over the hull's center line heels the barge.
#[test]
fn centered_crane_keeps_barge_level() {
    let report = StabilityEngine::new(&single_socle(3.0))
        .unwrap()
        .run()
        .unwrap();
    let step = report.trajectory.samples()[1];
    assert_eq!(step.theta, 0.0);
    assert_eq!(step.omega, 0.0);
}

// H0: undamped total energy drifts independently of dt.
#[test]
fn undamped_energy_is_conserved_up_to_truncation() {
    let drift = |dt: f64| {
        let mut config = reference(0.0);
        config.simulation.dt = dt;
        config.simulation.horizon = 2.0;
        let series = StabilityEngine::new(&config).unwrap().run().unwrap().energy;
        let max_kinetic = series.iter().map(|e| e.ek).fold(0.0, f64::max);
        (total_energy_drift(&series), max_kinetic)
    };

    let (coarse, max_kinetic) = drift(1e-3);
    let (fine, _) = drift(1e-4);
    assert!(max_kinetic > 1.0);
    assert!(coarse < 0.02 * max_kinetic, "drift {coarse} vs Ek {max_kinetic}");
    assert!(fine < coarse / 5.0, "fine {fine} coarse {coarse}");
}

// H0: a wrong angle vector is silently truncated.
#[test]
fn angle_count_mismatch_is_fatal() {
    let mut config = reference(0.0);
    config.angles.pop();
    match StabilityEngine::new(&config) {
        Err(SimError::AngleCountMismatch { expected, actual }) => {
            assert_eq!(expected, 4);
            assert_eq!(actual, 3);
        }
        other => panic!("expected angle count mismatch, got {other:?}"),
    }
}

// H0: a config file and the builder describe different structures.
#[test]
fn toml_file_matches_builder() {
    let text = r#"
angles = [0.5235987755982988, 0.0, -0.5235987755982988, 0.0]

[barge]
length = 7.0
height = 3.0
mass = 20000.0
crane_offset = 2.0
damping = 200000.0

[crane.0]
length = 1.0
width = 0.6
mass = 1000.0

[crane.1]
length = 3.0
mass = 600.0

[crane.2]
length = 2.5
mass = 400.0

[crane.3]
length = 2.0
mass = 300.0

[crane.4]
length = 1.0
mass = 100.0

[counterweight]
length = 1.5
mass = 800.0
"#;
    let path = std::env::temp_dir().join(format!("heelsim-e2e-{}.toml", std::process::id()));
    std::fs::write(&path, text).unwrap();
    let loaded = StabilityConfig::load(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    let from_file = loaded.assembly().unwrap().equilibrium();
    let from_builder = StabilityConfig::reference().assembly().unwrap().equilibrium();
    assert!((from_file.draft - from_builder.draft).abs() < 1e-12);
    assert!((from_file.draft - 0.474_894).abs() < 1e-6);
    assert!(
        (from_file.total_center_of_mass.x - from_builder.total_center_of_mass.x).abs() < 1e-12
    );
}

// H0: the tracker overlay cannot be compared with a simulated run.
#[test]
fn tracker_reference_compares_with_simulation() {
    let export = "t x1 y1 x2 y2 x3 y3\n0 1 0 0 0 0 1\n0,5 1 0 0 0 0 1\n1 1 0 0 0 0 1\n";
    let reference_series = ReferenceTrajectory::parse(export).unwrap();
    let mut config = reference(2.0e5);
    config.simulation.horizon = 1.0;
    let report = StabilityEngine::new(&config).unwrap().run().unwrap();

    let rms = reference_series.rms_deviation(&report.trajectory).unwrap();
    assert!(rms < 0.01);
}

// H0: the shipped sample configurations do not load.
#[test]
fn shipped_configs_load() {
    let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("configs");
    let barge = StabilityConfig::load(dir.join("barge.toml")).unwrap();
    assert_eq!(barge.crane.len(), 5);

    let top_heavy_file = StabilityConfig::load(dir.join("top_heavy.toml")).unwrap();
    let report = StabilityEngine::new(&top_heavy_file).unwrap().run().unwrap();
    assert!(report.outcome.is_capsized());
}
