//! Core simulation engine.
//!
//! Implements the heel integration loop with:
//! - Fixed-step integration (explicit Euler by default)
//! - Jidoka guards for stop-on-error
//! - Run outcome classification
//!
//! A run is one bounded loop of `round(horizon / dt)` steps starting from a
//! level barge at rest. Each accepted sample is appended to the trajectory;
//! the sample that leaves the hydrostatic model's domain is not.

pub mod jidoka;
pub mod state;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

pub use jidoka::{JidokaConfig, JidokaGuard, StepSizeCheck, StepVerdict};
pub use state::{HeelState, Trajectory, Vec2};

use crate::config::{SimulationConfig, StabilityConfig};
use crate::domains::assembly::{Assembly, EquilibriumSnapshot};
use crate::domains::dynamics::IntegratorKind;
use crate::domains::energy::{EnergyAccounting, EnergySample};
use crate::domains::hydrostatics::DomainViolation;
use crate::domains::torque::TorqueModel;
use crate::error::SimResult;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// The submerged trapezoid left `[0, height]`; integration stopped.
    Capsized {
        /// Time of the rejected step (s).
        t: f64,
        /// Heel of the rejected step (rad).
        theta: f64,
        /// Which edge left the water or went under.
        violation: DomainViolation,
    },
    /// The tail of the run stayed within the settle tolerance.
    Settled {
        /// Mean heel over the tail (rad).
        angle: f64,
    },
    /// The heel was still moving at the end of the horizon.
    Oscillating {
        /// Mean heel over the tail (rad).
        mean: f64,
        /// Half the peak-to-peak heel over the tail (rad).
        amplitude: f64,
    },
}

impl Outcome {
    /// Whether the run ended in a capsize.
    #[must_use]
    pub const fn is_capsized(&self) -> bool {
        matches!(self, Self::Capsized { .. })
    }

    /// Short label for display.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Capsized { .. } => "capsized",
            Self::Settled { .. } => "settled",
            Self::Oscillating { .. } => "oscillating",
        }
    }

    /// Classify a completed run from the last tenth of its samples.
    #[must_use]
    pub fn classify(trajectory: &Trajectory, settle_tolerance: f64) -> Self {
        let samples = trajectory.samples();
        let tail_len = (samples.len() / 10).max(2).min(samples.len());
        let tail = &samples[samples.len() - tail_len..];

        if tail.is_empty() {
            return Self::Settled { angle: 0.0 };
        }

        let (lo, hi) = tail
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| {
                (lo.min(s.theta), hi.max(s.theta))
            });
        #[allow(clippy::cast_precision_loss)]
        let mean = tail.iter().map(|s| s.theta).sum::<f64>() / tail.len() as f64;

        if hi - lo < settle_tolerance {
            Self::Settled { angle: mean }
        } else {
            Self::Oscillating {
                mean,
                amplitude: (hi - lo) / 2.0,
            }
        }
    }
}

/// Result of one stability run.
#[derive(Debug, Clone, Serialize)]
pub struct StabilityReport {
    /// Static quantities at zero heel.
    pub equilibrium: EquilibriumSnapshot,
    /// How the run ended.
    pub outcome: Outcome,
    /// `|θ|` exceeded the divergence limit at some point.
    pub diverged: bool,
    /// First time the divergence limit was exceeded.
    pub diverged_at: Option<f64>,
    /// Pre-flight step size check.
    pub step_size: StepSizeCheck,
    /// Reference heel `min(immersion, emergence)` (rad).
    pub max_stable_angle: f64,
    /// Integrator used.
    pub integrator: IntegratorKind,
    /// Timestep (s).
    pub dt: f64,
    /// Accepted samples, starting with the level barge at rest.
    pub trajectory: Trajectory,
    /// Energy terms aligned with the trajectory samples.
    pub energy: Vec<EnergySample>,
}

impl StabilityReport {
    /// Final accepted sample.
    #[must_use]
    pub fn final_state(&self) -> HeelState {
        self.trajectory
            .last()
            .copied()
            .unwrap_or_else(HeelState::at_rest)
    }
}

/// Stability simulation engine.
///
/// Owns the immutable assembly and the run parameters; each call to
/// [`StabilityEngine::run`] is an independent run from rest.
#[derive(Debug, Clone)]
pub struct StabilityEngine {
    assembly: Assembly,
    params: SimulationConfig,
    jidoka: JidokaConfig,
}

impl StabilityEngine {
    /// Create a new engine from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid or the assembly cannot
    /// float.
    pub fn new(config: &StabilityConfig) -> SimResult<Self> {
        config.validate_all()?;
        let assembly = config.assembly()?;
        Ok(Self::from_parts(
            assembly,
            config.simulation,
            config.jidoka.clone(),
        ))
    }

    /// Create an engine from an already-built assembly.
    #[must_use]
    pub const fn from_parts(
        assembly: Assembly,
        params: SimulationConfig,
        jidoka: JidokaConfig,
    ) -> Self {
        Self {
            assembly,
            params,
            jidoka,
        }
    }

    /// The simulated structure.
    #[must_use]
    pub const fn assembly(&self) -> &Assembly {
        &self.assembly
    }

    /// Run parameters.
    #[must_use]
    pub const fn params(&self) -> &SimulationConfig {
        &self.params
    }

    /// Torque model of the assembly.
    #[must_use]
    pub fn torque_model(&self) -> TorqueModel {
        TorqueModel::new(&self.assembly)
    }

    /// Pre-flight step size check for the configured `dt`.
    #[must_use]
    pub fn step_size_check(&self) -> StepSizeCheck {
        StepSizeCheck::evaluate(&self.torque_model(), self.params.dt)
    }

    /// Integrate the heel over the configured horizon.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `dt` or `horizon` cannot give a
    /// bounded step count, and `NonFiniteValue` if θ, ω or α becomes NaN or
    /// infinite.
    pub fn run(&self) -> SimResult<StabilityReport> {
        let model = self.torque_model();
        let integrator = self.params.integrator.build();
        let dt = self.params.dt;
        let steps = self.params.checked_step_count()?;

        let step_size = StepSizeCheck::evaluate(&model, dt);
        if self.jidoka.check_step_size && !step_size.stable {
            warn!(
                dt,
                natural_frequency = step_size.natural_frequency,
                stability_number = step_size.stability_number,
                "timestep too large for explicit Euler (ω_n·dt ≥ 2), expect divergence"
            );
        }

        let equilibrium = self.assembly.equilibrium();
        debug!(
            draft = equilibrium.draft,
            inertia = equilibrium.moment_of_inertia,
            destabilizing = model.destabilizing_torque(),
            "torque model resolved"
        );
        info!(
            steps,
            dt,
            integrator = integrator.name(),
            "starting stability run"
        );

        let mut guard = JidokaGuard::new(self.jidoka.clone(), *model.hydrostatics());
        let mut trajectory = Trajectory::with_capacity(steps.saturating_add(1));
        let mut state = HeelState::at_rest();
        trajectory.push(state);

        let mut capsized = None;
        for k in 1..=steps {
            #[allow(clippy::cast_precision_loss)]
            let t = k as f64 * dt;
            let mut next = integrator.step(&state, &model, dt);
            next.t = t;

            match guard.check(&next)? {
                StepVerdict::Continue => {
                    trajectory.push(next);
                    state = next;
                }
                StepVerdict::Stop(violation) => {
                    capsized = Some(Outcome::Capsized {
                        t,
                        theta: next.theta,
                        violation,
                    });
                    break;
                }
            }
        }

        let outcome = capsized
            .unwrap_or_else(|| Outcome::classify(&trajectory, self.params.settle_tolerance));
        info!(
            outcome = outcome.label(),
            samples = trajectory.len(),
            max_heel = trajectory.max_abs_angle(),
            "stability run finished"
        );

        let energy = self.energy(&trajectory);

        Ok(StabilityReport {
            energy,
            max_stable_angle: equilibrium.max_stable_angle,
            equilibrium,
            outcome,
            diverged: guard.diverged_at().is_some(),
            diverged_at: guard.diverged_at(),
            step_size,
            integrator: self.params.integrator,
            dt,
            trajectory,
        })
    }

    /// Energy series of a trajectory, using the configured kinetic term.
    #[must_use]
    pub fn energy(&self, trajectory: &Trajectory) -> Vec<EnergySample> {
        EnergyAccounting::new(&self.assembly, self.params.kinetic_term).compute(trajectory)
    }
}
