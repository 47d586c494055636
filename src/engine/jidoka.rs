//! Jidoka (自働化) - Autonomous anomaly detection.
//!
//! The guard inspects every new heel sample before it is written to the
//! trajectory and stops the line when the model can no longer be trusted.
//!
//! # Anomaly Types
//!
//! 1. **Non-finite values**: NaN or Inf in θ, ω or α (fatal, run aborts)
//! 2. **Domain violations**: the submerged trapezoid left `[0, height]`
//!    (critical, integration stops and the run is reported as capsized)
//! 3. **Divergence**: `|θ|` above the configured limit (warning, flagged)
//! 4. **Step size**: `ω_n·dt ≥ 2` makes explicit Euler unstable (pre-flight
//!    warning)

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domains::hydrostatics::{DomainViolation, Hydrostatics};
use crate::domains::torque::TorqueModel;
use crate::engine::state::HeelState;
use crate::error::{SimError, SimResult};

/// Severity levels for Jidoka violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ViolationSeverity {
    /// Acceptable variance within tolerance (continue).
    Acceptable,
    /// Warning: approaching tolerance boundary (log, continue).
    Warning,
    /// Critical: tolerance exceeded (stop the line).
    Critical,
    /// Fatal: unrecoverable state (halt immediately).
    Fatal,
}

/// Classifier for graduated Jidoka responses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeverityClassifier {
    /// Warning threshold as fraction of the limit (e.g., 0.8 = warn at 80%).
    pub warning_fraction: f64,
}

impl Default for SeverityClassifier {
    fn default() -> Self {
        Self {
            warning_fraction: 0.8,
        }
    }
}

impl SeverityClassifier {
    /// Create a new severity classifier.
    #[must_use]
    pub const fn new(warning_fraction: f64) -> Self {
        Self { warning_fraction }
    }

    /// Classify a heel angle against the maximum stable angle.
    #[must_use]
    pub fn classify_heel(&self, theta: f64, max_stable_angle: f64) -> ViolationSeverity {
        let heel = theta.abs();
        if !heel.is_finite() {
            ViolationSeverity::Fatal
        } else if heel > max_stable_angle {
            ViolationSeverity::Critical
        } else if heel > max_stable_angle * self.warning_fraction {
            ViolationSeverity::Warning
        } else {
            ViolationSeverity::Acceptable
        }
    }
}

/// Jidoka guard configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JidokaConfig {
    /// NaN/Inf detection enabled.
    pub check_finite: bool,
    /// Stop when the submerged trapezoid leaves `[0, height]`.
    pub check_domain: bool,
    /// Flag the run as diverged when `|θ|` exceeds this (rad).
    pub divergence_limit: Option<f64>,
    /// Warn before the run when the step is too large for explicit Euler.
    pub check_step_size: bool,
    /// Severity classifier for graduated responses.
    pub severity_classifier: SeverityClassifier,
}

impl Default for JidokaConfig {
    fn default() -> Self {
        Self {
            check_finite: true,
            check_domain: true,
            divergence_limit: Some(std::f64::consts::PI),
            check_step_size: true,
            severity_classifier: SeverityClassifier::default(),
        }
    }
}

/// What the integration loop should do with a checked sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepVerdict {
    /// Append the sample and keep going.
    Continue,
    /// Drop the sample and stop: the hydrostatic model is invalid.
    Stop(DomainViolation),
}

/// Pre-flight check of the step size against the system's natural frequency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepSizeCheck {
    /// Small-oscillation natural frequency `ω_n` (rad/s).
    pub natural_frequency: f64,
    /// Step size (s).
    pub dt: f64,
    /// `ω_n · dt`; explicit Euler needs it below 2.
    pub stability_number: f64,
    /// Whether `stability_number < 2`.
    pub stable: bool,
}

impl StepSizeCheck {
    /// Evaluate `dt` against the torque model's natural frequency.
    #[must_use]
    pub fn evaluate(model: &TorqueModel, dt: f64) -> Self {
        let natural_frequency = model.natural_frequency();
        let stability_number = natural_frequency * dt;
        Self {
            natural_frequency,
            dt,
            stability_number,
            stable: stability_number < 2.0,
        }
    }
}

/// Jidoka guard for autonomous anomaly detection.
#[derive(Debug, Clone)]
pub struct JidokaGuard {
    /// Configuration.
    config: JidokaConfig,
    /// Hull model used for the domain check.
    hydrostatics: Hydrostatics,
    /// Time at which `|θ|` first exceeded the divergence limit.
    diverged_at: Option<f64>,
    /// Whether the approaching-limit warning was already logged.
    warned_near_limit: bool,
}

impl JidokaGuard {
    /// Create a new Jidoka guard for the given hull.
    #[must_use]
    pub const fn new(config: JidokaConfig, hydrostatics: Hydrostatics) -> Self {
        Self {
            config,
            hydrostatics,
            diverged_at: None,
            warned_near_limit: false,
        }
    }

    /// Check a new sample before it is appended.
    ///
    /// # Errors
    ///
    /// Returns `NonFiniteValue` if θ, ω or α is NaN or infinite.
    pub fn check(&mut self, state: &HeelState) -> SimResult<StepVerdict> {
        if self.config.check_finite {
            Self::check_finite(state)?;
        }

        self.check_divergence(state);
        self.check_near_limit(state);

        if self.config.check_domain {
            if let Err(violation) = self.hydrostatics.check_domain(state.theta) {
                warn!(t = state.t, theta = state.theta, %violation, "trapezoid model left its domain");
                return Ok(StepVerdict::Stop(violation));
            }
        }

        Ok(StepVerdict::Continue)
    }

    fn check_finite(state: &HeelState) -> SimResult<()> {
        for (name, value) in [
            ("theta", state.theta),
            ("omega", state.omega),
            ("alpha", state.alpha),
        ] {
            if !value.is_finite() {
                return Err(SimError::NonFiniteValue {
                    location: format!("{name} at t={:.6}s", state.t),
                });
            }
        }
        Ok(())
    }

    fn check_divergence(&mut self, state: &HeelState) {
        let Some(limit) = self.config.divergence_limit else {
            return;
        };
        if self.diverged_at.is_none() && state.theta.abs() > limit {
            warn!(t = state.t, theta = state.theta, limit, "heel angle diverged");
            self.diverged_at = Some(state.t);
        }
    }

    fn check_near_limit(&mut self, state: &HeelState) {
        if self.warned_near_limit {
            return;
        }
        let severity = self
            .config
            .severity_classifier
            .classify_heel(state.theta, self.hydrostatics.max_stable_angle());
        if severity == ViolationSeverity::Warning {
            warn!(
                t = state.t,
                theta = state.theta,
                max_stable_angle = self.hydrostatics.max_stable_angle(),
                "heel approaching the maximum stable angle"
            );
            self.warned_near_limit = true;
        }
    }

    /// Time at which the run was first flagged as diverged.
    #[must_use]
    pub const fn diverged_at(&self) -> Option<f64> {
        self.diverged_at
    }

    /// Get current configuration.
    #[must_use]
    pub const fn config(&self) -> &JidokaConfig {
        &self.config
    }

    /// Reset per-run flags.
    #[allow(clippy::missing_const_for_fn)]
    pub fn reset(&mut self) {
        self.diverged_at = None;
        self.warned_near_limit = false;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    fn hull() -> Hydrostatics {
        Hydrostatics::new(7.0, 3.0, 0.5 * 997.0 * 49.0, 997.0).unwrap()
    }

    fn at(theta: f64) -> HeelState {
        HeelState {
            t: 1.0,
            theta,
            ..HeelState::at_rest()
        }
    }

    #[test]
    fn test_level_state_passes() {
        let mut guard = JidokaGuard::new(JidokaConfig::default(), hull());
        assert_eq!(guard.check(&HeelState::at_rest()).unwrap(), StepVerdict::Continue);
        assert!(guard.diverged_at().is_none());
    }

    #[test]
    fn test_finite_check_catches_nan() {
        let mut guard = JidokaGuard::new(JidokaConfig::default(), hull());
        let state = HeelState {
            omega: f64::NAN,
            ..HeelState::at_rest()
        };
        let err = guard.check(&state).unwrap_err();
        assert!(err.is_jidoka_violation());
        assert!(err.to_string().contains("omega"));
    }

    #[test]
    fn test_domain_violation_stops() {
        let mut guard = JidokaGuard::new(JidokaConfig::default(), hull());
        match guard.check(&at(0.3)).unwrap() {
            StepVerdict::Stop(DomainViolation::Emergence { depth }) => assert!(depth < 0.0),
            other => panic!("expected emergence stop, got {other:?}"),
        }
    }

    #[test]
    fn test_domain_check_disabled() {
        let config = JidokaConfig {
            check_domain: false,
            ..Default::default()
        };
        let mut guard = JidokaGuard::new(config, hull());
        assert_eq!(guard.check(&at(0.3)).unwrap(), StepVerdict::Continue);
    }

    #[test]
    fn test_divergence_flag_is_non_fatal() {
        let config = JidokaConfig {
            check_domain: false,
            divergence_limit: Some(1.0),
            ..Default::default()
        };
        let mut guard = JidokaGuard::new(config, hull());
        assert_eq!(guard.check(&at(1.5)).unwrap(), StepVerdict::Continue);
        assert_eq!(guard.diverged_at(), Some(1.0));

        guard.reset();
        assert!(guard.diverged_at().is_none());
    }

    #[test]
    fn test_severity_classifier() {
        let c = SeverityClassifier::default();
        assert_eq!(c.classify_heel(0.05, 0.1), ViolationSeverity::Acceptable);
        assert_eq!(c.classify_heel(-0.09, 0.1), ViolationSeverity::Warning);
        assert_eq!(c.classify_heel(0.2, 0.1), ViolationSeverity::Critical);
        assert_eq!(c.classify_heel(f64::NAN, 0.1), ViolationSeverity::Fatal);
        assert!(ViolationSeverity::Warning < ViolationSeverity::Critical);
    }

    #[test]
    fn test_config_default() {
        let config = JidokaConfig::default();
        assert!(config.check_finite);
        assert!(config.check_domain);
        assert!(config.check_step_size);
        assert_eq!(config.divergence_limit, Some(std::f64::consts::PI));
    }
}
