//! Rotational dynamics and numerical integration.
//!
//! Implements fixed-step integration of `I·θ̈ = τ(θ, θ̇)`:
//! - Euler (1st order, the reference scheme)
//! - RK4 (4th order, optional)
//!
//! # Stability
//!
//! The Euler recurrence is only conditionally stable: with natural frequency
//! `ω_n`, steps with `ω_n·dt ≥ 2` make the heel grow without bound.

use serde::{Deserialize, Serialize};

use crate::engine::state::HeelState;

/// Torque field trait for computing angular accelerations.
pub trait TorqueField {
    /// Net torque at heel `theta` and angular velocity `omega` (N·m).
    fn net_torque(&self, theta: f64, omega: f64) -> f64;

    /// Roll moment of inertia (kg·m²).
    fn moment_of_inertia(&self) -> f64;

    /// Angular acceleration `τ / I` (rad/s²).
    fn angular_acceleration(&self, theta: f64, omega: f64) -> f64 {
        self.net_torque(theta, omega) / self.moment_of_inertia()
    }
}

/// Numerical integrator trait.
pub trait Integrator {
    /// Advance `state` by one timestep and return the new sample.
    fn step(&self, state: &HeelState, field: &dyn TorqueField, dt: f64) -> HeelState;

    /// Get the error order of this integrator.
    fn error_order(&self) -> u32;

    /// Human-readable name.
    fn name(&self) -> &'static str;
}

/// Integrator selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegratorKind {
    /// Explicit Euler (default, matches the reference outputs).
    #[default]
    Euler,
    /// Classical fourth-order Runge-Kutta.
    Rk4,
}

impl IntegratorKind {
    /// Instantiate the selected integrator.
    #[must_use]
    pub fn build(self) -> Box<dyn Integrator + Send + Sync> {
        match self {
            Self::Euler => Box::new(EulerIntegrator::new()),
            Self::Rk4 => Box::new(RK4Integrator::new()),
        }
    }
}

impl std::str::FromStr for IntegratorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "euler" => Ok(Self::Euler),
            "rk4" => Ok(Self::Rk4),
            other => Err(format!("unknown integrator '{other}' (expected euler or rk4)")),
        }
    }
}

/// Euler integrator.
///
/// Algorithm:
/// ```text
/// α_{k+1} = τ(θ_k, ω_k) / I
/// ω_{k+1} = ω_k + α_{k+1}·dt
/// θ_{k+1} = θ_k + ω_{k+1}·dt
/// ```
#[derive(Debug, Clone, Default)]
pub struct EulerIntegrator;

impl EulerIntegrator {
    /// Create a new Euler integrator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Integrator for EulerIntegrator {
    fn step(&self, state: &HeelState, field: &dyn TorqueField, dt: f64) -> HeelState {
        let alpha = field.angular_acceleration(state.theta, state.omega);
        let omega = state.omega + alpha * dt;
        let theta = state.theta + omega * dt;
        HeelState {
            t: state.t + dt,
            theta,
            omega,
            alpha,
        }
    }

    fn error_order(&self) -> u32 {
        1
    }

    fn name(&self) -> &'static str {
        "euler"
    }
}

/// Runge-Kutta 4th order integrator over `(θ, ω)`.
///
/// The recorded `α` is the acceleration at the accepted state.
#[derive(Debug, Clone, Default)]
pub struct RK4Integrator;

impl RK4Integrator {
    /// Create a new RK4 integrator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Integrator for RK4Integrator {
    fn step(&self, state: &HeelState, field: &dyn TorqueField, dt: f64) -> HeelState {
        let half_dt = dt / 2.0;
        let sixth_dt = dt / 6.0;
        let (theta0, omega0) = (state.theta, state.omega);

        let k1_q = omega0;
        let k1_v = field.angular_acceleration(theta0, omega0);

        let k2_q = omega0 + k1_v * half_dt;
        let k2_v = field.angular_acceleration(theta0 + k1_q * half_dt, k2_q);

        let k3_q = omega0 + k2_v * half_dt;
        let k3_v = field.angular_acceleration(theta0 + k2_q * half_dt, k3_q);

        let k4_q = omega0 + k3_v * dt;
        let k4_v = field.angular_acceleration(theta0 + k3_q * dt, k4_q);

        let theta = theta0 + (k1_q + 2.0 * k2_q + 2.0 * k3_q + k4_q) * sixth_dt;
        let omega = omega0 + (k1_v + 2.0 * k2_v + 2.0 * k3_v + k4_v) * sixth_dt;

        HeelState {
            t: state.t + dt,
            theta,
            omega,
            alpha: field.angular_acceleration(theta, omega),
        }
    }

    fn error_order(&self) -> u32 {
        4
    }

    fn name(&self) -> &'static str {
        "rk4"
    }
}
