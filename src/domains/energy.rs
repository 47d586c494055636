//! Energy accounting for a finished run.
//!
//! Derived from the trajectory and the torque model only; nothing here feeds
//! back into the integrator.
//!
//! # Terms
//!
//! ```text
//! Eg = W · (y_G(θ) − y_G(0)),   y_G(θ) = G_x·sin θ + G_y·cos θ
//! Ea = −∫ τ_r dθ − Eg           buoyancy share of the righting work
//! Ec = −τ_d · θ                 work against the destabilizing torque
//! Ek = I·ω²/2   (rotational)  or  d·ω²/2   (simplified)
//! ```
//!
//! With zero damping and the rotational kinetic term, `Eg + Ea + Ec + Ek`
//! only drifts by the integrator's truncation error.

use serde::{Deserialize, Serialize};

use super::assembly::Assembly;
use super::dynamics::TorqueField;
use super::torque::TorqueModel;
use crate::engine::state::{Trajectory, Vec2};

/// Kinetic energy formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KineticTerm {
    /// `I·ω²/2`.
    #[default]
    Rotational,
    /// `draft·ω²/2`, the term used by the reference plots.
    Simplified,
}

/// Energy components at one trajectory sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergySample {
    /// Time (s).
    pub t: f64,
    /// Gravitational potential change of the center of mass (J).
    pub eg: f64,
    /// Work done by buoyancy (J).
    pub ea: f64,
    /// Work done against the destabilizing torque (J).
    pub ec: f64,
    /// Kinetic energy (J).
    pub ek: f64,
}

impl EnergySample {
    /// `Eg + Ea + Ec + Ek`.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.eg + self.ea + self.ec + self.ek
    }
}

/// Energy bookkeeping for one assembly.
#[derive(Debug, Clone)]
pub struct EnergyAccounting {
    model: TorqueModel,
    center_of_mass: Vec2,
    total_weight: f64,
    draft: f64,
    kinetic: KineticTerm,
}

impl EnergyAccounting {
    /// Create the accounting for `assembly` with the chosen kinetic term.
    #[must_use]
    pub fn new(assembly: &Assembly, kinetic: KineticTerm) -> Self {
        Self {
            model: TorqueModel::new(assembly),
            center_of_mass: assembly.total_center_of_mass(),
            total_weight: assembly.total_weight(),
            draft: assembly.draft(),
            kinetic,
        }
    }

    fn center_height(&self, theta: f64) -> f64 {
        self.center_of_mass.rotate(theta).y
    }

    fn kinetic_energy(&self, omega: f64) -> f64 {
        let factor = match self.kinetic {
            KineticTerm::Rotational => self.model.moment_of_inertia(),
            KineticTerm::Simplified => self.draft,
        };
        factor * omega * omega / 2.0
    }

    /// Energy series aligned with the trajectory samples.
    #[must_use]
    pub fn compute(&self, trajectory: &Trajectory) -> Vec<EnergySample> {
        let samples = trajectory.samples();
        let Some(first) = samples.first() else {
            return Vec::new();
        };

        let reference_height = self.center_height(first.theta);
        let destabilizing = self.model.destabilizing_torque();
        let mut righting_work = 0.0;
        let mut prev_theta = first.theta;
        let mut prev_torque = self.model.righting_torque(first.theta);

        samples
            .iter()
            .map(|s| {
                let torque = self.model.righting_torque(s.theta);
                righting_work += 0.5 * (prev_torque + torque) * (s.theta - prev_theta);
                prev_theta = s.theta;
                prev_torque = torque;

                let eg = self.total_weight * (self.center_height(s.theta) - reference_height);
                EnergySample {
                    t: s.t,
                    eg,
                    ea: -righting_work - eg,
                    ec: -destabilizing * (s.theta - first.theta),
                    ek: self.kinetic_energy(s.omega),
                }
            })
            .collect()
    }
}

/// Peak-to-peak spread of the total energy over a series (J).
#[must_use]
pub fn total_energy_drift(series: &[EnergySample]) -> f64 {
    let (lo, hi) = series
        .iter()
        .map(EnergySample::total)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), e| (lo.min(e), hi.max(e)));
    if series.is_empty() {
        0.0
    } else {
        hi - lo
    }
}
