//! Moment / torque model.
//!
//! # Governing Equations
//!
//! ```text
//! τ_r = W · |B_x(θ) − sin θ · G_y|      righting (buoyancy vs. gravity)
//! τ_d = −W_c · C_x                      destabilizing (crane weight)
//! τ_c = −c · ω                          linear damping
//! τ   = τ_r + τ_d + τ_c
//! I   = M · (L² + H²) / 12
//! ```
//!
//! `B` is the center of pressure, `G` the whole-structure center of mass and
//! `C` the crane's center of mass, all in the waterline frame. `τ_d` has a
//! fixed sign for a given configuration.

use serde::{Deserialize, Serialize};

use super::assembly::Assembly;
use super::dynamics::TorqueField;
use super::hydrostatics::Hydrostatics;

/// Torque components at one `(θ, ω)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TorqueBreakdown {
    /// Righting torque (N·m).
    pub righting: f64,
    /// Destabilizing torque (N·m).
    pub destabilizing: f64,
    /// Damping torque (N·m).
    pub damping: f64,
}

impl TorqueBreakdown {
    /// Sum of the three components (N·m).
    #[must_use]
    pub fn net(&self) -> f64 {
        self.righting + self.destabilizing + self.damping
    }
}

/// Torque model resolved from an [`Assembly`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TorqueModel {
    hydrostatics: Hydrostatics,
    total_weight: f64,
    crane_weight: f64,
    crane_com_x: f64,
    total_com_y: f64,
    damping: f64,
    inertia: f64,
}

impl TorqueModel {
    /// Resolve the torque model for an assembly.
    #[must_use]
    pub fn new(assembly: &Assembly) -> Self {
        Self {
            hydrostatics: *assembly.hydrostatics(),
            total_weight: assembly.total_weight(),
            crane_weight: assembly.crane_weight(),
            crane_com_x: assembly.crane_center_of_mass().x,
            total_com_y: assembly.total_center_of_mass().y,
            damping: assembly.barge().damping,
            inertia: assembly.moment_of_inertia(),
        }
    }

    /// Hydrostatic model used for the center of pressure.
    #[must_use]
    pub const fn hydrostatics(&self) -> &Hydrostatics {
        &self.hydrostatics
    }

    /// Righting torque at heel `theta` (N·m, never negative).
    #[must_use]
    pub fn righting_torque(&self, theta: f64) -> f64 {
        let cop = self.hydrostatics.center_of_pressure(theta);
        self.total_weight * (cop.x - theta.sin() * self.total_com_y).abs()
    }

    /// Destabilizing torque of the crane's weight (N·m).
    #[must_use]
    pub fn destabilizing_torque(&self) -> f64 {
        -self.crane_weight * self.crane_com_x
    }

    /// Viscous damping torque at angular velocity `omega` (N·m).
    #[must_use]
    pub fn damping_torque(&self, omega: f64) -> f64 {
        -self.damping * omega
    }

    /// All torque components at `(theta, omega)`.
    #[must_use]
    pub fn breakdown(&self, theta: f64, omega: f64) -> TorqueBreakdown {
        TorqueBreakdown {
            righting: self.righting_torque(theta),
            destabilizing: self.destabilizing_torque(),
            damping: self.damping_torque(omega),
        }
    }

    /// Righting stiffness near zero heel, `(τ_r(h) + τ_r(−h)) / 2h` (N·m/rad).
    #[must_use]
    pub fn righting_stiffness(&self) -> f64 {
        const H: f64 = 1e-6;
        (self.righting_torque(H) + self.righting_torque(-H)) / (2.0 * H)
    }

    /// Small-oscillation natural frequency `sqrt(k / I)` (rad/s).
    #[must_use]
    pub fn natural_frequency(&self) -> f64 {
        (self.righting_stiffness() / self.inertia).sqrt()
    }
}

impl TorqueField for TorqueModel {
    fn net_torque(&self, theta: f64, omega: f64) -> f64 {
        self.breakdown(theta, omega).net()
    }

    fn moment_of_inertia(&self) -> f64 {
        self.inertia
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domains::mass::{Barge, Crane, Segment};
    use proptest::prelude::*;

    proptest! {
        /// The righting torque never pushes the heel further.
        #[test]
        fn prop_righting_torque_non_negative(
            theta in -0.1f64..0.1,
            crane_offset in 0.0f64..7.0,
        ) {
            let barge = Barge { length: 7.0, height: 3.0, mass: 20_000.0, crane_offset, damping: 0.0 };
            let crane = Crane::new(vec![Segment::socle(1.0, 0.6, 1000.0)], None);
            prop_assert!(crane.is_ok());
            if let Ok(crane) = crane {
                let assembly = Assembly::new(barge, crane, vec![], 997.0, 9.81);
                prop_assert!(assembly.is_ok());
                if let Ok(assembly) = assembly {
                    let model = TorqueModel::new(&assembly);
                    prop_assert!(model.righting_torque(theta) >= 0.0);
                }
            }
        }
    }
}
