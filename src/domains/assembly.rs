//! Barge + crane assembly.
//!
//! The immutable physical description every component borrows. Building it
//! validates the joint angles against the crane and resolves the static
//! equilibrium: draft, centers of mass in the waterline frame, inertia.
//!
//! Waterline frame: origin on the still waterline at the hull's center, x
//! across the beam, y up. The hull bottom sits at `y = −draft`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::hydrostatics::Hydrostatics;
use super::mass::{Barge, Crane};
use crate::engine::state::Vec2;
use crate::error::{SimError, SimResult};

/// Standard gravity (m/s²).
pub const DEFAULT_GRAVITY: f64 = 9.81;

/// Floating structure: hull, crane, fixed joint angles and environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assembly {
    barge: Barge,
    crane: Crane,
    angles: Vec<f64>,
    water_density: f64,
    gravity: f64,
    hydrostatics: Hydrostatics,
    crane_com_local: Vec2,
}

impl Assembly {
    /// Validate and resolve the static quantities of an assembly.
    ///
    /// # Errors
    ///
    /// Returns `AngleCountMismatch` if the angle vector does not match the
    /// crane's hinges, a configuration error for a non-positive total mass,
    /// or a hydrostatics error if the barge sinks at rest.
    pub fn new(
        barge: Barge,
        crane: Crane,
        angles: Vec<f64>,
        water_density: f64,
        gravity: f64,
    ) -> SimResult<Self> {
        crane.check_angles(&angles)?;
        let total_mass = barge.mass + crane.mass();
        if total_mass <= 0.0 {
            return Err(SimError::config(format!(
                "total mass must be positive, got {total_mass}"
            )));
        }
        let hydrostatics = Hydrostatics::new(barge.length, barge.height, total_mass, water_density)?;
        let crane_com_local = crane.center_of_mass(&angles)?;

        let assembly = Self {
            barge,
            crane,
            angles,
            water_density,
            gravity,
            hydrostatics,
            crane_com_local,
        };
        debug!(
            draft = assembly.draft(),
            crane_com_x = assembly.crane_center_of_mass().x,
            crane_com_y = assembly.crane_center_of_mass().y,
            "resolved assembly equilibrium"
        );
        Ok(assembly)
    }

    /// Hull parameters.
    #[must_use]
    pub const fn barge(&self) -> &Barge {
        &self.barge
    }

    /// Crane description.
    #[must_use]
    pub const fn crane(&self) -> &Crane {
        &self.crane
    }

    /// Fixed joint angles (rad).
    #[must_use]
    pub fn angles(&self) -> &[f64] {
        &self.angles
    }

    /// Water density (kg/m³).
    #[must_use]
    pub const fn water_density(&self) -> f64 {
        self.water_density
    }

    /// Gravitational acceleration (m/s²).
    #[must_use]
    pub const fn gravity(&self) -> f64 {
        self.gravity
    }

    /// Hydrostatic model for this displacement.
    #[must_use]
    pub const fn hydrostatics(&self) -> &Hydrostatics {
        &self.hydrostatics
    }

    /// Submersion depth at zero heel (m).
    #[must_use]
    pub const fn draft(&self) -> f64 {
        self.hydrostatics.draft()
    }

    /// Crane mass including the counterweight (kg).
    #[must_use]
    pub fn crane_mass(&self) -> f64 {
        self.crane.mass()
    }

    /// Barge, crane and counterweight (kg).
    #[must_use]
    pub fn total_mass(&self) -> f64 {
        self.barge.mass + self.crane.mass()
    }

    /// Total weight (N).
    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.total_mass() * self.gravity
    }

    /// Crane weight including the counterweight (N).
    #[must_use]
    pub fn crane_weight(&self) -> f64 {
        self.crane_mass() * self.gravity
    }

    /// Crane center of mass in its own frame (socle corner origin).
    #[must_use]
    pub const fn crane_center_of_mass_local(&self) -> Vec2 {
        self.crane_com_local
    }

    /// Crane center of mass in the waterline frame.
    #[must_use]
    pub fn crane_center_of_mass(&self) -> Vec2 {
        self.crane_com_local + self.barge.crane_mount(self.draft())
    }

    /// Hull center of mass in the waterline frame.
    #[must_use]
    pub fn barge_center_of_mass(&self) -> Vec2 {
        self.barge.center_of_mass(self.draft())
    }

    /// Whole-structure center of mass in the waterline frame.
    #[must_use]
    pub fn total_center_of_mass(&self) -> Vec2 {
        let moment = self.crane_center_of_mass().scale(self.crane_mass())
            + self.barge_center_of_mass().scale(self.barge.mass);
        moment.scale(1.0 / self.total_mass())
    }

    /// Roll inertia of a rectangular prism, `M·(L² + H²)/12` (kg·m²).
    #[must_use]
    pub fn moment_of_inertia(&self) -> f64 {
        let l = self.barge.length;
        let h = self.barge.height;
        self.total_mass() * (l * l + h * h) / 12.0
    }

    /// Static quantities at zero heel.
    #[must_use]
    pub fn equilibrium(&self) -> EquilibriumSnapshot {
        let (immersion_angle, emergence_angle) = self.hydrostatics.immersion_emergence_angles();
        EquilibriumSnapshot {
            total_mass: self.total_mass(),
            crane_mass: self.crane_mass(),
            draft: self.draft(),
            submerged_area: self.hydrostatics.submerged_area(),
            crane_center_of_mass_local: self.crane_com_local,
            crane_center_of_mass: self.crane_center_of_mass(),
            barge_center_of_mass: self.barge_center_of_mass(),
            total_center_of_mass: self.total_center_of_mass(),
            center_of_pressure: self.hydrostatics.center_of_pressure(0.0),
            moment_of_inertia: self.moment_of_inertia(),
            immersion_angle,
            emergence_angle,
            max_stable_angle: immersion_angle.min(emergence_angle),
        }
    }
}

/// Equilibrium snapshot for a fixed joint configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquilibriumSnapshot {
    /// Barge + crane + counterweight (kg).
    pub total_mass: f64,
    /// Crane + counterweight (kg).
    pub crane_mass: f64,
    /// Zero-heel draft (m).
    pub draft: f64,
    /// Submerged cross-section area (m²).
    pub submerged_area: f64,
    /// Crane center of mass, crane frame.
    pub crane_center_of_mass_local: Vec2,
    /// Crane center of mass, waterline frame.
    pub crane_center_of_mass: Vec2,
    /// Hull center of mass, waterline frame.
    pub barge_center_of_mass: Vec2,
    /// Whole-structure center of mass, waterline frame.
    pub total_center_of_mass: Vec2,
    /// Center of buoyancy at zero heel.
    pub center_of_pressure: Vec2,
    /// Roll inertia (kg·m²).
    pub moment_of_inertia: f64,
    /// Heel at which the deck edge reaches the water (rad).
    pub immersion_angle: f64,
    /// Heel at which the bottom edge lifts out (rad).
    pub emergence_angle: f64,
    /// `min(immersion, emergence)` (rad).
    pub max_stable_angle: f64,
}
