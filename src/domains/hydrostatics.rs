//! Hydrostatics of a heeling box barge.
//!
//! # Governing Equations
//!
//! ```text
//! Draft (Archimedes, square footprint): d = M / (ρ·L²)
//! Trapezoid bases at heel θ:            b_r = d + (L/2)·tan θ
//!                                       b_l = d − (L/2)·tan θ
//! Centroid from the hull center (x) and the waterline (y):
//!   x = L·(b_r − b_l) / (6·(b_l + b_r))
//!   y = (b_l² + b_l·b_r + b_r²) / (3·(b_l + b_r)) − d
//! World frame: rotate the centroid by θ.
//! ```
//!
//! The trapezoid is only a valid submerged section while both bases stay in
//! `[0, height]`; beyond that the hull edge has left the water or the deck
//! edge is awash.

use serde::{Deserialize, Serialize};

use crate::engine::state::Vec2;
use crate::error::{SimError, SimResult};

/// Fresh water density (kg/m³).
pub const DEFAULT_WATER_DENSITY: f64 = 997.0;

/// Draft of a square-footprint box barge: `total_mass / (ρ·L²)`.
#[must_use]
pub fn draft(total_mass: f64, water_density: f64, length: f64) -> f64 {
    total_mass / (water_density * length * length)
}

/// Reference heel angles `(immersion, emergence)`.
///
/// `immersion` is the heel at which the deck edge reaches the waterline,
/// `emergence` the heel at which the bottom edge lifts out.
#[must_use]
pub fn angles_immersion_emergence(draft: f64, height: f64, length: f64) -> (f64, f64) {
    let immersion = (2.0 * (height - draft) / length).atan();
    let emergence = (2.0 * draft / length).atan();
    (immersion, emergence)
}

/// Depths of the two vertical sides of the submerged section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrapezoidBases {
    /// Submerged depth of the right side (m).
    pub right: f64,
    /// Submerged depth of the left side (m).
    pub left: f64,
}

/// Why the trapezoid model stopped being valid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DomainViolation {
    /// A side's submerged depth went negative: the hull edge left the water.
    Emergence {
        /// Offending depth (m), negative.
        depth: f64,
    },
    /// A side's submerged depth exceeded the hull height: the deck is awash.
    Immersion {
        /// Offending depth (m), above the hull height.
        depth: f64,
    },
}

impl std::fmt::Display for DomainViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Emergence { depth } => write!(f, "hull edge emerged (depth {depth:.4} m)"),
            Self::Immersion { depth } => write!(f, "deck edge submerged (depth {depth:.4} m)"),
        }
    }
}

/// Hydrostatic model of the hull for a fixed displacement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hydrostatics {
    length: f64,
    height: f64,
    draft: f64,
}

impl Hydrostatics {
    /// Build the model for a hull carrying `total_mass`.
    ///
    /// # Errors
    ///
    /// Returns a hydrostatics error if the barge sinks at rest (draft above
    /// the hull height) or if the inputs give a non-positive draft.
    pub fn new(length: f64, height: f64, total_mass: f64, water_density: f64) -> SimResult<Self> {
        let d = draft(total_mass, water_density, length);
        if !d.is_finite() || d <= 0.0 {
            return Err(SimError::Hydrostatics(format!(
                "draft must be positive and finite, got {d}"
            )));
        }
        if d > height {
            return Err(SimError::Hydrostatics(format!(
                "barge sinks at rest: draft {d:.4} m exceeds hull height {height} m"
            )));
        }
        Ok(Self {
            length,
            height,
            draft: d,
        })
    }

    /// Submersion depth at zero heel (m).
    #[must_use]
    pub const fn draft(&self) -> f64 {
        self.draft
    }

    /// Hull length (m).
    #[must_use]
    pub const fn length(&self) -> f64 {
        self.length
    }

    /// Hull height (m).
    #[must_use]
    pub const fn height(&self) -> f64 {
        self.height
    }

    /// Submerged cross-section area (m²); conserved while heeling.
    #[must_use]
    pub fn submerged_area(&self) -> f64 {
        self.length * self.draft
    }

    /// Side depths of the submerged trapezoid at heel `theta`.
    #[must_use]
    pub fn submerged_trapezoid_bases(&self, theta: f64) -> TrapezoidBases {
        let rise = self.length / 2.0 * theta.tan();
        TrapezoidBases {
            right: self.draft + rise,
            left: self.draft - rise,
        }
    }

    /// Validate the trapezoid at heel `theta`.
    ///
    /// # Errors
    ///
    /// Returns the `DomainViolation` when either base leaves `[0, height]`.
    pub fn check_domain(&self, theta: f64) -> Result<TrapezoidBases, DomainViolation> {
        let bases = self.submerged_trapezoid_bases(theta);
        for depth in [bases.right, bases.left] {
            if depth < 0.0 {
                return Err(DomainViolation::Emergence { depth });
            }
            if depth > self.height {
                return Err(DomainViolation::Immersion { depth });
            }
        }
        Ok(bases)
    }

    /// Centroid of the submerged trapezoid in the hull frame, before
    /// rotation: x from the hull center, y from the waterline.
    #[must_use]
    pub fn centroid_local(&self, theta: f64) -> Vec2 {
        let TrapezoidBases { right, left } = self.submerged_trapezoid_bases(theta);
        let sum = left + right;
        let x = self.length * (right - left) / (6.0 * sum);
        let y = (left * left + left * right + right * right) / (3.0 * sum) - self.draft;
        Vec2::new(x, y)
    }

    /// Center of buoyancy in the world frame at heel `theta`.
    #[must_use]
    pub fn center_of_pressure(&self, theta: f64) -> Vec2 {
        self.centroid_local(theta).rotate(theta)
    }

    /// `(immersion, emergence)` reference angles for this hull.
    #[must_use]
    pub fn immersion_emergence_angles(&self) -> (f64, f64) {
        angles_immersion_emergence(self.draft, self.height, self.length)
    }

    /// Smaller of the immersion and emergence angles; a plot reference, not
    /// a limit applied during integration.
    #[must_use]
    pub fn max_stable_angle(&self) -> f64 {
        let (immersion, emergence) = self.immersion_emergence_angles();
        immersion.min(emergence)
    }
}
