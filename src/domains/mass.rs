//! Geometry and mass model.
//!
//! Centers of mass for the crane's kinematic chain and for the barge.
//!
//! # Crane local frame
//!
//! ```text
//! origin   : bottom-left corner of the socle (segment 0)
//! socle    : endpoint (w/2, L₀), center (w/2, L₀/2)
//! hinge i  : endpoint offset (Lᵢ·cos θᵢ, Lᵢ·sin θᵢ) from its own origin
//! center i : socle endpoint + Σ_{j<i} offsetⱼ + offsetᵢ/2
//! counterweight : (−L_c·cos θ₁/2, L₀ − L_c·sin θ₁/2)
//! ```
//!
//! Angles are absolute (measured from the horizontal), in radians, and are
//! never normalized.

use serde::{Deserialize, Serialize};

use crate::engine::state::Vec2;
use crate::error::{SimError, SimResult};

/// One link of the crane. Index 0 is the fixed socle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Length (m).
    pub length: f64,
    /// Width (m); only meaningful for the socle.
    pub width: f64,
    /// Mass (kg).
    pub mass: f64,
}

impl Segment {
    /// Create a hinged segment (zero width).
    #[must_use]
    pub const fn link(length: f64, mass: f64) -> Self {
        Self {
            length,
            width: 0.0,
            mass,
        }
    }

    /// Create the socle.
    #[must_use]
    pub const fn socle(length: f64, width: f64, mass: f64) -> Self {
        Self {
            length,
            width,
            mass,
        }
    }
}

/// Counterweight rigidly attached at the first joint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Counterweight {
    /// Arm length (m).
    pub length: f64,
    /// Mass (kg).
    pub mass: f64,
}

/// Articulated crane: socle, hinged links and optional counterweight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crane {
    segments: Vec<Segment>,
    counterweight: Option<Counterweight>,
}

impl Crane {
    /// Create a crane from its ordered segments.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if there is no segment or if the total
    /// crane mass is not positive.
    pub fn new(segments: Vec<Segment>, counterweight: Option<Counterweight>) -> SimResult<Self> {
        if segments.is_empty() {
            return Err(SimError::config("crane needs at least one segment (the socle)"));
        }
        let crane = Self {
            segments,
            counterweight,
        };
        if crane.mass() <= 0.0 {
            return Err(SimError::config(format!(
                "crane mass must be positive, got {}",
                crane.mass()
            )));
        }
        Ok(crane)
    }

    /// Ordered segments, socle first.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Counterweight, if any.
    #[must_use]
    pub const fn counterweight(&self) -> Option<&Counterweight> {
        self.counterweight.as_ref()
    }

    /// Number of hinged segments, i.e. the expected joint angle count.
    #[must_use]
    pub fn hinge_count(&self) -> usize {
        self.segments.len() - 1
    }

    /// Segments plus counterweight (kg).
    #[must_use]
    pub fn mass(&self) -> f64 {
        self.segments.iter().map(|s| s.mass).sum::<f64>()
            + self.counterweight.map_or(0.0, |c| c.mass)
    }

    /// Fail unless exactly one angle per hinge is supplied.
    ///
    /// # Errors
    ///
    /// Returns `AngleCountMismatch` with the expected count.
    pub fn check_angles(&self, angles: &[f64]) -> SimResult<()> {
        if angles.len() == self.hinge_count() {
            Ok(())
        } else {
            Err(SimError::AngleCountMismatch {
                expected: self.hinge_count(),
                actual: angles.len(),
            })
        }
    }

    /// Endpoint offset of every segment in its own local frame.
    ///
    /// # Errors
    ///
    /// Returns `AngleCountMismatch` if `angles.len() != hinge_count()`.
    pub fn endpoint_offsets(&self, angles: &[f64]) -> SimResult<Vec<Vec2>> {
        self.check_angles(angles)?;
        let socle = self.segments[0];
        let mut offsets = Vec::with_capacity(self.segments.len());
        offsets.push(Vec2::new(socle.width / 2.0, socle.length));
        offsets.extend(
            self.segments[1..]
                .iter()
                .zip(angles)
                .map(|(seg, &angle)| Vec2::from_polar(seg.length, angle)),
        );
        Ok(offsets)
    }

    /// Center of mass of every segment in the crane frame.
    ///
    /// # Errors
    ///
    /// Returns `AngleCountMismatch` if `angles.len() != hinge_count()`.
    pub fn segment_centers(&self, angles: &[f64]) -> SimResult<Vec<Vec2>> {
        let offsets = self.endpoint_offsets(angles)?;
        let socle = self.segments[0];
        let mut centers = Vec::with_capacity(offsets.len());
        centers.push(Vec2::new(socle.width / 2.0, socle.length / 2.0));

        let mut joint = offsets[0];
        for offset in &offsets[1..] {
            centers.push(joint + offset.scale(0.5));
            joint = joint + *offset;
        }
        Ok(centers)
    }

    /// Counterweight center of mass in the crane frame; pivots with the
    /// first joint angle only.
    #[must_use]
    pub fn counterweight_center(&self, angles: &[f64]) -> Option<Vec2> {
        let cw = self.counterweight?;
        let theta = angles.first().copied().unwrap_or(0.0);
        let socle_length = self.segments[0].length;
        Some(Vec2::new(
            -cw.length * theta.cos() / 2.0,
            socle_length - cw.length * theta.sin() / 2.0,
        ))
    }

    /// Mass-weighted center of mass of segments and counterweight, in the
    /// crane frame.
    ///
    /// # Errors
    ///
    /// Returns `AngleCountMismatch` if `angles.len() != hinge_count()`.
    pub fn center_of_mass(&self, angles: &[f64]) -> SimResult<Vec2> {
        let centers = self.segment_centers(angles)?;
        let mut moment: Vec2 = self
            .segments
            .iter()
            .zip(&centers)
            .map(|(seg, c)| c.scale(seg.mass))
            .sum();
        if let (Some(cw), Some(c)) = (self.counterweight, self.counterweight_center(angles)) {
            moment = moment + c.scale(cw.mass);
        }
        Ok(moment.scale(1.0 / self.mass()))
    }
}

/// Barge hull and mounting parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Barge {
    /// Length of the hull cross-section (m); also used as its width.
    pub length: f64,
    /// Hull height (m).
    pub height: f64,
    /// Hull mass (kg).
    pub mass: f64,
    /// Crane base position along the deck, from the hull's left edge (m).
    pub crane_offset: f64,
    /// Linear damping coefficient (N·m·s/rad).
    pub damping: f64,
}

impl Barge {
    /// Hull center of mass in the waterline frame for the given draft.
    #[must_use]
    pub fn center_of_mass(&self, draft: f64) -> Vec2 {
        barge_center_of_mass(self, draft)
    }

    /// Vector that moves a crane-frame point into the waterline frame.
    #[must_use]
    pub fn crane_mount(&self, draft: f64) -> Vec2 {
        Vec2::new(
            self.crane_offset - self.length / 2.0,
            self.height - draft,
        )
    }
}

/// Crane center of mass in the crane frame for the given joint angles.
///
/// # Errors
///
/// Returns `AngleCountMismatch` if `angles.len() != segments.len() - 1`, or a
/// configuration error for an empty or massless crane.
pub fn crane_center_of_mass(
    segments: &[Segment],
    counterweight: Option<Counterweight>,
    angles: &[f64],
) -> SimResult<Vec2> {
    Crane::new(segments.to_vec(), counterweight)?.center_of_mass(angles)
}

/// Barge center of mass, `(0, height/2 − draft)` in the waterline frame.
#[must_use]
pub fn barge_center_of_mass(barge: &Barge, draft: f64) -> Vec2 {
    Vec2::new(0.0, barge.height / 2.0 - draft)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_6};

    fn close(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < 1e-12 && (a.y - b.y).abs() < 1e-12
    }

    #[test]
    fn test_single_segment_reduces_to_midpoint() {
        let com = crane_center_of_mass(&[Segment::socle(2.0, 1.0, 500.0)], None, &[]).unwrap();
        assert!(close(com, Vec2::new(0.5, 1.0)), "com={com:?}");
    }

    #[test]
    fn test_empty_crane_rejected() {
        let err = Crane::new(vec![], None).unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_massless_crane_rejected() {
        let err = Crane::new(vec![Segment::socle(1.0, 1.0, 0.0)], None).unwrap_err();
        assert!(err.to_string().contains("mass must be positive"));
    }

    #[test]
    fn test_angle_count_mismatch_is_fatal() {
        let crane = Crane::new(
            vec![
                Segment::socle(1.0, 0.6, 100.0),
                Segment::link(2.0, 50.0),
                Segment::link(2.0, 50.0),
            ],
            None,
        )
        .unwrap();
        match crane.center_of_mass(&[0.3]) {
            Err(SimError::AngleCountMismatch { expected, actual }) => {
                assert_eq!(expected, 2);
                assert_eq!(actual, 1);
            }
            other => panic!("expected angle count mismatch, got {other:?}"),
        }
        assert!(crane.center_of_mass(&[0.1, 0.2, 0.3]).is_err());
    }

    #[test]
    fn test_segment_centers_walk_the_chain() {
        let crane = Crane::new(
            vec![
                Segment::socle(1.0, 0.6, 100.0),
                Segment::link(2.0, 50.0),
                Segment::link(2.0, 50.0),
            ],
            None,
        )
        .unwrap();
        let centers = crane.segment_centers(&[0.0, FRAC_PI_2]).unwrap();

        assert_eq!(centers.len(), 3);
        assert!(close(centers[0], Vec2::new(0.3, 0.5)));
        // First link lies flat from the socle top.
        assert!(close(centers[1], Vec2::new(1.3, 1.0)));
        // Second link rises vertically from the tip of the first.
        assert!(close(centers[2], Vec2::new(2.3, 2.0)));
    }

    #[test]
    fn test_center_of_mass_weighted_average() {
        let crane = Crane::new(
            vec![Segment::socle(1.0, 0.0, 100.0), Segment::link(2.0, 100.0)],
            None,
        )
        .unwrap();
        let com = crane.center_of_mass(&[0.0]).unwrap();
        // Socle center (0, 0.5), link center (1, 1).
        assert!(close(com, Vec2::new(0.5, 0.75)), "com={com:?}");
    }

    #[test]
    fn test_counterweight_pivots_with_first_angle() {
        let crane = Crane::new(
            vec![Segment::socle(1.0, 0.0, 100.0), Segment::link(2.0, 100.0)],
            Some(Counterweight {
                length: 2.0,
                mass: 200.0,
            }),
        )
        .unwrap();

        let level = crane.counterweight_center(&[0.0]).unwrap();
        assert!(close(level, Vec2::new(-1.0, 1.0)));

        let raised = crane.counterweight_center(&[FRAC_PI_6]).unwrap();
        assert!((raised.x + FRAC_PI_6.cos()).abs() < 1e-12);
        assert!((raised.y - 0.5).abs() < 1e-12);

        // Counterweight balances the flat link about x = 0.
        let com = crane.center_of_mass(&[0.0]).unwrap();
        assert!((com.x - (100.0 * 1.0 - 200.0 * 1.0) / 400.0).abs() < 1e-12);
        assert!((crane.mass() - 400.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_angles_are_not_normalized() {
        let crane = Crane::new(
            vec![Segment::socle(1.0, 0.0, 100.0), Segment::link(2.0, 100.0)],
            None,
        )
        .unwrap();
        let a = crane.center_of_mass(&[0.4]).unwrap();
        let b = crane.center_of_mass(&[0.4 + 2.0 * std::f64::consts::PI]).unwrap();
        assert!((a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9);
    }

    #[test]
    fn test_barge_center_of_mass() {
        let barge = Barge {
            length: 7.0,
            height: 3.0,
            mass: 20_000.0,
            crane_offset: 2.0,
            damping: 0.0,
        };
        let com = barge_center_of_mass(&barge, 0.5);
        assert!(close(com, Vec2::new(0.0, 1.0)));
        assert!(close(barge.crane_mount(0.5), Vec2::new(-1.5, 2.5)));
    }
}
