//! Simulation state management.
//!
//! Holds the planar vector type shared by the physical model and the
//! append-only heel trajectory written by the integration loop.

use serde::{Deserialize, Serialize};

/// 2D vector in the barge's cross-section plane (x across the beam, y up).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
}

impl Vec2 {
    /// Create a new vector.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Zero vector.
    #[must_use]
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Vector of the given length at `angle` radians from the x-axis.
    #[must_use]
    pub fn from_polar(length: f64, angle: f64) -> Self {
        Self {
            x: length * angle.cos(),
            y: length * angle.sin(),
        }
    }

    /// Magnitude (length).
    #[must_use]
    pub fn magnitude(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Dot product.
    #[must_use]
    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Scale by scalar.
    #[must_use]
    pub fn scale(&self, s: f64) -> Self {
        Self {
            x: self.x * s,
            y: self.y * s,
        }
    }

    /// Rotate counter-clockwise by `theta` radians about the origin.
    #[must_use]
    pub fn rotate(&self, theta: f64) -> Self {
        let (sin, cos) = theta.sin_cos();
        Self {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }

    /// Check if all components are finite.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]  // is_finite not const
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl std::ops::Mul<f64> for Vec2 {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        self.scale(rhs)
    }
}

impl std::iter::Sum for Vec2 {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, v| acc + v)
    }
}

/// One sample of the heel dynamics: `(t, θ, ω, α)`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HeelState {
    /// Simulation time (s).
    pub t: f64,
    /// Heel angle θ (rad).
    pub theta: f64,
    /// Angular velocity ω (rad/s).
    pub omega: f64,
    /// Angular acceleration α (rad/s²).
    pub alpha: f64,
}

impl HeelState {
    /// Level barge at rest, `θ = ω = α = 0` at `t = 0`.
    #[must_use]
    pub const fn at_rest() -> Self {
        Self {
            t: 0.0,
            theta: 0.0,
            omega: 0.0,
            alpha: 0.0,
        }
    }

    /// Check if all components are finite.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn is_finite(&self) -> bool {
        self.t.is_finite() && self.theta.is_finite() && self.omega.is_finite() && self.alpha.is_finite()
    }
}

/// Append-only time series of heel states.
///
/// Samples are only ever pushed; there is no way to mutate one after it
/// has been written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    samples: Vec<HeelState>,
}

impl Trajectory {
    /// Create an empty trajectory.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            samples: Vec::new(),
        }
    }

    /// Create an empty trajectory with room for `capacity` samples.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity),
        }
    }

    /// Append a sample.
    pub fn push(&mut self, state: HeelState) {
        self.samples.push(state);
    }

    /// All samples in time order.
    #[must_use]
    pub fn samples(&self) -> &[HeelState] {
        &self.samples
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether no sample has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Most recent sample.
    #[must_use]
    pub fn last(&self) -> Option<&HeelState> {
        self.samples.last()
    }

    /// Time column.
    #[must_use]
    pub fn times(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.t).collect()
    }

    /// Heel angle column.
    #[must_use]
    pub fn angles(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.theta).collect()
    }

    /// Angular velocity column.
    #[must_use]
    pub fn angular_velocities(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.omega).collect()
    }

    /// Angular acceleration column.
    #[must_use]
    pub fn angular_accelerations(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.alpha).collect()
    }

    /// Largest `|θ|` reached.
    #[must_use]
    pub fn max_abs_angle(&self) -> f64 {
        self.samples.iter().map(|s| s.theta.abs()).fold(0.0, f64::max)
    }

    /// Heel angle at time `t` by linear interpolation.
    ///
    /// Returns `None` outside the sampled time range.
    #[must_use]
    pub fn angle_at(&self, t: f64) -> Option<f64> {
        let first = self.samples.first()?;
        let last = self.samples.last()?;
        if t < first.t || t > last.t {
            return None;
        }
        let idx = self.samples.partition_point(|s| s.t < t);
        if idx == 0 {
            return Some(first.theta);
        }
        let hi = self.samples[idx];
        let lo = self.samples[idx - 1];
        let span = hi.t - lo.t;
        if span <= 0.0 {
            return Some(hi.theta);
        }
        let w = (t - lo.t) / span;
        Some(lo.theta + w * (hi.theta - lo.theta))
    }
}
