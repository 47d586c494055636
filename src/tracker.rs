//! Reference heel series from motion-tracking data.
//!
//! A tracker export is a whitespace-delimited table with one row per frame:
//!
//! ```text
//! t  x1  y1  x2  y2  x3  y3
//! ```
//!
//! Three markers are tracked; the angle at the middle marker between
//! `p1 − p2` and `p3 − p2` is the measured angle for that frame. Exports
//! written with a French locale use a decimal comma, which is accepted.
//! Header lines (anything whose first field is not a number) are skipped.

use std::path::Path;

use serde::Serialize;

use crate::engine::state::{Trajectory, Vec2};
use crate::error::{SimError, SimResult};

const COLUMNS: usize = 7;

/// One tracked frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrackedFrame {
    /// Time (s).
    pub t: f64,
    /// First marker.
    pub p1: Vec2,
    /// Middle marker (vertex of the measured angle).
    pub p2: Vec2,
    /// Third marker.
    pub p3: Vec2,
}

impl TrackedFrame {
    /// Angle between `p1 − p2` and `p3 − p2` in `[0, π]` (rad).
    ///
    /// Returns `None` when two markers coincide.
    #[must_use]
    pub fn angle(&self) -> Option<f64> {
        let a = self.p1 - self.p2;
        let b = self.p3 - self.p2;
        let norm = a.magnitude() * b.magnitude();
        if norm <= f64::EPSILON {
            return None;
        }
        Some((a.dot(&b) / norm).clamp(-1.0, 1.0).acos())
    }
}

/// Measured angle series, used as an overlay for simulated runs.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReferenceTrajectory {
    times: Vec<f64>,
    angles: Vec<f64>,
}

impl ReferenceTrajectory {
    /// Read a tracker export from disk.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> SimResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Parse a tracker export.
    ///
    /// # Errors
    ///
    /// Returns `TrackerParse` with the 1-based line number if a numeric row
    /// does not have seven numeric columns, if two markers coincide, or if
    /// no row is found at all.
    pub fn parse(text: &str) -> SimResult<Self> {
        let mut reference = Self::default();

        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            let fields: Vec<&str> = raw.split_whitespace().collect();
            let Some(first) = fields.first() else {
                continue;
            };
            if parse_number(first).is_none() {
                continue;
            }

            let frame = parse_frame(&fields).map_err(|message| SimError::tracker(line, message))?;
            let angle = frame
                .angle()
                .ok_or_else(|| SimError::tracker(line, "two markers coincide"))?;
            reference.times.push(frame.t);
            reference.angles.push(angle);
        }

        if reference.times.is_empty() {
            return Err(SimError::tracker(0, "no data rows found"));
        }
        Ok(reference)
    }

    /// Frame times (s).
    #[must_use]
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Absolute marker angles (rad).
    #[must_use]
    pub fn angles(&self) -> &[f64] {
        &self.angles
    }

    /// Number of frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Whether there is no frame.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Angles relative to the first frame, i.e. the measured heel (rad).
    #[must_use]
    pub fn heel_series(&self) -> Vec<f64> {
        let base = self.angles.first().copied().unwrap_or(0.0);
        self.angles.iter().map(|a| a - base).collect()
    }

    /// Root-mean-square difference between the measured heel and a
    /// simulated trajectory, over the times both cover.
    ///
    /// Returns `None` when the time ranges do not overlap.
    #[must_use]
    pub fn rms_deviation(&self, trajectory: &Trajectory) -> Option<f64> {
        let heel = self.heel_series();
        let (sum, count) = self
            .times
            .iter()
            .zip(&heel)
            .filter_map(|(&t, &measured)| {
                trajectory
                    .angle_at(t)
                    .map(|simulated| (simulated - measured).powi(2))
            })
            .fold((0.0, 0_usize), |(sum, n), sq| (sum + sq, n + 1));

        #[allow(clippy::cast_precision_loss)]
        (count > 0).then(|| (sum / count as f64).sqrt())
    }
}

fn parse_number(field: &str) -> Option<f64> {
    field.replace(',', ".").parse().ok()
}

fn parse_frame(fields: &[&str]) -> Result<TrackedFrame, String> {
    if fields.len() != COLUMNS {
        return Err(format!(
            "expected {COLUMNS} columns (t x1 y1 x2 y2 x3 y3), found {}",
            fields.len()
        ));
    }

    let mut values = [0.0; COLUMNS];
    for (slot, field) in values.iter_mut().zip(fields) {
        *slot = parse_number(field).ok_or_else(|| format!("\"{field}\" is not a number"))?;
    }

    Ok(TrackedFrame {
        t: values[0],
        p1: Vec2::new(values[1], values[2]),
        p2: Vec2::new(values[3], values[4]),
        p3: Vec2::new(values[5], values[6]),
    })
}
