//! Configuration system with TOML schema and validation.
//!
//! Implements Poka-Yoke (mistake-proofing) through:
//! - Type-safe configuration structs
//! - Range validation via `validator`
//! - Semantic validation (segment indices, angle count, step size)
//!
//! # File format
//!
//! ```toml
//! angles = [0.5236, 0.0, -0.5236, 0.0]
//!
//! [barge]
//! length = 7.0
//! height = 3.0
//! mass = 20000.0
//! crane_offset = 2.0
//! damping = 200000.0
//!
//! [crane.0]
//! length = 1.0
//! width = 0.6
//! mass = 1000.0
//!
//! [crane.1]
//! length = 3.0
//! mass = 600.0
//!
//! [counterweight]
//! length = 1.5
//! mass = 800.0
//!
//! [simulation]
//! dt = 0.001
//! horizon = 9.0
//! ```
//!
//! The French section and key names of older data files (`Barge`, `Grue`,
//! `Contrepoids`, `Angles`, `longueur`, `largeur`, `masse`, `Declage_grue`)
//! are accepted as aliases.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domains::assembly::{Assembly, DEFAULT_GRAVITY};
use crate::domains::dynamics::IntegratorKind;
use crate::domains::energy::KineticTerm;
use crate::domains::hydrostatics::DEFAULT_WATER_DENSITY;
use crate::domains::mass::{Barge, Counterweight, Crane, Segment};
use crate::engine::jidoka::JidokaConfig;
use crate::error::{SimError, SimResult};

/// Top-level stability configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct StabilityConfig {
    /// Joint angles (rad), one per hinged segment.
    #[serde(default, alias = "Angles")]
    pub angles: Vec<f64>,

    /// Hull description.
    #[validate(nested)]
    #[serde(alias = "Barge")]
    pub barge: BargeConfig,

    /// Crane segments keyed by their index, "0" being the socle.
    #[serde(alias = "Grue")]
    pub crane: BTreeMap<String, SegmentConfig>,

    /// Optional counterweight at the first joint.
    #[serde(default, alias = "Contrepoids")]
    pub counterweight: Option<CounterweightConfig>,

    /// Integration parameters and environment.
    #[validate(nested)]
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// Jidoka (stop-on-error) configuration.
    #[serde(default)]
    pub jidoka: JidokaConfig,
}

impl StabilityConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> SimResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if parsing or validation fails.
    pub fn from_toml(text: &str) -> SimResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Create a builder for configuration.
    #[must_use]
    pub fn builder() -> StabilityConfigBuilder {
        StabilityConfigBuilder::default()
    }

    /// Barge with a five-part crane and counterweight, angles `[π/6, 0, −π/6, 0]`.
    #[must_use]
    pub fn reference() -> Self {
        use std::f64::consts::FRAC_PI_6;
        Self::builder()
            .barge(BargeConfig {
                length: 7.0,
                height: 3.0,
                mass: 20_000.0,
                crane_offset: 2.0,
                damping: 200_000.0,
            })
            .socle(1.0, 0.6, 1000.0)
            .segment(3.0, 600.0)
            .segment(2.5, 400.0)
            .segment(2.0, 300.0)
            .segment(1.0, 100.0)
            .counterweight(1.5, 800.0)
            .angles(vec![FRAC_PI_6, 0.0, -FRAC_PI_6, 0.0])
            .build()
    }

    /// Run schema and semantic validation.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate_all(&self) -> SimResult<()> {
        self.validate()?;
        if let Some(cw) = &self.counterweight {
            cw.validate()?;
        }
        for segment in self.crane.values() {
            segment.validate()?;
        }
        self.validate_semantic()
    }

    /// Validate semantic constraints beyond schema.
    fn validate_semantic(&self) -> SimResult<()> {
        let segments = self.segments()?;

        let expected = segments.len() - 1;
        if self.angles.len() != expected {
            return Err(SimError::AngleCountMismatch {
                expected,
                actual: self.angles.len(),
            });
        }

        let sim = &self.simulation;
        sim.checked_step_count()?;
        if sim.dt > sim.horizon {
            return Err(SimError::config(format!(
                "simulation.dt ({}) exceeds simulation.horizon ({})",
                sim.dt, sim.horizon
            )));
        }

        let total_mass = self.barge.mass
            + segments.iter().map(|s| s.mass).sum::<f64>()
            + self.counterweight.map_or(0.0, |c| c.mass);
        if total_mass <= 0.0 {
            return Err(SimError::config("total mass must be positive"));
        }

        Ok(())
    }

    /// Segments ordered by index.
    ///
    /// # Errors
    ///
    /// Returns `SegmentIndex` if a key is not an integer or the keys are not
    /// exactly `0..n`.
    pub fn segments(&self) -> SimResult<Vec<Segment>> {
        if self.crane.is_empty() {
            return Err(SimError::segment_index(
                "crane has no segment; expected at least [crane.0]",
            ));
        }

        let mut indexed = Vec::with_capacity(self.crane.len());
        for (key, segment) in &self.crane {
            let index: usize = key.trim().parse().map_err(|_| {
                SimError::segment_index(format!("crane key \"{key}\" is not a segment index"))
            })?;
            indexed.push((index, *segment));
        }
        indexed.sort_by_key(|(index, _)| *index);

        for (expected, (index, _)) in indexed.iter().enumerate() {
            if *index != expected {
                return Err(SimError::segment_index(format!(
                    "missing segment \"{expected}\" (segments must be numbered 0..{})",
                    indexed.len()
                )));
            }
        }

        Ok(indexed
            .into_iter()
            .map(|(_, s)| Segment {
                length: s.length,
                width: s.width,
                mass: s.mass,
            })
            .collect())
    }

    /// Build the immutable physical assembly.
    ///
    /// # Errors
    ///
    /// Returns error if the segments, angles or masses are inconsistent, or
    /// if the barge sinks at rest.
    pub fn assembly(&self) -> SimResult<Assembly> {
        let crane = Crane::new(
            self.segments()?,
            self.counterweight.map(|c| Counterweight {
                length: c.length,
                mass: c.mass,
            }),
        )?;
        Assembly::new(
            self.barge.to_barge(),
            crane,
            self.angles.clone(),
            self.simulation.water_density,
            self.simulation.gravity,
        )
    }

    /// Render as TOML.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if serialization fails.
    pub fn to_toml(&self) -> SimResult<String> {
        toml::to_string(self).map_err(|e| SimError::config(e.to_string()))
    }
}

/// Configuration builder for programmatic construction.
#[derive(Debug, Default)]
pub struct StabilityConfigBuilder {
    barge: Option<BargeConfig>,
    segments: Vec<SegmentConfig>,
    counterweight: Option<CounterweightConfig>,
    angles: Vec<f64>,
    simulation: SimulationConfig,
    jidoka: Option<JidokaConfig>,
}

impl StabilityConfigBuilder {
    /// Set the hull.
    #[must_use]
    pub fn barge(mut self, barge: BargeConfig) -> Self {
        self.barge = Some(barge);
        self
    }

    /// Add the socle (must be the first segment).
    #[must_use]
    pub fn socle(mut self, length: f64, width: f64, mass: f64) -> Self {
        self.segments.push(SegmentConfig {
            length,
            width,
            mass,
        });
        self
    }

    /// Add a hinged segment.
    #[must_use]
    pub fn segment(mut self, length: f64, mass: f64) -> Self {
        self.segments.push(SegmentConfig {
            length,
            width: 0.0,
            mass,
        });
        self
    }

    /// Set the counterweight.
    #[must_use]
    pub fn counterweight(mut self, length: f64, mass: f64) -> Self {
        self.counterweight = Some(CounterweightConfig { length, mass });
        self
    }

    /// Set the joint angles (rad).
    #[must_use]
    pub fn angles(mut self, angles: Vec<f64>) -> Self {
        self.angles = angles;
        self
    }

    /// Set the timestep in seconds.
    #[must_use]
    pub fn dt(mut self, dt: f64) -> Self {
        self.simulation.dt = dt;
        self
    }

    /// Set the simulated duration in seconds.
    #[must_use]
    pub fn horizon(mut self, horizon: f64) -> Self {
        self.simulation.horizon = horizon;
        self
    }

    /// Select the integrator.
    #[must_use]
    pub fn integrator(mut self, integrator: IntegratorKind) -> Self {
        self.simulation.integrator = integrator;
        self
    }

    /// Set Jidoka configuration.
    #[must_use]
    pub fn jidoka(mut self, config: JidokaConfig) -> Self {
        self.jidoka = Some(config);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> StabilityConfig {
        StabilityConfig {
            angles: self.angles,
            barge: self.barge.unwrap_or_default(),
            crane: self
                .segments
                .into_iter()
                .enumerate()
                .map(|(i, s)| (i.to_string(), s))
                .collect(),
            counterweight: self.counterweight,
            simulation: self.simulation,
            jidoka: self.jidoka.unwrap_or_default(),
        }
    }
}

/// Hull section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct BargeConfig {
    /// Hull length, also used as its width (m).
    #[validate(range(exclusive_min = 0.0))]
    #[serde(alias = "longueur")]
    pub length: f64,
    /// Hull height (m).
    #[validate(range(exclusive_min = 0.0))]
    #[serde(alias = "hauteur")]
    pub height: f64,
    /// Hull mass (kg).
    #[validate(range(min = 0.0))]
    #[serde(alias = "masse")]
    pub mass: f64,
    /// Crane base position from the hull's left edge (m).
    #[serde(default, alias = "Declage_grue", alias = "declage_grue")]
    pub crane_offset: f64,
    /// Linear damping coefficient (N·m·s/rad).
    #[validate(range(min = 0.0))]
    #[serde(default, alias = "amortissement")]
    pub damping: f64,
}

impl Default for BargeConfig {
    fn default() -> Self {
        Self {
            length: 7.0,
            height: 3.0,
            mass: 20_000.0,
            crane_offset: 3.5,
            damping: 0.0,
        }
    }
}

impl BargeConfig {
    /// Convert into the model type.
    #[must_use]
    pub const fn to_barge(&self) -> Barge {
        Barge {
            length: self.length,
            height: self.height,
            mass: self.mass,
            crane_offset: self.crane_offset,
            damping: self.damping,
        }
    }
}

/// One `[crane.<i>]` table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct SegmentConfig {
    /// Segment length (m).
    #[validate(range(exclusive_min = 0.0))]
    #[serde(alias = "longueur")]
    pub length: f64,
    /// Segment width (m); used for the socle only.
    #[validate(range(min = 0.0))]
    #[serde(default, alias = "largeur")]
    pub width: f64,
    /// Segment mass (kg).
    #[validate(range(min = 0.0))]
    #[serde(alias = "masse")]
    pub mass: f64,
}

/// `[counterweight]` table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CounterweightConfig {
    /// Arm length (m).
    #[validate(range(min = 0.0))]
    #[serde(alias = "longueur")]
    pub length: f64,
    /// Mass (kg).
    #[validate(range(min = 0.0))]
    #[serde(alias = "masse")]
    pub mass: f64,
}

/// `[simulation]` table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Timestep (s).
    #[validate(range(exclusive_min = 0.0))]
    pub dt: f64,
    /// Simulated duration (s).
    #[validate(range(exclusive_min = 0.0))]
    pub horizon: f64,
    /// Integration scheme.
    pub integrator: IntegratorKind,
    /// Water density (kg/m³).
    #[validate(range(exclusive_min = 0.0))]
    pub water_density: f64,
    /// Gravitational acceleration (m/s²).
    #[validate(range(exclusive_min = 0.0))]
    pub gravity: f64,
    /// Peak-to-peak heel below which the tail of a run counts as settled (rad).
    #[validate(range(exclusive_min = 0.0))]
    pub settle_tolerance: f64,
    /// Kinetic term used by the energy accounting.
    pub kinetic_term: KineticTerm,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            dt: 1e-3,
            horizon: 9.0,
            integrator: IntegratorKind::Euler,
            water_density: DEFAULT_WATER_DENSITY,
            gravity: DEFAULT_GRAVITY,
            settle_tolerance: 1e-3,
            kinetic_term: KineticTerm::Rotational,
        }
    }
}

impl SimulationConfig {
    /// Upper bound on `round(horizon / dt)`.
    pub const MAX_STEPS: usize = 100_000_000;

    /// Number of steps, `round(horizon / dt)`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `dt` or `horizon` is not finite and
    /// positive, or if the run would exceed [`Self::MAX_STEPS`] steps.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn checked_step_count(&self) -> SimResult<usize> {
        for (name, value) in [("dt", self.dt), ("horizon", self.horizon)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(SimError::config(format!(
                    "simulation.{name} must be finite and positive, got {value}"
                )));
            }
        }
        let steps = (self.horizon / self.dt).round();
        if !steps.is_finite() || steps > Self::MAX_STEPS as f64 {
            return Err(SimError::config(format!(
                "simulation.horizon / simulation.dt gives {steps} steps, limit is {}",
                Self::MAX_STEPS
            )));
        }
        Ok(steps as usize)
    }
}
