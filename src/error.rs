//! Error types for heelsim.
//!
//! All fallible operations return `Result<T, SimError>` instead of panicking.
//! Configuration problems are fatal and abort a run before the first step;
//! Jidoka violations stop the integration loop where they are detected.

use thiserror::Error;

/// Result type alias for heelsim operations.
pub type SimResult<T> = Result<T, SimError>;

/// Unified error type for all heelsim operations.
#[derive(Debug, Error)]
pub enum SimError {
    // ===== Jidoka Violations =====
    /// Numerical instability detected (NaN or Inf).
    #[error("Jidoka: non-finite value detected at {location}")]
    NonFiniteValue {
        /// Location where the non-finite value was detected.
        location: String,
    },

    // ===== Configuration Errors =====
    /// Invalid configuration parameter.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// TOML parsing error.
    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// Joint angle vector does not match the crane's hinge count.
    #[error("Angle count mismatch: expected {expected} angle(s) for the crane's hinges, got {actual}")]
    AngleCountMismatch {
        /// Segment count minus one.
        expected: usize,
        /// Number of angles supplied.
        actual: usize,
    },

    /// Segment table keys are not the contiguous range "0".."n-1".
    #[error("Segment index error: {message}")]
    SegmentIndex {
        /// Which key is missing or malformed.
        message: String,
    },

    // ===== Domain Errors =====
    /// Hydrostatic model evaluated outside its valid range.
    #[error("Hydrostatics error: {0}")]
    Hydrostatics(String),

    /// Tracker reference file could not be parsed.
    #[error("Tracker file error at line {line}: {message}")]
    TrackerParse {
        /// 1-based line number.
        line: usize,
        /// What went wrong.
        message: String,
    },

    // ===== I/O Errors =====
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SimError {
    /// Create a configuration error with a message.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a segment index error.
    #[must_use]
    pub fn segment_index(message: impl Into<String>) -> Self {
        Self::SegmentIndex {
            message: message.into(),
        }
    }

    /// Create a tracker parse error for the given 1-based line.
    #[must_use]
    pub fn tracker(line: usize, message: impl Into<String>) -> Self {
        Self::TrackerParse {
            line,
            message: message.into(),
        }
    }

    /// Check if this error is a Jidoka violation (requires immediate stop).
    #[must_use]
    pub const fn is_jidoka_violation(&self) -> bool {
        matches!(self, Self::NonFiniteValue { .. })
    }

    /// Check if this error comes from an invalid configuration.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::Config { .. }
                | Self::TomlParse(_)
                | Self::Validation(_)
                | Self::AngleCountMismatch { .. }
                | Self::SegmentIndex { .. }
        )
    }
}
