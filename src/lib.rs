//! # heelsim
//!
//! Heel stability of a floating barge carrying an articulated crane.
//!
//! The crane's joint angles are fixed for a run; only the barge heels.
//! Given the hull, the crane segments and an optional counterweight, the
//! crate computes the static equilibrium (centers of mass, draft, center of
//! pressure) and integrates the roll equation `I·θ̈ = τ(θ, θ̇)` to tell
//! whether the structure capsizes, oscillates or settles.
//!
//! - Poka-Yoke: validated TOML configuration, fatal on any mismatch
//! - Jidoka: the run stops when the hydrostatic model leaves its domain
//!   or a value turns non-finite
//!
//! ## Example
//!
//! ```rust
//! use heelsim::prelude::*;
//!
//! let mut config = StabilityConfig::reference();
//! config.simulation.horizon = 1.0;
//!
//! let engine = StabilityEngine::new(&config)?;
//! let report = engine.run()?;
//! assert!(!report.outcome.is_capsized());
//! # Ok::<(), heelsim::SimError>(())
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::suboptimal_flops,  // Formulas are kept in their textbook form
    clippy::imprecise_flops,
    clippy::too_many_lines,
    clippy::missing_const_for_fn,
)]

pub mod cli;
pub mod config;
pub mod domains;
pub mod engine;
pub mod error;
pub mod tracker;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{StabilityConfig, StabilityConfigBuilder};
    pub use crate::domains::{
        Assembly, EnergyAccounting, EquilibriumSnapshot, Hydrostatics, IntegratorKind,
        KineticTerm, TorqueModel,
    };
    pub use crate::engine::jidoka::{JidokaConfig, JidokaGuard};
    pub use crate::engine::{HeelState, Outcome, StabilityEngine, StabilityReport, Trajectory};
    pub use crate::error::{SimError, SimResult};
    pub use crate::tracker::ReferenceTrajectory;
}

/// Re-export for public API
pub use error::{SimError, SimResult};
