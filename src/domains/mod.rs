//! Physical model of the barge and its crane.
//!
//! Leaf-first:
//! - Mass: centers of mass of the crane chain and the hull
//! - Hydrostatics: draft, submerged trapezoid, center of pressure
//! - Assembly: the immutable structure everything else borrows
//! - Torque: righting, destabilizing and damping torques
//! - Dynamics: the integrators that advance the heel
//! - Energy: diagnostic energy terms of a finished run

pub mod assembly;
pub mod dynamics;
pub mod energy;
pub mod hydrostatics;
pub mod mass;
pub mod torque;

pub use assembly::{Assembly, EquilibriumSnapshot, DEFAULT_GRAVITY};
pub use dynamics::{EulerIntegrator, Integrator, IntegratorKind, RK4Integrator, TorqueField};
pub use energy::{EnergyAccounting, EnergySample, KineticTerm};
pub use hydrostatics::{DomainViolation, Hydrostatics, TrapezoidBases, DEFAULT_WATER_DENSITY};
pub use mass::{barge_center_of_mass, crane_center_of_mass, Barge, Counterweight, Crane, Segment};
pub use torque::{TorqueBreakdown, TorqueModel};
