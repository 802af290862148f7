//! # compflow
//!
//! Per-point physical state for a compressible finite-volume solver.
//!
//! This crate provides the state representation and closure relations that
//! sit between the solver's conserved quantities and the physics:
//! - Base per-point storage and update primitives (solution history,
//!   gradients, limiters, eigenvalue/time-step bookkeeping)
//! - Compressible (Euler) closure: conservative/primitive conversion and
//!   the perfect-gas equation of state
//! - Viscous (Navier-Stokes) closure: Sutherland viscosity, vorticity,
//!   strain rate, effective transport properties
//! - One-equation (SA) and two-equation (SST) turbulence closures with the
//!   Menter blending functions
//! - Validated physical-constants providers
//! - Whole-field sweep helpers (serial, and parallel behind the `parallel`
//!   feature)
//!
//! Mesh topology, flux assembly, linear solvers and I/O are external
//! collaborators: this crate only stores and transforms per-point state.

pub mod closure;
pub mod constants;
pub mod error;
pub mod state;
pub mod sweep;
pub mod variant;

// Re-export main types for convenience
pub use closure::{
    cons_to_prim, prim_to_cons, BaselineState, CompressibleState, TurbSaState, TurbSstState,
    ViscousState,
};
pub use constants::{
    FlowConstants, GasConstants, SaConstants, SstConstants, SutherlandConstants,
    CROSS_DIFFUSION_FLOOR,
};
pub use error::{ConstantsError, StateError};
pub use state::PointState;
pub use sweep::{recompute_primitives, save_solutions_old, set_gradients_zero};
#[cfg(feature = "parallel")]
pub use sweep::{
    recompute_primitives_parallel, save_solutions_old_parallel, set_gradients_zero_parallel,
};
pub use variant::PointVariant;
