//! Physics closures layered over the base state container.
//!
//! Each closure composes a [`crate::state::PointState`] with the derived
//! quantities its physics variant needs, and owns the conversions between
//! conserved and primitive representations:
//!
//! - [`CompressibleState`]: perfect-gas Euler closure (primitive vector,
//!   equation of state).
//! - [`ViscousState`]: Navier-Stokes closure (transport properties,
//!   vorticity, strain rate) on top of the Euler one.
//! - [`TurbSaState`] / [`TurbSstState`]: one- and two-equation turbulence
//!   closures.
//! - [`BaselineState`]: restart passthrough with no closure behavior.

mod baseline;
mod compressible;
mod turbulence;
mod viscous;

pub use baseline::BaselineState;
pub use compressible::{cons_to_prim, prim_to_cons, CompressibleState};
pub use turbulence::{TurbSaState, TurbSstState};
pub use viscous::ViscousState;
