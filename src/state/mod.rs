//! Per-point state storage.
//!
//! [`PointState`] is the physics-agnostic container every closure builds on:
//! the conserved solution vector with its history snapshots, the
//! gradient/limiter reconstruction buffers, and the eigenvalue/time-step and
//! residual bookkeeping used by the outer solver loops.

mod base;

pub use base::PointState;
