//! Physical constants providers.
//!
//! The closures in this crate never hard-code gas or model coefficients;
//! everything comes from the read-only providers defined here. Constants are
//! validated once at construction and immutable afterwards, so the per-point
//! update loops can read them without further checking.

mod gas;
mod transport;
mod turbulence;

pub use gas::GasConstants;
pub use transport::SutherlandConstants;
pub use turbulence::{SaConstants, SstConstants, CROSS_DIFFUSION_FLOOR};

use crate::error::ConstantsError;

/// Aggregate constants handle passed to closures at construction.
///
/// Bundles the gas model, the transport-property law, and the turbulence
/// coefficients, together with the process-wide spatial dimension. Built
/// once at solver setup; every point state copies what it needs from here.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowConstants {
    /// Perfect-gas constants.
    pub gas: GasConstants,
    /// Sutherland viscosity-law constants.
    pub viscosity: SutherlandConstants,
    /// Menter SST closure coefficients.
    pub sst: SstConstants,
    /// Spalart-Allmaras closure coefficients.
    pub sa: SaConstants,
    /// Spatial dimension (2 or 3), fixed for the whole problem.
    pub n_dim: usize,
}

impl FlowConstants {
    /// Standard-air constants in `n_dim` spatial dimensions.
    pub fn air(n_dim: usize) -> Result<Self, ConstantsError> {
        Self::new(
            GasConstants::air(),
            SutherlandConstants::air(),
            SstConstants::default(),
            SaConstants::default(),
            n_dim,
        )
    }

    /// Build from explicit components.
    ///
    /// The components are already validated by their own constructors; this
    /// only checks the spatial dimension.
    pub fn new(
        gas: GasConstants,
        viscosity: SutherlandConstants,
        sst: SstConstants,
        sa: SaConstants,
        n_dim: usize,
    ) -> Result<Self, ConstantsError> {
        if !(2..=3).contains(&n_dim) {
            return Err(ConstantsError::InvalidDimension(n_dim));
        }
        Ok(Self {
            gas,
            viscosity,
            sst,
            sa,
            n_dim,
        })
    }
}
