//! Error types for state construction and constants validation.
//!
//! Runtime physics failures (negative density/pressure) are *not* errors at
//! this layer: they are realizability flags returned as `bool` from the
//! equation-of-state setters, and recovery is the caller's responsibility.
//! The types here cover the one-time setup paths only.

use thiserror::Error;

/// Error type for physical-constants validation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConstantsError {
    /// Ratio of specific heats must exceed one for a perfect gas.
    #[error("ratio of specific heats must be > 1, got {0}")]
    InvalidGamma(f64),

    /// Gas constant must be positive.
    #[error("gas constant must be positive, got {0}")]
    InvalidGasConstant(f64),

    /// Prandtl numbers must be positive.
    #[error("Prandtl number must be positive, got {0}")]
    InvalidPrandtl(f64),

    /// Reference viscosity/temperature for the viscosity law must be positive.
    #[error("viscosity-law reference {name} must be positive, got {value}")]
    InvalidViscosityReference {
        /// Name of the offending reference quantity.
        name: &'static str,
        /// Supplied value.
        value: f64,
    },

    /// Spatial dimension must be 2 or 3.
    #[error("spatial dimension must be 2 or 3, got {0}")]
    InvalidDimension(usize),
}

/// Error type for point-state construction.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StateError {
    /// A state must carry at least one conserved variable.
    #[error("state requires at least one variable")]
    ZeroVariables,

    /// Spatial dimension must be 2 or 3.
    #[error("spatial dimension must be 2 or 3, got {0}")]
    InvalidDimension(usize),

    /// Initialization vector length does not match the declared nVar.
    #[error("solution vector has length {got}, expected {expected}")]
    SolutionLength {
        /// Supplied length.
        got: usize,
        /// Declared number of variables.
        expected: usize,
    },
}
