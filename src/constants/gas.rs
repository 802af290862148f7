//! Calorically perfect gas constants.
//!
//! The equation-of-state closures assume a calorically perfect gas:
//!
//! p = (gamma - 1) rho e_int,   c^2 = gamma p / rho,   T = p / (rho R)
//!
//! # Units
//!
//! - Gas constant R: J/(kg K)
//! - Temperature: K
//! - Pressure: Pa
//!
//! The Prandtl numbers live here as well because the effective thermal
//! conductivity is a gas property folded from the transport coefficients.

use crate::error::ConstantsError;

/// Perfect-gas constants (ratio of specific heats, gas constant, Prandtl
/// numbers).
///
/// Validated at construction; immutable afterwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GasConstants {
    /// Ratio of specific heats gamma (> 1).
    pub gamma: f64,
    /// Specific gas constant R (J/(kg K), > 0).
    pub r: f64,
    /// Laminar Prandtl number.
    pub prandtl_lam: f64,
    /// Turbulent Prandtl number.
    pub prandtl_turb: f64,
}

impl GasConstants {
    /// Standard air: gamma = 1.4, R = 287.058 J/(kg K), Pr = 0.72 / 0.90.
    pub fn air() -> Self {
        Self {
            gamma: 1.4,
            r: 287.058,
            prandtl_lam: 0.72,
            prandtl_turb: 0.90,
        }
    }

    /// Create validated gas constants.
    pub fn new(
        gamma: f64,
        r: f64,
        prandtl_lam: f64,
        prandtl_turb: f64,
    ) -> Result<Self, ConstantsError> {
        if !(gamma > 1.0) || !gamma.is_finite() {
            return Err(ConstantsError::InvalidGamma(gamma));
        }
        if !(r > 0.0) || !r.is_finite() {
            return Err(ConstantsError::InvalidGasConstant(r));
        }
        if !(prandtl_lam > 0.0) {
            return Err(ConstantsError::InvalidPrandtl(prandtl_lam));
        }
        if !(prandtl_turb > 0.0) {
            return Err(ConstantsError::InvalidPrandtl(prandtl_turb));
        }
        Ok(Self {
            gamma,
            r,
            prandtl_lam,
            prandtl_turb,
        })
    }

    /// gamma - 1, the factor in the internal-energy pressure relation.
    #[inline(always)]
    pub fn gamma_minus_one(&self) -> f64 {
        self.gamma - 1.0
    }

    /// Specific heat at constant pressure, cp = gamma R / (gamma - 1).
    #[inline]
    pub fn cp(&self) -> f64 {
        self.gamma * self.r / (self.gamma - 1.0)
    }

    /// Specific heat at constant volume, cv = R / (gamma - 1).
    #[inline]
    pub fn cv(&self) -> f64 {
        self.r / (self.gamma - 1.0)
    }
}

impl Default for GasConstants {
    fn default() -> Self {
        Self::air()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-12;

    #[test]
    fn test_air_values() {
        let gas = GasConstants::air();
        assert!((gas.gamma - 1.4).abs() < TOL);
        assert!((gas.r - 287.058).abs() < TOL);
    }

    #[test]
    fn test_specific_heats() {
        let gas = GasConstants::air();
        // cp - cv = R and cp / cv = gamma.
        assert!((gas.cp() - gas.cv() - gas.r).abs() < 1e-9);
        assert!((gas.cp() / gas.cv() - gas.gamma).abs() < TOL);
    }

    #[test]
    fn test_validation() {
        assert!(GasConstants::new(1.0, 287.0, 0.72, 0.9).is_err());
        assert!(GasConstants::new(1.4, -1.0, 0.72, 0.9).is_err());
        assert!(GasConstants::new(1.4, 287.0, 0.0, 0.9).is_err());
        assert!(GasConstants::new(1.4, 287.0, 0.72, -0.9).is_err());
        assert!(GasConstants::new(1.4, 287.0, 0.72, 0.9).is_ok());
    }
}
