//! Sutherland's law for the molecular (laminar) viscosity.
//!
//! mu(T) = mu_ref (T / T_ref)^(3/2) (T_ref + S) / (T + S)
//!
//! Sub-linear growth with temperature, standard for air up to ~1900 K.
//!
//! # References
//!
//! - Sutherland (1893): The viscosity of gases and molecular force.
//! - White, Viscous Fluid Flow, 3rd ed., eq. (1-36).
//!
//! # Units
//!
//! - Viscosity: Pa s
//! - Temperature: K

use crate::error::ConstantsError;

/// Sutherland viscosity-law constants.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SutherlandConstants {
    /// Reference viscosity mu_ref (Pa s).
    pub mu_ref: f64,
    /// Reference temperature T_ref (K).
    pub t_ref: f64,
    /// Sutherland constant S (K).
    pub s: f64,
}

impl SutherlandConstants {
    /// Standard air: mu_ref = 1.716e-5 Pa s at T_ref = 273.15 K, S = 110.4 K.
    pub fn air() -> Self {
        Self {
            mu_ref: 1.716e-5,
            t_ref: 273.15,
            s: 110.4,
        }
    }

    /// Create validated constants.
    pub fn new(mu_ref: f64, t_ref: f64, s: f64) -> Result<Self, ConstantsError> {
        if !(mu_ref > 0.0) {
            return Err(ConstantsError::InvalidViscosityReference {
                name: "mu_ref",
                value: mu_ref,
            });
        }
        if !(t_ref > 0.0) {
            return Err(ConstantsError::InvalidViscosityReference {
                name: "t_ref",
                value: t_ref,
            });
        }
        if !(s > 0.0) {
            return Err(ConstantsError::InvalidViscosityReference { name: "s", value: s });
        }
        Ok(Self { mu_ref, t_ref, s })
    }

    /// Evaluate the viscosity at temperature `t` (K).
    ///
    /// Pure function of the temperature; the caller guarantees `t > 0`
    /// (a non-realizable temperature should have been caught by the
    /// equation-of-state check first).
    #[inline]
    pub fn viscosity(&self, t: f64) -> f64 {
        debug_assert!(t > 0.0, "viscosity evaluated at non-positive T = {}", t);
        let ratio = t / self.t_ref;
        self.mu_ref * ratio * ratio.sqrt() * (self.t_ref + self.s) / (t + self.s)
    }
}

impl Default for SutherlandConstants {
    fn default() -> Self {
        Self::air()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_point() {
        let law = SutherlandConstants::air();
        // At the reference temperature the law returns mu_ref exactly.
        assert!((law.viscosity(273.15) - 1.716e-5).abs() < 1e-20);
    }

    #[test]
    fn test_sublinear_growth() {
        let law = SutherlandConstants::air();
        let mu_300 = law.viscosity(300.0);
        let mu_600 = law.viscosity(600.0);
        assert!(mu_600 > mu_300);
        // Growth is slower than linear in T.
        assert!(mu_600 / mu_300 < 2.0);
    }

    #[test]
    fn test_known_value() {
        // White tabulates mu(300 K) ~ 1.846e-5 Pa s for air.
        let law = SutherlandConstants::air();
        let mu = law.viscosity(300.0);
        assert!((mu - 1.846e-5).abs() < 1e-7);
    }

    #[test]
    fn test_validation() {
        assert!(SutherlandConstants::new(0.0, 273.15, 110.4).is_err());
        assert!(SutherlandConstants::new(1.716e-5, -1.0, 110.4).is_err());
        assert!(SutherlandConstants::new(1.716e-5, 273.15, 0.0).is_err());
    }
}
