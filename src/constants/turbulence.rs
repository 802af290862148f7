//! Turbulence-model closure coefficients.
//!
//! Coefficients are the published values from the model literature, not
//! tunables: the blending formulas in the two-equation closure are only
//! valid with the calibrated set.
//!
//! # References
//!
//! - Menter, Kuntz, Langtry (2003): Ten years of industrial experience with
//!   the SST turbulence model.
//! - Spalart, Allmaras (1992): A one-equation turbulence model for
//!   aerodynamic flows. AIAA 92-0439.

/// Floor applied to the SST cross-diffusion term.
///
/// Keeps the F1 argument finite when the local dissipation rate (or the
/// k/omega gradient product) approaches zero.
pub const CROSS_DIFFUSION_FLOOR: f64 = 1e-20;

/// Menter SST (k-omega shear stress transport) coefficients.
///
/// Set 1 applies near walls, set 2 in the free stream; the F1 blending
/// function computed per point interpolates between them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SstConstants {
    /// k diffusion coefficient, inner set.
    pub sigma_k1: f64,
    /// k diffusion coefficient, outer set.
    pub sigma_k2: f64,
    /// omega diffusion coefficient, inner set.
    pub sigma_om1: f64,
    /// omega diffusion coefficient, outer set.
    pub sigma_om2: f64,
    /// Destruction coefficient, inner set.
    pub beta_1: f64,
    /// Destruction coefficient, outer set.
    pub beta_2: f64,
    /// k destruction coefficient beta*.
    pub beta_star: f64,
    /// von Karman constant.
    pub kappa: f64,
    /// Stress-limiter constant a1.
    pub a1: f64,
}

impl Default for SstConstants {
    /// Menter (2003) calibration.
    fn default() -> Self {
        Self {
            sigma_k1: 0.85,
            sigma_k2: 1.0,
            sigma_om1: 0.5,
            sigma_om2: 0.856,
            beta_1: 0.075,
            beta_2: 0.0828,
            beta_star: 0.09,
            kappa: 0.41,
            a1: 0.31,
        }
    }
}

impl SstConstants {
    /// Blend an inner/outer coefficient pair with the F1 function:
    /// phi = F1 phi_1 + (1 - F1) phi_2.
    #[inline]
    pub fn blend(f1: f64, phi_1: f64, phi_2: f64) -> f64 {
        f1 * phi_1 + (1.0 - f1) * phi_2
    }
}

/// Spalart-Allmaras one-equation model coefficients.
///
/// The one-equation closure itself only stores the transported scalar; the
/// coefficients live here for the source-term assembly that consumes it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SaConstants {
    /// Production coefficient.
    pub cb1: f64,
    /// Diffusion coefficient.
    pub cb2: f64,
    /// Turbulent Prandtl-like diffusion constant.
    pub sigma: f64,
    /// von Karman constant.
    pub kappa: f64,
    /// Wall destruction coefficient cw1 = cb1/kappa^2 + (1 + cb2)/sigma.
    pub cw1: f64,
    /// Destruction-function coefficient.
    pub cw2: f64,
    /// Destruction-function coefficient.
    pub cw3: f64,
    /// Viscous damping coefficient.
    pub cv1: f64,
}

impl Default for SaConstants {
    /// Spalart-Allmaras (1992) calibration.
    fn default() -> Self {
        let cb1 = 0.1355;
        let cb2 = 0.622;
        let sigma = 2.0 / 3.0;
        let kappa = 0.41;
        Self {
            cb1,
            cb2,
            sigma,
            kappa,
            cw1: cb1 / (kappa * kappa) + (1.0 + cb2) / sigma,
            cw2: 0.3,
            cw3: 2.0,
            cv1: 7.1,
        }
    }
}
