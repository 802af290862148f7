//! Turbulence closures: one-equation (Spalart-Allmaras) and two-equation
//! (Menter SST) per-point states.
//!
//! Both closures reuse the base container for their transported scalars and
//! hold the eddy viscosity computed by the external turbulence solver. The
//! SST variant additionally evaluates the Menter blending functions from
//! local flow and wall-distance data:
//!
//! F1 = tanh(arg1^4),
//! arg1 = min(max(sqrt(k)/(beta* omega d), 500 nu/(d^2 omega)),
//!            4 rho sigma_w2 k / (CD_kw d^2))
//!
//! F2 = tanh(arg2^2),
//! arg2 = max(2 sqrt(k)/(beta* omega d), 500 nu/(d^2 omega))
//!
//! CD_kw = max(2 rho sigma_w2 / omega * grad k . grad omega, 1e-20)
//!
//! F1 tends to 1 approaching a solid wall and to 0 in the free stream; F2
//! feeds the shear-stress limiter.

use crate::constants::{SstConstants, CROSS_DIFFUSION_FLOOR};
use crate::error::StateError;
use crate::state::PointState;

/// Wall-distance floor keeping the near-wall blending limits NaN-free.
const WALL_DISTANCE_FLOOR: f64 = 1e-10;

/// One-equation (Spalart-Allmaras) turbulence state.
///
/// Transports a single working variable nu_tilde; no blending logic.
#[derive(Clone, Debug, PartialEq)]
pub struct TurbSaState {
    base: PointState,
    /// Eddy viscosity, supplied by the turbulence solver.
    mu_t: f64,
}

impl TurbSaState {
    /// Create with an initial nu_tilde and eddy viscosity.
    pub fn new(
        n_dim: usize,
        nu_tilde: f64,
        mu_t: f64,
        dual_time: bool,
    ) -> Result<Self, StateError> {
        let mut base = PointState::new(n_dim, 1, dual_time)?;
        base.set_solution_at(0, nu_tilde);
        base.save_solution_old();
        if base.has_dual_time() {
            base.set_solution_time_n();
            base.set_solution_time_n1();
        }
        Ok(Self { base, mu_t })
    }

    /// Base state container.
    #[inline(always)]
    pub fn base(&self) -> &PointState {
        &self.base
    }

    /// Base state container, mutable.
    #[inline(always)]
    pub fn base_mut(&mut self) -> &mut PointState {
        &mut self.base
    }

    /// Transported working variable nu_tilde.
    #[inline(always)]
    pub fn nu_tilde(&self) -> f64 {
        self.base.solution_at(0)
    }

    /// Eddy viscosity.
    #[inline(always)]
    pub fn mu_t(&self) -> f64 {
        self.mu_t
    }

    /// Store the eddy viscosity.
    #[inline(always)]
    pub fn set_mu_t(&mut self, mu_t: f64) {
        self.mu_t = mu_t;
    }
}

/// Two-equation (Menter SST) turbulence state.
///
/// Transports the turbulent kinetic energy k (`solution[0]`) and the
/// specific dissipation rate omega (`solution[1]`).
#[derive(Clone, Debug, PartialEq)]
pub struct TurbSstState {
    base: PointState,
    /// Model coefficients (owned copy, read-only after construction).
    constants: SstConstants,
    /// Eddy viscosity, supplied by the turbulence solver.
    mu_t: f64,
    /// First Menter blending function (k-w vs k-eps).
    f1: f64,
    /// Second blending function (stress limiter).
    f2: f64,
    /// Cross-diffusion term, floored at [`CROSS_DIFFUSION_FLOOR`].
    cd_kw: f64,
}

impl TurbSstState {
    /// Create with initial k, omega and eddy viscosity.
    pub fn new(
        n_dim: usize,
        kine: f64,
        omega: f64,
        mu_t: f64,
        constants: SstConstants,
        dual_time: bool,
    ) -> Result<Self, StateError> {
        let mut base = PointState::new(n_dim, 2, dual_time)?;
        base.set_solution_at(0, kine);
        base.set_solution_at(1, omega);
        base.save_solution_old();
        if base.has_dual_time() {
            base.set_solution_time_n();
            base.set_solution_time_n1();
        }
        Ok(Self {
            base,
            constants,
            mu_t,
            f1: 0.0,
            f2: 0.0,
            cd_kw: CROSS_DIFFUSION_FLOOR,
        })
    }

    /// Base state container.
    #[inline(always)]
    pub fn base(&self) -> &PointState {
        &self.base
    }

    /// Base state container, mutable.
    #[inline(always)]
    pub fn base_mut(&mut self) -> &mut PointState {
        &mut self.base
    }

    /// Turbulent kinetic energy.
    #[inline(always)]
    pub fn kine(&self) -> f64 {
        self.base.solution_at(0)
    }

    /// Specific dissipation rate.
    #[inline(always)]
    pub fn omega(&self) -> f64 {
        self.base.solution_at(1)
    }

    /// Model coefficients.
    #[inline(always)]
    pub fn constants(&self) -> &SstConstants {
        &self.constants
    }

    /// Eddy viscosity.
    #[inline(always)]
    pub fn mu_t(&self) -> f64 {
        self.mu_t
    }

    /// Store the eddy viscosity.
    #[inline(always)]
    pub fn set_mu_t(&mut self, mu_t: f64) {
        self.mu_t = mu_t;
    }

    /// Compute the blending functions and cross-diffusion term from the
    /// local molecular viscosity, wall distance and density, plus the
    /// stored k/omega values and their gradients (accumulate the solution
    /// gradient before calling).
    pub fn set_blending_func(&mut self, viscosity: f64, wall_distance: f64, density: f64) {
        debug_assert!(density > 0.0);
        debug_assert!(viscosity > 0.0);

        let c = &self.constants;
        let dist = wall_distance.max(WALL_DISTANCE_FLOOR);
        let kine = self.base.solution_at(0);
        let omega = self.base.solution_at(1);

        let mut cross: f64 = 0.0;
        for i_dim in 0..self.base.n_dim() {
            cross += self.base.gradient(0, i_dim) * self.base.gradient(1, i_dim);
        }
        cross *= 2.0 * density * c.sigma_om2 / omega;
        self.cd_kw = cross.max(CROSS_DIFFUSION_FLOOR);

        let dist2 = dist * dist;
        let sqrt_k_term = kine.sqrt() / (c.beta_star * omega * dist);
        let visc_term = 500.0 * viscosity / (density * dist2 * omega);

        let arg1 = sqrt_k_term
            .max(visc_term)
            .min(4.0 * density * c.sigma_om2 * kine / (self.cd_kw * dist2));
        self.f1 = arg1.powi(4).tanh();

        let arg2 = (2.0 * sqrt_k_term).max(visc_term);
        self.f2 = arg2.powi(2).tanh();
    }

    /// First blending function.
    #[inline(always)]
    pub fn f1_blending(&self) -> f64 {
        self.f1
    }

    /// Second blending function.
    #[inline(always)]
    pub fn f2_blending(&self) -> f64 {
        self.f2
    }

    /// Cross-diffusion term (never below the configured floor).
    #[inline(always)]
    pub fn cross_diff(&self) -> f64 {
        self.cd_kw
    }
}
