//! Viscous (Navier-Stokes) closure: transport properties and velocity-field
//! derivatives.
//!
//! Extends the Euler closure with the molecular viscosity (Sutherland's
//! law), the vorticity vector and strain-rate magnitude computed from the
//! primitive velocity gradient, and the externally supplied eddy viscosity
//! folded into effective transport coefficients.
//!
//! All derived quantities here are recomputed on demand; none is refreshed
//! implicitly when the solution or the gradients change.

use crate::constants::{GasConstants, SutherlandConstants};
use crate::error::StateError;
use crate::state::PointState;

use super::CompressibleState;

/// Navier-Stokes closure state.
#[derive(Clone, Debug, PartialEq)]
pub struct ViscousState {
    flow: CompressibleState,
    /// Molecular (laminar) viscosity from the viscosity law.
    laminar_viscosity: f64,
    /// Eddy viscosity, set by the turbulence closure.
    eddy_viscosity: f64,
    /// Vorticity vector; in 2D only the out-of-plane component is nonzero.
    vorticity: [f64; 3],
    /// Frobenius norm of the strain-rate tensor, sqrt(2 S_ij S_ij).
    strain_mag: f64,
}

impl ViscousState {
    /// Create a zero-initialized viscous state.
    pub fn new(n_dim: usize, dual_time: bool) -> Result<Self, StateError> {
        Ok(Self {
            flow: CompressibleState::new(n_dim, dual_time)?,
            laminar_viscosity: 0.0,
            eddy_viscosity: 0.0,
            vorticity: [0.0; 3],
            strain_mag: 0.0,
        })
    }

    /// Create from freestream-style initial data.
    pub fn from_flow(
        n_dim: usize,
        density: f64,
        velocity: &[f64],
        energy: f64,
        dual_time: bool,
    ) -> Result<Self, StateError> {
        Ok(Self {
            flow: CompressibleState::from_flow(n_dim, density, velocity, energy, dual_time)?,
            laminar_viscosity: 0.0,
            eddy_viscosity: 0.0,
            vorticity: [0.0; 3],
            strain_mag: 0.0,
        })
    }

    /// The underlying Euler closure.
    #[inline(always)]
    pub fn flow(&self) -> &CompressibleState {
        &self.flow
    }

    /// The underlying Euler closure, mutable.
    #[inline(always)]
    pub fn flow_mut(&mut self) -> &mut CompressibleState {
        &mut self.flow
    }

    /// Base state container.
    #[inline(always)]
    pub fn base(&self) -> &PointState {
        self.flow.base()
    }

    /// Base state container, mutable.
    #[inline(always)]
    pub fn base_mut(&mut self) -> &mut PointState {
        self.flow.base_mut()
    }

    // ------------------------------------------------------------------
    // Transport properties
    // ------------------------------------------------------------------

    /// Evaluate the molecular viscosity from the current temperature.
    ///
    /// Pure function of the primitive temperature and the viscosity-law
    /// constants; refresh the primitives first.
    pub fn set_laminar_viscosity(&mut self, law: &SutherlandConstants) {
        self.laminar_viscosity = law.viscosity(self.flow.temperature());
    }

    /// Molecular viscosity.
    #[inline(always)]
    pub fn laminar_viscosity(&self) -> f64 {
        self.laminar_viscosity
    }

    /// Store the eddy viscosity computed by the turbulence closure.
    #[inline(always)]
    pub fn set_eddy_viscosity(&mut self, mu_t: f64) {
        self.eddy_viscosity = mu_t;
    }

    /// Eddy viscosity.
    #[inline(always)]
    pub fn eddy_viscosity(&self) -> f64 {
        self.eddy_viscosity
    }

    /// Effective viscosity mu_lam + mu_t.
    #[inline]
    pub fn effective_viscosity(&self) -> f64 {
        self.laminar_viscosity + self.eddy_viscosity
    }

    /// Effective thermal conductivity
    /// cp (mu_lam / Pr_lam + mu_t / Pr_turb).
    #[inline]
    pub fn effective_conductivity(&self, gas: &GasConstants) -> f64 {
        gas.cp() * (self.laminar_viscosity / gas.prandtl_lam
            + self.eddy_viscosity / gas.prandtl_turb)
    }

    /// Overwrite the primitive temperature entry (isothermal walls).
    #[inline]
    pub fn set_wall_temperature(&mut self, temperature: f64) {
        self.flow.set_primitive_at(0, temperature);
    }

    // ------------------------------------------------------------------
    // Velocity-field derivatives
    // ------------------------------------------------------------------

    /// Velocity-gradient entry d(v_i)/d(x_j) from the primitive gradient.
    #[inline(always)]
    fn vel_grad(&self, i: usize, j: usize) -> f64 {
        self.flow.primitive_gradient(i + 1, j)
    }

    /// Compute the vorticity vector (curl of the velocity) from the
    /// primitive gradient.
    ///
    /// In 2D only the out-of-plane component is populated; the in-plane
    /// components are defined as zero.
    pub fn set_vorticity(&mut self) {
        let n_dim = self.base().n_dim();
        if n_dim == 3 {
            self.vorticity[0] = self.vel_grad(2, 1) - self.vel_grad(1, 2);
            self.vorticity[1] = self.vel_grad(0, 2) - self.vel_grad(2, 0);
        } else {
            self.vorticity[0] = 0.0;
            self.vorticity[1] = 0.0;
        }
        self.vorticity[2] = self.vel_grad(1, 0) - self.vel_grad(0, 1);
    }

    /// Vorticity component (index 2 is the out-of-plane component in 2D).
    #[inline(always)]
    pub fn vorticity(&self, i_dim: usize) -> f64 {
        debug_assert!(i_dim < 3);
        self.vorticity[i_dim]
    }

    /// Compute the strain-rate magnitude sqrt(2 S_ij S_ij) with
    /// S_ij = (d(v_i)/d(x_j) + d(v_j)/d(x_i)) / 2.
    pub fn set_strain_mag(&mut self) {
        let n_dim = self.base().n_dim();
        let mut sum = 0.0;
        for i in 0..n_dim {
            for j in 0..n_dim {
                let s_ij = 0.5 * (self.vel_grad(i, j) + self.vel_grad(j, i));
                sum += s_ij * s_ij;
            }
        }
        self.strain_mag = (2.0 * sum).sqrt();
    }

    /// Strain-rate magnitude.
    #[inline(always)]
    pub fn strain_mag(&self) -> f64 {
        self.strain_mag
    }

    // ------------------------------------------------------------------
    // Primitive recomputation
    // ------------------------------------------------------------------

    /// RANS-aware recompute: refresh the primitives (pressure including the
    /// turbulent kinetic energy), store the eddy viscosity, zero the
    /// primitive gradient. Returns the realizability flag.
    pub fn set_primitive_vars(
        &mut self,
        eddy_viscosity: f64,
        turb_ke: f64,
        gas: &GasConstants,
    ) -> bool {
        self.eddy_viscosity = eddy_viscosity;
        self.flow.set_primitive_vars_turb(turb_ke, gas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-12;

    fn state_2d() -> ViscousState {
        ViscousState::from_flow(2, 1.0, &[1.0, 0.0], 10.0, false).unwrap()
    }

    /// Set d(v_i)/d(x_j) entries of the primitive gradient.
    fn set_vel_grad(s: &mut ViscousState, grads: &[(usize, usize, f64)]) {
        for &(i, j, g) in grads {
            s.flow_mut().set_primitive_gradient(i + 1, j, g);
        }
    }

    #[test]
    fn test_vorticity_rigid_rotation_2d() {
        // u = -y, v = x: du/dy = -1, dv/dx = 1 => omega_z = 2, strain = 0.
        let mut s = state_2d();
        set_vel_grad(&mut s, &[(0, 1, -1.0), (1, 0, 1.0)]);
        s.set_vorticity();
        s.set_strain_mag();
        assert!((s.vorticity(2) - 2.0).abs() < TOL);
        assert!(s.vorticity(0).abs() < TOL);
        assert!(s.vorticity(1).abs() < TOL);
        assert!(s.strain_mag().abs() < TOL);
    }

    #[test]
    fn test_strain_pure_shear_2d() {
        // u = y: S_12 = S_21 = 1/2 => strain = sqrt(2 * 2 * 1/4) = 1.
        let mut s = state_2d();
        set_vel_grad(&mut s, &[(0, 1, 1.0)]);
        s.set_vorticity();
        s.set_strain_mag();
        assert!((s.strain_mag() - 1.0).abs() < TOL);
        assert!((s.vorticity(2) + 1.0).abs() < TOL);
    }

    #[test]
    fn test_strain_pure_extension_2d() {
        // u = x, v = -y: S_11 = 1, S_22 = -1 => strain = 2, no rotation.
        let mut s = state_2d();
        set_vel_grad(&mut s, &[(0, 0, 1.0), (1, 1, -1.0)]);
        s.set_vorticity();
        s.set_strain_mag();
        assert!((s.strain_mag() - 2.0).abs() < TOL);
        assert!(s.vorticity(2).abs() < TOL);
    }

    #[test]
    fn test_vorticity_3d() {
        // u = z: du/dz = 1 => omega = (0, 1, 0).
        let mut s = ViscousState::from_flow(3, 1.0, &[0.0, 0.0, 0.0], 10.0, false).unwrap();
        set_vel_grad(&mut s, &[(0, 2, 1.0)]);
        s.set_vorticity();
        assert!(s.vorticity(0).abs() < TOL);
        assert!((s.vorticity(1) - 1.0).abs() < TOL);
        assert!(s.vorticity(2).abs() < TOL);
    }

    #[test]
    fn test_laminar_viscosity_from_temperature() {
        let mut s = state_2d();
        let gas = GasConstants::air();
        let law = SutherlandConstants::air();
        assert!(s.flow_mut().set_primitive_vars(&gas));
        s.set_laminar_viscosity(&law);
        let expect = law.viscosity(s.flow().temperature());
        assert!((s.laminar_viscosity() - expect).abs() < 1e-20);
        assert!(s.laminar_viscosity() > 0.0);
    }

    #[test]
    fn test_effective_transport() {
        let mut s = state_2d();
        let gas = GasConstants::air();
        s.laminar_viscosity = 2.0e-5;
        s.set_eddy_viscosity(3.0e-5);
        assert!((s.effective_viscosity() - 5.0e-5).abs() < 1e-18);

        let k = s.effective_conductivity(&gas);
        let expect = gas.cp() * (2.0e-5 / 0.72 + 3.0e-5 / 0.90);
        assert!((k - expect).abs() < 1e-12);
    }

    #[test]
    fn test_set_primitive_vars_stores_eddy_viscosity() {
        let mut s = state_2d();
        let gas = GasConstants::air();
        assert!(s.set_primitive_vars(1.5e-5, 0.0, &gas));
        assert!((s.eddy_viscosity() - 1.5e-5).abs() < 1e-18);
    }

    #[test]
    fn test_wall_temperature_overwrites_primitive() {
        let mut s = state_2d();
        let gas = GasConstants::air();
        s.flow_mut().set_primitive_vars(&gas);
        s.set_wall_temperature(300.0);
        assert!((s.flow().temperature() - 300.0).abs() < TOL);
    }
}
