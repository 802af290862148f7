//! Base per-point state container.
//!
//! One `PointState` per discretization point, exclusively owned by that
//! point. The container knows nothing about the physics: it stores the
//! conserved solution and the buffers the spatial discretization and time
//! integration need, and exposes the update primitives they apply.
//!
//! # Update contract
//!
//! - `solution_old` and the dual-time snapshots are *not* kept in sync with
//!   `solution`; the time integrator calls the snapshot operations at the
//!   points its algorithm defines.
//! - Gradient, limiter and eigenvalue buffers follow a two-phase protocol:
//!   zero, then accumulate. Reading after the zero phase but before any
//!   accumulation yields zeros, which is a valid state.
//! - Index arguments are a caller contract: checked with `debug_assert!`
//!   only, unchecked in release builds.

use crate::error::StateError;

/// Dual-time-stepping history, allocated only when dual time is active.
#[derive(Clone, Debug, PartialEq)]
struct TimeHistory {
    /// Solution at physical time level n.
    time_n: Vec<f64>,
    /// Solution at physical time level n-1.
    time_n1: Vec<f64>,
}

/// Generic per-point solution storage and update primitives.
///
/// All per-variable buffers have length `n_var`, all per-dimension buffers
/// length `n_dim`; both are fixed for the lifetime of the instance.
#[derive(Clone, Debug, PartialEq)]
pub struct PointState {
    /// Current conserved solution.
    solution: Vec<f64>,
    /// Previous (e.g. Runge-Kutta stage) solution.
    solution_old: Vec<f64>,
    /// Dual-time history (time n, time n-1); `None` unless dual time is on.
    history: Option<TimeHistory>,
    /// Solution gradient, row-major `[n_var x n_dim]`.
    gradient: Vec<f64>,
    /// Slope limiter per variable.
    limiter: Vec<f64>,
    /// Per-variable maximum over the reconstruction stencil.
    solution_max: Vec<f64>,
    /// Per-variable minimum over the reconstruction stencil.
    solution_min: Vec<f64>,
    /// Undivided Laplacian for scalar artificial dissipation.
    und_laplacian: Vec<f64>,
    /// Multigrid truncation error.
    res_trunc_error: Vec<f64>,
    /// Residual snapshot for residual smoothing.
    residual_old: Vec<f64>,
    /// Residual-smoothing accumulator.
    residual_sum: Vec<f64>,
    /// Auxiliary scalar for auxiliary-gradient passes.
    aux_var: f64,
    /// Gradient of the auxiliary scalar (first `n_dim` entries used).
    aux_var_gradient: [f64; 3],
    /// Local time step.
    delta_time: f64,
    /// Maximum eigenvalue.
    max_lambda: f64,
    /// Maximum inviscid eigenvalue.
    max_lambda_inv: f64,
    /// Maximum viscous eigenvalue.
    max_lambda_visc: f64,
    /// Spectral-radius accumulator.
    lambda: f64,
    /// Pressure sensor for artificial-dissipation blending.
    sensor: f64,
    /// Number of conserved variables (per instance).
    n_var: usize,
    /// Spatial dimension (fixed problem-wide at setup).
    n_dim: usize,
}

impl PointState {
    /// Create a zero-initialized state.
    ///
    /// `dual_time` allocates the time-level snapshots needed by dual-time
    /// stepping; leave it off for steady or single-level schemes.
    pub fn new(n_dim: usize, n_var: usize, dual_time: bool) -> Result<Self, StateError> {
        if n_var == 0 {
            return Err(StateError::ZeroVariables);
        }
        if !(2..=3).contains(&n_dim) {
            return Err(StateError::InvalidDimension(n_dim));
        }
        let history = dual_time.then(|| TimeHistory {
            time_n: vec![0.0; n_var],
            time_n1: vec![0.0; n_var],
        });
        Ok(Self {
            solution: vec![0.0; n_var],
            solution_old: vec![0.0; n_var],
            history,
            gradient: vec![0.0; n_var * n_dim],
            limiter: vec![0.0; n_var],
            solution_max: vec![0.0; n_var],
            solution_min: vec![0.0; n_var],
            und_laplacian: vec![0.0; n_var],
            res_trunc_error: vec![0.0; n_var],
            residual_old: vec![0.0; n_var],
            residual_sum: vec![0.0; n_var],
            aux_var: 0.0,
            aux_var_gradient: [0.0; 3],
            delta_time: 0.0,
            max_lambda: 0.0,
            max_lambda_inv: 0.0,
            max_lambda_visc: 0.0,
            lambda: 0.0,
            sensor: 0.0,
            n_var,
            n_dim,
        })
    }

    /// Create a state initialized from a solution vector (restart path).
    ///
    /// `n_var` is taken from the vector length.
    pub fn from_solution(
        n_dim: usize,
        solution: &[f64],
        dual_time: bool,
    ) -> Result<Self, StateError> {
        let mut state = Self::new(n_dim, solution.len(), dual_time)?;
        state.solution.copy_from_slice(solution);
        state.solution_old.copy_from_slice(solution);
        if let Some(h) = state.history.as_mut() {
            h.time_n.copy_from_slice(solution);
            h.time_n1.copy_from_slice(solution);
        }
        Ok(state)
    }

    /// Number of conserved variables.
    #[inline(always)]
    pub fn n_var(&self) -> usize {
        self.n_var
    }

    /// Spatial dimension.
    #[inline(always)]
    pub fn n_dim(&self) -> usize {
        self.n_dim
    }

    /// Whether dual-time history is allocated.
    #[inline]
    pub fn has_dual_time(&self) -> bool {
        self.history.is_some()
    }

    #[inline(always)]
    fn grad_index(&self, i_var: usize, i_dim: usize) -> usize {
        debug_assert!(i_var < self.n_var, "variable index {} out of range", i_var);
        debug_assert!(i_dim < self.n_dim, "dimension index {} out of range", i_dim);
        i_var * self.n_dim + i_dim
    }

    // ------------------------------------------------------------------
    // Solution access and updates
    // ------------------------------------------------------------------

    /// Current conserved solution.
    #[inline(always)]
    pub fn solution(&self) -> &[f64] {
        &self.solution
    }

    /// Single solution entry.
    #[inline(always)]
    pub fn solution_at(&self, i_var: usize) -> f64 {
        debug_assert!(i_var < self.n_var);
        self.solution[i_var]
    }

    /// Overwrite the whole solution vector.
    #[inline]
    pub fn set_solution(&mut self, solution: &[f64]) {
        debug_assert_eq!(solution.len(), self.n_var);
        self.solution.copy_from_slice(solution);
    }

    /// Overwrite a single solution entry.
    #[inline(always)]
    pub fn set_solution_at(&mut self, i_var: usize, value: f64) {
        debug_assert!(i_var < self.n_var);
        self.solution[i_var] = value;
    }

    /// Zero the whole solution vector.
    #[inline]
    pub fn set_solution_zero(&mut self) {
        self.solution.fill(0.0);
    }

    /// `solution[i] += delta`.
    #[inline(always)]
    pub fn add_solution(&mut self, i_var: usize, delta: f64) {
        debug_assert!(i_var < self.n_var);
        self.solution[i_var] += delta;
    }

    /// Clipped update from the *old* snapshot:
    /// `solution[i] = clamp(solution_old[i] + delta, lo, hi)`.
    ///
    /// Reading from the old snapshot keeps repeated calls within one stage
    /// from drifting; used for positivity-constrained quantities.
    #[inline]
    pub fn add_clipped_solution(&mut self, i_var: usize, delta: f64, lo: f64, hi: f64) {
        debug_assert!(i_var < self.n_var);
        debug_assert!(lo <= hi);
        self.solution[i_var] = (self.solution_old[i_var] + delta).clamp(lo, hi);
    }

    /// Density-weighted conservative update:
    /// `solution[i] = clamp((solution_old[i] * rho_old + delta) / rho, lo, hi)`.
    ///
    /// Rescales a per-unit-mass quantity when the carrier density changed
    /// between sub-iterations, preserving the conserved product rather than
    /// the per-mass ratio. With `rho == rho_old` this reduces to
    /// [`add_clipped_solution`] with the delta rescaled by the density.
    ///
    /// [`add_clipped_solution`]: PointState::add_clipped_solution
    #[inline]
    pub fn add_conservative_solution(
        &mut self,
        i_var: usize,
        delta: f64,
        rho: f64,
        rho_old: f64,
        lo: f64,
        hi: f64,
    ) {
        debug_assert!(i_var < self.n_var);
        debug_assert!(rho > 0.0, "conservative update needs positive density");
        self.solution[i_var] =
            ((self.solution_old[i_var] * rho_old + delta) / rho).clamp(lo, hi);
    }

    // ------------------------------------------------------------------
    // Snapshots
    // ------------------------------------------------------------------

    /// Previous-stage solution.
    #[inline(always)]
    pub fn solution_old(&self) -> &[f64] {
        &self.solution_old
    }

    /// Single entry of the previous-stage solution.
    #[inline(always)]
    pub fn solution_old_at(&self, i_var: usize) -> f64 {
        debug_assert!(i_var < self.n_var);
        self.solution_old[i_var]
    }

    /// Overwrite the old-solution snapshot directly.
    #[inline]
    pub fn set_solution_old(&mut self, solution: &[f64]) {
        debug_assert_eq!(solution.len(), self.n_var);
        self.solution_old.copy_from_slice(solution);
    }

    /// Snapshot: `solution -> solution_old`.
    #[inline]
    pub fn save_solution_old(&mut self) {
        self.solution_old.copy_from_slice(&self.solution);
    }

    /// Restore: `solution_old -> solution`.
    #[inline]
    pub fn restore_solution(&mut self) {
        self.solution.copy_from_slice(&self.solution_old);
    }

    /// Snapshot: `solution -> solution_time_n`. No-op ordering is the time
    /// integrator's responsibility; call [`set_solution_time_n1`] first to
    /// retire the previous level.
    ///
    /// # Panics
    ///
    /// Debug-asserts that dual time is active.
    ///
    /// [`set_solution_time_n1`]: PointState::set_solution_time_n1
    #[inline]
    pub fn set_solution_time_n(&mut self) {
        debug_assert!(self.history.is_some(), "dual time not active");
        if let Some(h) = self.history.as_mut() {
            h.time_n.copy_from_slice(&self.solution);
        }
    }

    /// Shift: `solution_time_n -> solution_time_n1`.
    #[inline]
    pub fn set_solution_time_n1(&mut self) {
        debug_assert!(self.history.is_some(), "dual time not active");
        if let Some(h) = self.history.as_mut() {
            let (n, n1) = (&h.time_n, &mut h.time_n1);
            n1.copy_from_slice(n);
        }
    }

    /// Solution at time level n, if dual time is active.
    #[inline]
    pub fn solution_time_n(&self) -> Option<&[f64]> {
        self.history.as_ref().map(|h| h.time_n.as_slice())
    }

    /// Solution at time level n-1, if dual time is active.
    #[inline]
    pub fn solution_time_n1(&self) -> Option<&[f64]> {
        self.history.as_ref().map(|h| h.time_n1.as_slice())
    }

    // ------------------------------------------------------------------
    // Momentum/energy entry helpers
    //
    // These assume the flow layout (density, momentum, energy): momentum
    // occupies entries 1..=n_dim and energy is last. Used by strong wall
    // boundary conditions.
    // ------------------------------------------------------------------

    /// Zero the momentum entries of the solution.
    #[inline]
    pub fn set_vel_solution_zero(&mut self) {
        for v in &mut self.solution[1..=self.n_dim] {
            *v = 0.0;
        }
    }

    /// Set the momentum entries of the solution to `rho * velocity`.
    #[inline]
    pub fn set_vel_solution_vector(&mut self, velocity: &[f64]) {
        debug_assert_eq!(velocity.len(), self.n_dim);
        let rho = self.solution[0];
        for (i, &v) in velocity.iter().enumerate() {
            self.solution[i + 1] = rho * v;
        }
    }

    /// Zero the momentum entries of the old solution.
    #[inline]
    pub fn set_vel_solution_old_zero(&mut self) {
        for v in &mut self.solution_old[1..=self.n_dim] {
            *v = 0.0;
        }
    }

    /// Set the momentum entries of the old solution to `rho_old * velocity`.
    #[inline]
    pub fn set_vel_solution_old_vector(&mut self, velocity: &[f64]) {
        debug_assert_eq!(velocity.len(), self.n_dim);
        let rho = self.solution_old[0];
        for (i, &v) in velocity.iter().enumerate() {
            self.solution_old[i + 1] = rho * v;
        }
    }

    // ------------------------------------------------------------------
    // Gradient / limiter (two-phase: zero, then accumulate)
    // ------------------------------------------------------------------

    /// Zero the solution gradient.
    #[inline]
    pub fn set_gradient_zero(&mut self) {
        self.gradient.fill(0.0);
    }

    /// Gradient entry `d(solution[i_var]) / d(x[i_dim])`.
    #[inline(always)]
    pub fn gradient(&self, i_var: usize, i_dim: usize) -> f64 {
        self.gradient[self.grad_index(i_var, i_dim)]
    }

    /// Gradient row for one variable (length `n_dim`).
    #[inline]
    pub fn gradient_row(&self, i_var: usize) -> &[f64] {
        let start = self.grad_index(i_var, 0);
        &self.gradient[start..start + self.n_dim]
    }

    /// Overwrite a gradient entry.
    #[inline(always)]
    pub fn set_gradient(&mut self, i_var: usize, i_dim: usize, value: f64) {
        let idx = self.grad_index(i_var, i_dim);
        self.gradient[idx] = value;
    }

    /// Accumulate a directional contribution into the gradient.
    #[inline(always)]
    pub fn add_gradient(&mut self, i_var: usize, i_dim: usize, value: f64) {
        let idx = self.grad_index(i_var, i_dim);
        self.gradient[idx] += value;
    }

    /// Subtract a directional contribution from the gradient.
    #[inline(always)]
    pub fn subtract_gradient(&mut self, i_var: usize, i_dim: usize, value: f64) {
        let idx = self.grad_index(i_var, i_dim);
        self.gradient[idx] -= value;
    }

    /// Limiter value for one variable.
    #[inline(always)]
    pub fn limiter(&self, i_var: usize) -> f64 {
        debug_assert!(i_var < self.n_var);
        self.limiter[i_var]
    }

    /// Set the limiter for one variable.
    #[inline(always)]
    pub fn set_limiter(&mut self, i_var: usize, value: f64) {
        debug_assert!(i_var < self.n_var);
        self.limiter[i_var] = value;
    }

    /// Stencil maximum for the limiter computation.
    #[inline(always)]
    pub fn solution_max(&self, i_var: usize) -> f64 {
        debug_assert!(i_var < self.n_var);
        self.solution_max[i_var]
    }

    /// Set the stencil maximum.
    #[inline(always)]
    pub fn set_solution_max(&mut self, i_var: usize, value: f64) {
        debug_assert!(i_var < self.n_var);
        self.solution_max[i_var] = value;
    }

    /// Stencil minimum for the limiter computation.
    #[inline(always)]
    pub fn solution_min(&self, i_var: usize) -> f64 {
        debug_assert!(i_var < self.n_var);
        self.solution_min[i_var]
    }

    /// Set the stencil minimum.
    #[inline(always)]
    pub fn set_solution_min(&mut self, i_var: usize, value: f64) {
        debug_assert!(i_var < self.n_var);
        self.solution_min[i_var] = value;
    }

    // ------------------------------------------------------------------
    // Auxiliary variable and its gradient
    // ------------------------------------------------------------------

    /// Set the auxiliary scalar (the quantity whose gradient is wanted).
    #[inline(always)]
    pub fn set_aux_var(&mut self, value: f64) {
        self.aux_var = value;
    }

    /// Auxiliary scalar.
    #[inline(always)]
    pub fn aux_var(&self) -> f64 {
        self.aux_var
    }

    /// Zero the auxiliary-variable gradient.
    #[inline]
    pub fn set_aux_var_gradient_zero(&mut self) {
        self.aux_var_gradient = [0.0; 3];
    }

    /// Auxiliary-variable gradient component.
    #[inline(always)]
    pub fn aux_var_gradient(&self, i_dim: usize) -> f64 {
        debug_assert!(i_dim < self.n_dim);
        self.aux_var_gradient[i_dim]
    }

    /// Overwrite an auxiliary-gradient component.
    #[inline(always)]
    pub fn set_aux_var_gradient(&mut self, i_dim: usize, value: f64) {
        debug_assert!(i_dim < self.n_dim);
        self.aux_var_gradient[i_dim] = value;
    }

    /// Accumulate into the auxiliary gradient.
    #[inline(always)]
    pub fn add_aux_var_gradient(&mut self, i_dim: usize, value: f64) {
        debug_assert!(i_dim < self.n_dim);
        self.aux_var_gradient[i_dim] += value;
    }

    /// Subtract from the auxiliary gradient.
    #[inline(always)]
    pub fn subtract_aux_var_gradient(&mut self, i_dim: usize, value: f64) {
        debug_assert!(i_dim < self.n_dim);
        self.aux_var_gradient[i_dim] -= value;
    }

    // ------------------------------------------------------------------
    // Eigenvalue / time-step bookkeeping
    // ------------------------------------------------------------------

    /// Set the local time step.
    #[inline(always)]
    pub fn set_delta_time(&mut self, dt: f64) {
        self.delta_time = dt;
    }

    /// Local time step.
    #[inline(always)]
    pub fn delta_time(&self) -> f64 {
        self.delta_time
    }

    /// Set the maximum eigenvalue (zero phase of the sweep).
    #[inline(always)]
    pub fn set_max_lambda(&mut self, value: f64) {
        self.max_lambda = value;
    }

    /// Fold a candidate into the running maximum eigenvalue.
    #[inline(always)]
    pub fn add_max_lambda(&mut self, value: f64) {
        self.max_lambda = self.max_lambda.max(value);
    }

    /// Maximum eigenvalue.
    #[inline(always)]
    pub fn max_lambda(&self) -> f64 {
        self.max_lambda
    }

    /// Set the maximum inviscid eigenvalue.
    #[inline(always)]
    pub fn set_max_lambda_inv(&mut self, value: f64) {
        self.max_lambda_inv = value;
    }

    /// Fold a candidate into the running maximum inviscid eigenvalue.
    #[inline(always)]
    pub fn add_max_lambda_inv(&mut self, value: f64) {
        self.max_lambda_inv = self.max_lambda_inv.max(value);
    }

    /// Maximum inviscid eigenvalue.
    #[inline(always)]
    pub fn max_lambda_inv(&self) -> f64 {
        self.max_lambda_inv
    }

    /// Set the maximum viscous eigenvalue.
    #[inline(always)]
    pub fn set_max_lambda_visc(&mut self, value: f64) {
        self.max_lambda_visc = value;
    }

    /// Fold a candidate into the running maximum viscous eigenvalue.
    #[inline(always)]
    pub fn add_max_lambda_visc(&mut self, value: f64) {
        self.max_lambda_visc = self.max_lambda_visc.max(value);
    }

    /// Maximum viscous eigenvalue.
    #[inline(always)]
    pub fn max_lambda_visc(&self) -> f64 {
        self.max_lambda_visc
    }

    /// Set the spectral-radius accumulator.
    #[inline(always)]
    pub fn set_lambda(&mut self, value: f64) {
        self.lambda = value;
    }

    /// Accumulate a face contribution into the spectral radius.
    #[inline(always)]
    pub fn add_lambda(&mut self, value: f64) {
        self.lambda += value;
    }

    /// Spectral-radius accumulator.
    #[inline(always)]
    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    /// Set the pressure sensor.
    #[inline(always)]
    pub fn set_sensor(&mut self, value: f64) {
        self.sensor = value;
    }

    /// Pressure sensor.
    #[inline(always)]
    pub fn sensor(&self) -> f64 {
        self.sensor
    }

    // ------------------------------------------------------------------
    // Undivided Laplacian
    // ------------------------------------------------------------------

    /// Zero the undivided Laplacian.
    #[inline]
    pub fn set_und_laplacian_zero(&mut self) {
        self.und_laplacian.fill(0.0);
    }

    /// Overwrite one undivided-Laplacian entry.
    #[inline(always)]
    pub fn set_und_laplacian(&mut self, i_var: usize, value: f64) {
        debug_assert!(i_var < self.n_var);
        self.und_laplacian[i_var] = value;
    }

    /// Accumulate a neighbor second-difference contribution.
    #[inline]
    pub fn add_und_laplacian(&mut self, values: &[f64]) {
        debug_assert_eq!(values.len(), self.n_var);
        for (u, &v) in self.und_laplacian.iter_mut().zip(values) {
            *u += v;
        }
    }

    /// Subtract a neighbor second-difference contribution.
    #[inline]
    pub fn subtract_und_laplacian(&mut self, values: &[f64]) {
        debug_assert_eq!(values.len(), self.n_var);
        for (u, &v) in self.und_laplacian.iter_mut().zip(values) {
            *u -= v;
        }
    }

    /// Subtract from one undivided-Laplacian entry.
    #[inline(always)]
    pub fn subtract_und_laplacian_at(&mut self, i_var: usize, value: f64) {
        debug_assert!(i_var < self.n_var);
        self.und_laplacian[i_var] -= value;
    }

    /// Undivided Laplacian.
    #[inline(always)]
    pub fn und_laplacian(&self) -> &[f64] {
        &self.und_laplacian
    }

    /// One undivided-Laplacian entry.
    #[inline(always)]
    pub fn und_laplacian_at(&self, i_var: usize) -> f64 {
        debug_assert!(i_var < self.n_var);
        self.und_laplacian[i_var]
    }

    // ------------------------------------------------------------------
    // Residual smoothing and truncation error
    // ------------------------------------------------------------------

    /// Store the residual snapshot used by residual smoothing.
    #[inline]
    pub fn set_residual_old(&mut self, residual: &[f64]) {
        debug_assert_eq!(residual.len(), self.n_var);
        self.residual_old.copy_from_slice(residual);
    }

    /// Residual snapshot.
    #[inline(always)]
    pub fn residual_old(&self) -> &[f64] {
        &self.residual_old
    }

    /// Accumulate into the smoothed-residual sum.
    #[inline]
    pub fn add_residual_sum(&mut self, residual: &[f64]) {
        debug_assert_eq!(residual.len(), self.n_var);
        for (s, &r) in self.residual_sum.iter_mut().zip(residual) {
            *s += r;
        }
    }

    /// Zero the smoothed-residual sum.
    #[inline]
    pub fn set_residual_sum_zero(&mut self) {
        self.residual_sum.fill(0.0);
    }

    /// Smoothed-residual sum.
    #[inline(always)]
    pub fn residual_sum(&self) -> &[f64] {
        &self.residual_sum
    }

    /// One entry of the smoothed-residual sum.
    #[inline(always)]
    pub fn residual_sum_at(&self, i_var: usize) -> f64 {
        debug_assert!(i_var < self.n_var);
        self.residual_sum[i_var]
    }

    /// Accumulate into the multigrid truncation error.
    #[inline]
    pub fn add_res_trunc_error(&mut self, values: &[f64]) {
        debug_assert_eq!(values.len(), self.n_var);
        for (t, &v) in self.res_trunc_error.iter_mut().zip(values) {
            *t += v;
        }
    }

    /// Subtract from the multigrid truncation error.
    #[inline]
    pub fn subtract_res_trunc_error(&mut self, values: &[f64]) {
        debug_assert_eq!(values.len(), self.n_var);
        for (t, &v) in self.res_trunc_error.iter_mut().zip(values) {
            *t -= v;
        }
    }

    /// Zero the truncation error.
    #[inline]
    pub fn set_res_trunc_error_zero(&mut self) {
        self.res_trunc_error.fill(0.0);
    }

    /// Zero one truncation-error entry.
    #[inline(always)]
    pub fn set_res_trunc_error_zero_at(&mut self, i_var: usize) {
        debug_assert!(i_var < self.n_var);
        self.res_trunc_error[i_var] = 0.0;
    }

    /// Zero the momentum entries of the truncation error (flow layout).
    #[inline]
    pub fn set_vel_res_trunc_error_zero(&mut self) {
        for t in &mut self.res_trunc_error[1..=self.n_dim] {
            *t = 0.0;
        }
    }

    /// Zero the energy entry of the truncation error (flow layout).
    #[inline]
    pub fn set_energy_res_trunc_error_zero(&mut self) {
        let last = self.n_var - 1;
        self.res_trunc_error[last] = 0.0;
    }

    /// Truncation error.
    #[inline(always)]
    pub fn res_trunc_error(&self) -> &[f64] {
        &self.res_trunc_error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-12;

    fn state_3d(n_var: usize) -> PointState {
        PointState::new(3, n_var, false).unwrap()
    }

    #[test]
    fn test_construction() {
        let s = state_3d(5);
        assert_eq!(s.n_var(), 5);
        assert_eq!(s.n_dim(), 3);
        assert!(!s.has_dual_time());
        assert!(s.solution().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_construction_errors() {
        assert!(PointState::new(3, 0, false).is_err());
        assert!(PointState::new(1, 5, false).is_err());
        assert!(PointState::new(4, 5, false).is_err());
    }

    #[test]
    fn test_from_solution_seeds_all_levels() {
        let s = PointState::from_solution(2, &[1.0, 2.0, 3.0, 4.0], true).unwrap();
        assert_eq!(s.n_var(), 4);
        assert_eq!(s.solution(), &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(s.solution_old(), &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(s.solution_time_n().unwrap(), &[1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_add_solution() {
        let mut s = state_3d(5);
        s.set_solution_at(2, 1.0);
        s.add_solution(2, 0.5);
        assert!((s.solution_at(2) - 1.5).abs() < TOL);
    }

    #[test]
    fn test_clipped_update_bounds() {
        let mut s = state_3d(2);
        s.set_solution_at(0, 1.0);
        s.save_solution_old();

        s.add_clipped_solution(0, 100.0, 0.0, 5.0);
        assert!((s.solution_at(0) - 5.0).abs() < TOL);

        s.add_clipped_solution(0, -100.0, 0.0, 5.0);
        assert!(s.solution_at(0).abs() < TOL);

        // Always reads from the old snapshot, so repeated calls do not drift.
        s.add_clipped_solution(0, 0.5, 0.0, 5.0);
        s.add_clipped_solution(0, 0.5, 0.0, 5.0);
        assert!((s.solution_at(0) - 1.5).abs() < TOL);
    }

    #[test]
    fn test_conservative_update_degenerates_to_clipped() {
        let mut a = state_3d(2);
        let mut b = state_3d(2);
        for s in [&mut a, &mut b] {
            s.set_solution_at(1, 2.0);
            s.save_solution_old();
        }
        a.add_clipped_solution(1, 0.7, -10.0, 10.0);
        b.add_conservative_solution(1, 0.7, 1.0, 1.0, -10.0, 10.0);
        assert!((a.solution_at(1) - b.solution_at(1)).abs() < TOL);
    }

    #[test]
    fn test_conservative_update_rescales() {
        let mut s = state_3d(2);
        // nu_old = 3.0 carried by rho_old = 2.0; density doubles to 4.0.
        s.set_solution_at(0, 3.0);
        s.save_solution_old();
        s.add_conservative_solution(0, 0.0, 4.0, 2.0, 0.0, 100.0);
        assert!((s.solution_at(0) - 1.5).abs() < TOL);
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut s = state_3d(3);
        s.set_solution(&[1.0, 2.0, 3.0]);
        s.save_solution_old();
        s.set_solution(&[9.0, 9.0, 9.0]);
        s.restore_solution();
        assert_eq!(s.solution(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_dual_time_shift() {
        let mut s = PointState::new(3, 2, true).unwrap();
        s.set_solution(&[1.0, 1.0]);
        s.set_solution_time_n();
        s.set_solution(&[2.0, 2.0]);
        s.set_solution_time_n1();
        s.set_solution_time_n();
        assert_eq!(s.solution_time_n().unwrap(), &[2.0, 2.0]);
        assert_eq!(s.solution_time_n1().unwrap(), &[1.0, 1.0]);
    }

    #[test]
    fn test_no_dual_time_accessors() {
        let s = state_3d(2);
        assert!(s.solution_time_n().is_none());
        assert!(s.solution_time_n1().is_none());
    }

    #[test]
    fn test_gradient_two_phase() {
        let mut s = state_3d(4);
        s.set_gradient_zero();
        s.add_gradient(1, 0, 2.0);
        s.add_gradient(1, 0, 3.0);
        s.subtract_gradient(1, 2, 1.0);
        assert!((s.gradient(1, 0) - 5.0).abs() < TOL);
        assert!((s.gradient(1, 2) + 1.0).abs() < TOL);
        // Untouched entries stay zero (valid read after zero phase).
        assert!(s.gradient(0, 1).abs() < TOL);
        assert_eq!(s.gradient_row(1), &[5.0, 0.0, -1.0]);
    }

    #[test]
    fn test_max_lambda_is_running_max() {
        let mut s = state_3d(2);
        s.set_max_lambda(0.0);
        s.add_max_lambda(3.0);
        s.add_max_lambda(5.0);
        s.add_max_lambda(1.0);
        assert!((s.max_lambda() - 5.0).abs() < TOL);

        s.set_max_lambda_inv(0.0);
        s.add_max_lambda_inv(2.0);
        s.add_max_lambda_inv(7.0);
        assert!((s.max_lambda_inv() - 7.0).abs() < TOL);

        s.set_max_lambda_visc(0.0);
        s.add_max_lambda_visc(4.0);
        s.add_max_lambda_visc(4.0);
        assert!((s.max_lambda_visc() - 4.0).abs() < TOL);
    }

    #[test]
    fn test_lambda_accumulates() {
        let mut s = state_3d(2);
        s.set_lambda(0.0);
        s.add_lambda(1.5);
        s.add_lambda(2.5);
        assert!((s.lambda() - 4.0).abs() < TOL);
    }

    #[test]
    fn test_residual_bookkeeping() {
        let mut s = state_3d(2);
        s.set_residual_sum_zero();
        s.add_residual_sum(&[1.0, 2.0]);
        s.add_residual_sum(&[0.5, -1.0]);
        assert!((s.residual_sum_at(0) - 1.5).abs() < TOL);
        assert!((s.residual_sum_at(1) - 1.0).abs() < TOL);

        s.set_residual_old(&[3.0, 4.0]);
        assert_eq!(s.residual_old(), &[3.0, 4.0]);
    }

    #[test]
    fn test_truncation_error_ops() {
        let mut s = state_3d(5);
        s.set_res_trunc_error_zero();
        s.add_res_trunc_error(&[1.0; 5]);
        s.subtract_res_trunc_error(&[0.25; 5]);
        assert!((s.res_trunc_error()[0] - 0.75).abs() < TOL);

        s.set_vel_res_trunc_error_zero();
        assert!(s.res_trunc_error()[1].abs() < TOL);
        assert!(s.res_trunc_error()[3].abs() < TOL);
        assert!((s.res_trunc_error()[0] - 0.75).abs() < TOL);

        s.set_energy_res_trunc_error_zero();
        assert!(s.res_trunc_error()[4].abs() < TOL);

        s.set_res_trunc_error_zero_at(0);
        assert!(s.res_trunc_error()[0].abs() < TOL);
    }

    #[test]
    fn test_und_laplacian_ops() {
        let mut s = state_3d(3);
        s.set_und_laplacian_zero();
        s.add_und_laplacian(&[1.0, 2.0, 3.0]);
        s.subtract_und_laplacian(&[0.5, 0.5, 0.5]);
        s.subtract_und_laplacian_at(2, 1.0);
        assert!((s.und_laplacian_at(0) - 0.5).abs() < TOL);
        assert!((s.und_laplacian_at(2) - 1.5).abs() < TOL);
    }

    #[test]
    fn test_vel_solution_vector_uses_density() {
        let mut s = state_3d(5);
        s.set_solution(&[2.0, 1.0, 1.0, 1.0, 10.0]);
        s.set_vel_solution_vector(&[3.0, 0.0, -1.0]);
        assert!((s.solution_at(1) - 6.0).abs() < TOL);
        assert!(s.solution_at(2).abs() < TOL);
        assert!((s.solution_at(3) + 2.0).abs() < TOL);

        s.set_vel_solution_zero();
        assert!(s.solution_at(1).abs() < TOL);
    }

    #[test]
    fn test_aux_var_gradient() {
        let mut s = state_3d(2);
        s.set_aux_var(4.0);
        assert!((s.aux_var() - 4.0).abs() < TOL);
        s.set_aux_var_gradient_zero();
        s.add_aux_var_gradient(0, 1.0);
        s.add_aux_var_gradient(0, 1.0);
        s.subtract_aux_var_gradient(1, 0.5);
        assert!((s.aux_var_gradient(0) - 2.0).abs() < TOL);
        assert!((s.aux_var_gradient(1) + 0.5).abs() < TOL);
    }

    #[test]
    fn test_delta_time_and_sensor() {
        let mut s = state_3d(2);
        s.set_delta_time(1e-3);
        s.set_sensor(0.4);
        assert!((s.delta_time() - 1e-3).abs() < TOL);
        assert!((s.sensor() - 0.4).abs() < TOL);
    }
}
