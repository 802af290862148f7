//! Baseline/restart passthrough state.
//!
//! Holds a solution vector loaded from persisted output so the output
//! pipeline can treat restart data like any other point state. No closure
//! behavior: no primitives, no equation of state.

use crate::error::StateError;
use crate::state::PointState;

/// Minimal passthrough state for restart solutions.
#[derive(Clone, Debug, PartialEq)]
pub struct BaselineState {
    base: PointState,
}

impl BaselineState {
    /// Create from a solution vector read from a restart file.
    pub fn from_solution(n_dim: usize, solution: &[f64]) -> Result<Self, StateError> {
        Ok(Self {
            base: PointState::from_solution(n_dim, solution, false)?,
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
}
