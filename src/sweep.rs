//! Whole-field sweeps over point states.
//!
//! Each point is exclusively owned, so sweeping a field of states is
//! embarrassingly parallel; the `parallel` feature provides rayon twins of
//! the serial entry points. The only ordering requirement carried by this
//! crate is the caller's: finish the zero/accumulate phases of a gradient
//! pass across *all* points before reading any gradient.

use crate::constants::FlowConstants;
use crate::variant::PointVariant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Re-derive primitives for every point after a solution update.
///
/// Returns the number of points whose state came out non-realizable; the
/// caller decides how to recover (clip, reject the iteration, ...).
pub fn recompute_primitives(points: &mut [PointVariant], constants: &FlowConstants) -> usize {
    points
        .iter_mut()
        .map(|p| p.recompute_primitives(constants))
        .filter(|ok| !ok)
        .count()
}

/// Parallel version of [`recompute_primitives`].
#[cfg(feature = "parallel")]
pub fn recompute_primitives_parallel(
    points: &mut [PointVariant],
    constants: &FlowConstants,
) -> usize {
    points
        .par_iter_mut()
        .map(|p| p.recompute_primitives(constants))
        .filter(|ok| !ok)
        .count()
}

/// Zero the gradient and limiter-support buffers of every point (the zero
/// phase of the two-phase accumulation protocol).
pub fn set_gradients_zero(points: &mut [PointVariant]) {
    for p in points.iter_mut() {
        p.base_mut().set_gradient_zero();
        if let Some(c) = p.as_compressible_mut() {
            c.set_primitive_gradient_zero();
        }
    }
}

/// Parallel version of [`set_gradients_zero`].
#[cfg(feature = "parallel")]
pub fn set_gradients_zero_parallel(points: &mut [PointVariant]) {
    points.par_iter_mut().for_each(|p| {
        p.base_mut().set_gradient_zero();
        if let Some(c) = p.as_compressible_mut() {
            c.set_primitive_gradient_zero();
        }
    });
}

/// Snapshot `solution -> solution_old` on every point (start of a stage).
pub fn save_solutions_old(points: &mut [PointVariant]) {
    for p in points.iter_mut() {
        p.base_mut().save_solution_old();
    }
}

/// Parallel version of [`save_solutions_old`].
#[cfg(feature = "parallel")]
pub fn save_solutions_old_parallel(points: &mut [PointVariant]) {
    points.par_iter_mut().for_each(|p| p.base_mut().save_solution_old());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::closure::CompressibleState;

    fn field(n: usize) -> Vec<PointVariant> {
        (0..n)
            .map(|i| {
                let vel = [0.1 * i as f64, 0.0, 0.0];
                PointVariant::Euler(
                    CompressibleState::from_flow(3, 1.0, &vel, 10.0, false).unwrap(),
                )
            })
            .collect()
    }

    #[test]
    fn test_recompute_counts_failures() {
        let constants = FlowConstants::air(3).unwrap();
        let mut points = field(4);
        // Make one point non-realizable: kinetic energy above total energy.
        points[2]
            .as_compressible_mut()
            .unwrap()
            .base_mut()
            .set_solution_at(1, 100.0);
        assert_eq!(recompute_primitives(&mut points, &constants), 1);
    }

    #[test]
    fn test_zero_phase_clears_all_points() {
        let mut points = field(3);
        for p in points.iter_mut() {
            p.base_mut().add_gradient(0, 0, 1.0);
            p.as_compressible_mut().unwrap().add_primitive_gradient(0, 0, 1.0);
        }
        set_gradients_zero(&mut points);
        for p in &points {
            assert_eq!(p.base().gradient(0, 0), 0.0);
            assert_eq!(p.as_compressible().unwrap().primitive_gradient(0, 0), 0.0);
        }
    }

    #[test]
    fn test_save_solutions_old() {
        let mut points = field(2);
        points[0].base_mut().set_solution_at(0, 9.0);
        save_solutions_old(&mut points);
        assert_eq!(points[0].base().solution_old_at(0), 9.0);
    }
}
