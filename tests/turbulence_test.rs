//! Integration test for the turbulence closures coupled to a viscous flow
//! state, mimicking one RANS update: transport-scalar update, blending
//! evaluation, eddy-viscosity push into the mean flow.

use compflow::{FlowConstants, SstConstants, TurbSstState, ViscousState};

const TOL: f64 = 1e-12;

#[test]
fn test_rans_coupling_cycle() {
    let constants = FlowConstants::air(2).unwrap();
    let mut flow = ViscousState::from_flow(2, 1.2, &[10.0, 0.0], 300000.0, false).unwrap();
    let mut turb = TurbSstState::new(2, 0.5, 1000.0, 0.0, constants.sst, false).unwrap();

    // Mean-flow primitives and molecular viscosity first.
    assert!(flow.flow_mut().set_primitive_vars(&constants.gas));
    flow.set_laminar_viscosity(&constants.viscosity);
    let mu_lam = flow.laminar_viscosity();
    assert!(mu_lam > 0.0);

    // Blending from local flow data at a near-wall point.
    turb.set_blending_func(mu_lam, 1e-4, flow.flow().density());
    assert!(turb.f1_blending() > 0.9);

    // The turbulence solver computes mu_t and pushes it into the flow state.
    let mu_t = flow.flow().density() * turb.kine() / turb.omega();
    turb.set_mu_t(mu_t);
    flow.set_eddy_viscosity(mu_t);
    assert!((flow.effective_viscosity() - (mu_lam + mu_t)).abs() < TOL);

    // RANS-aware recompute folds k into the pressure.
    let p_no_k = flow.flow().pressure();
    assert!(flow.set_primitive_vars(mu_t, turb.kine(), &constants.gas));
    assert!(flow.flow().pressure() < p_no_k);
}

#[test]
fn test_positivity_constrained_turbulence_update() {
    let mut turb = TurbSstState::new(2, 1.0, 100.0, 0.0, SstConstants::default(), false).unwrap();
    turb.base_mut().save_solution_old();

    // A large negative k increment must clip at the lower bound instead of
    // going negative.
    turb.base_mut().add_clipped_solution(0, -50.0, 1e-10, 1e10);
    assert!((turb.kine() - 1e-10).abs() < 1e-24);

    // Density-weighted update preserves rho*omega when the carrier density
    // changes between sub-iterations.
    turb.base_mut()
        .add_conservative_solution(1, 0.0, 2.0, 1.0, 0.0, 1e10);
    assert!((turb.omega() - 50.0).abs() < TOL);
}

#[test]
fn test_blending_consistency_with_coefficient_tables() {
    // A blended coefficient must land between its inner and outer values.
    let c = SstConstants::default();
    let mut turb = TurbSstState::new(2, 0.3, 200.0, 0.0, c, false).unwrap();
    turb.set_blending_func(1.8e-5, 0.01, 1.0);
    let f1 = turb.f1_blending();
    let beta = SstConstants::blend(f1, c.beta_1, c.beta_2);
    assert!(beta <= c.beta_1.max(c.beta_2) + TOL);
    assert!(beta >= c.beta_1.min(c.beta_2) - TOL);
}
