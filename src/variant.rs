//! Configuration-time selection of the active physics variant.
//!
//! The solver decides once, at setup, which closure each point carries;
//! after that the hot update loops match on the variant directly instead of
//! paying virtual dispatch per call. Components that need a capability the
//! active variant does not provide get `None` from the `as_*` accessors and
//! must handle it explicitly; there are no silently succeeding defaults.

use crate::closure::{BaselineState, CompressibleState, TurbSaState, TurbSstState, ViscousState};
use crate::constants::FlowConstants;
use crate::state::PointState;

/// Per-point state tagged with its physics variant.
#[derive(Clone, Debug, PartialEq)]
pub enum PointVariant {
    /// Restart passthrough, no closure behavior.
    Baseline(BaselineState),
    /// Inviscid compressible flow.
    Euler(CompressibleState),
    /// Viscous compressible flow.
    NavierStokes(ViscousState),
    /// One-equation (Spalart-Allmaras) turbulence transport.
    TurbSa(TurbSaState),
    /// Two-equation (Menter SST) turbulence transport.
    TurbSst(TurbSstState),
}

impl PointVariant {
    /// The base state container (total: every variant has one).
    pub fn base(&self) -> &PointState {
        match self {
            Self::Baseline(s) => s.base(),
            Self::Euler(s) => s.base(),
            Self::NavierStokes(s) => s.base(),
            Self::TurbSa(s) => s.base(),
            Self::TurbSst(s) => s.base(),
        }
    }

    /// The base state container, mutable.
    pub fn base_mut(&mut self) -> &mut PointState {
        match self {
            Self::Baseline(s) => s.base_mut(),
            Self::Euler(s) => s.base_mut(),
            Self::NavierStokes(s) => s.base_mut(),
            Self::TurbSa(s) => s.base_mut(),
            Self::TurbSst(s) => s.base_mut(),
        }
    }

    /// Euler closure, if the variant carries one (Euler or Navier-Stokes).
    pub fn as_compressible(&self) -> Option<&CompressibleState> {
        match self {
            Self::Euler(s) => Some(s),
            Self::NavierStokes(s) => Some(s.flow()),
            _ => None,
        }
    }

    /// Euler closure, mutable.
    pub fn as_compressible_mut(&mut self) -> Option<&mut CompressibleState> {
        match self {
            Self::Euler(s) => Some(s),
            Self::NavierStokes(s) => Some(s.flow_mut()),
            _ => None,
        }
    }

    /// Viscous closure, if active.
    pub fn as_viscous(&self) -> Option<&ViscousState> {
        match self {
            Self::NavierStokes(s) => Some(s),
            _ => None,
        }
    }

    /// Viscous closure, mutable.
    pub fn as_viscous_mut(&mut self) -> Option<&mut ViscousState> {
        match self {
            Self::NavierStokes(s) => Some(s),
            _ => None,
        }
    }

    /// SST closure, if active.
    pub fn as_turb_sst(&self) -> Option<&TurbSstState> {
        match self {
            Self::TurbSst(s) => Some(s),
            _ => None,
        }
    }

    /// SST closure, mutable.
    pub fn as_turb_sst_mut(&mut self) -> Option<&mut TurbSstState> {
        match self {
            Self::TurbSst(s) => Some(s),
            _ => None,
        }
    }

    /// SA closure, if active.
    pub fn as_turb_sa(&self) -> Option<&TurbSaState> {
        match self {
            Self::TurbSa(s) => Some(s),
            _ => None,
        }
    }

    /// SA closure, mutable.
    pub fn as_turb_sa_mut(&mut self) -> Option<&mut TurbSaState> {
        match self {
            Self::TurbSa(s) => Some(s),
            _ => None,
        }
    }

    /// Re-derive the primitive quantities after a solution update.
    ///
    /// Returns the realizability flag; variants without equation-of-state
    /// work (baseline, turbulence transport) report `true`.
    pub fn recompute_primitives(&mut self, constants: &FlowConstants) -> bool {
        match self {
            Self::Baseline(_) | Self::TurbSa(_) | Self::TurbSst(_) => true,
            Self::Euler(s) => s.set_primitive_vars(&constants.gas),
            Self::NavierStokes(s) => {
                let ok = s.flow_mut().set_primitive_vars(&constants.gas);
                s.set_laminar_viscosity(&constants.viscosity);
                ok
            }
        }
    }
}
