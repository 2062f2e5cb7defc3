//! Ready-made region setups.

use std::sync::Arc;

use kinoplan_kernel::state::KinematicState;

use crate::config::PlannerConfig;
use crate::error::PlanError;

/// Clearance above a floor along one axis.
///
/// States at or above `clearance` move freely. Below it the machine may only
/// travel along `axis`: every other axis must have zero velocity and
/// acceleration. Nothing may go below `floor`.
///
/// This is the usual setup for a tool that must lift clear of a work surface
/// before moving laterally.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearancePlane {
    pub axis: usize,
    pub clearance: f64,
    pub floor: f64,
}

impl ClearancePlane {
    #[must_use]
    pub fn new(axis: usize, clearance: f64, floor: f64) -> Self {
        Self {
            axis,
            clearance,
            floor,
        }
    }

    /// Below the clearance height.
    #[must_use]
    pub fn is_constrained(&self, state: &KinematicState) -> bool {
        state.position()[self.axis] < self.clearance
    }

    /// Above the floor, and moving only along the clearance axis while below
    /// the clearance height.
    #[must_use]
    pub fn admits(&self, state: &KinematicState) -> bool {
        let height = state.position()[self.axis];
        if height < self.floor {
            return false;
        }
        if height >= self.clearance {
            return true;
        }
        let lateral = |xs: &[f64]| {
            xs.iter()
                .enumerate()
                .any(|(i, x)| i != self.axis && *x != 0.0)
        };
        !lateral(state.velocity()) && !lateral(state.acceleration())
    }

    /// `config` with this plane's region and feasibility predicates.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::InvalidConfig`] if `axis` is out of range or the
    /// floor lies above the clearance height.
    pub fn apply(self, config: PlannerConfig) -> Result<PlannerConfig, PlanError> {
        if self.axis >= config.dimensions {
            return Err(PlanError::InvalidConfig {
                detail: format!(
                    "clearance axis {} out of range for {} axes",
                    self.axis, config.dimensions
                ),
            });
        }
        let ordered = self.floor <= self.clearance;
        if !ordered {
            return Err(PlanError::InvalidConfig {
                detail: format!(
                    "floor {} lies above clearance {}",
                    self.floor, self.clearance
                ),
            });
        }
        Ok(PlannerConfig {
            is_constrained: Arc::new(move |state: &KinematicState| self.is_constrained(state)),
            constrain: Arc::new(move |state: &KinematicState| self.admits(state)),
            ..config
        })
    }
}
