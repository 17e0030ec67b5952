//! # Navigation Executable Parameters
//!
//! This module provides the parameters for the navigation executable, loaded from `nav.toml`.
//! Every section is optional, missing values take the robot's standard values.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;

use crate::{decision::DecisionParams, loc::LocParams, sim::SimParams};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NavParams {
    pub exec: ExecParams,
    pub loc: LocParams,
    pub decision: DecisionParams,
    pub sim: SimParams,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExecParams {
    /// Target period of one control cycle.
    ///
    /// Units: seconds
    pub cycle_period_s: f64,

    /// Target period of the vision loop.
    ///
    /// Units: seconds
    pub vision_period_s: f64,

    /// The node to navigate to.
    pub target_node: u32,

    /// Initial pose of the robot, `[x_cm, y_cm, heading_rad]`.
    pub initial_pose: [f64; 3],

    /// If true navigation starts straight away, otherwise it waits for a run command.
    pub run_on_start: bool,

    /// Number of consecutive cycle overruns after which a warning is escalated to an error.
    pub max_consec_cycle_overruns: u64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for ExecParams {
    fn default() -> Self {
        Self {
            cycle_period_s: 0.12,
            vision_period_s: 0.05,
            target_node: 0,
            initial_pose: [0.0, 0.0, 0.0],
            run_on_start: true,
            max_consec_cycle_overruns: 10,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_partial_params() {
        let p: NavParams = util::params::from_str(
            r#"
            [exec]
            target_node = 2

            [loc]
            wheel_dist_cm = 16.0
            "#,
        )
        .unwrap();

        assert_eq!(p.exec.target_node, 2);
        assert_eq!(p.exec.cycle_period_s, 0.12);
        assert_eq!(p.loc.wheel_dist_cm, 16.0);
        assert_eq!(p.loc.distance_threshold_cm, 20.0);
        assert_eq!(p.loc.obstacle_detected_cycle_threshold, 10);
        assert_eq!(p.sim.forward_speed_cms, 10.0);
    }

    #[test]
    fn test_shipped_params() {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../params/nav.toml");
        let p: NavParams = util::params::load_from_path(path).unwrap();

        assert_eq!(p.exec.target_node, 2);
        assert!((p.decision.turn_angle_threshold_rad - 35f64.to_radians()).abs() < 1e-12);
        assert!((p.decision.finish_turn_angle_threshold_rad - 5f64.to_radians()).abs() < 1e-12);
    }
}
