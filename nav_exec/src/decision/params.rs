//! Parameters structure for the decision engine

use serde::Deserialize;

/// Parameters for the decision engine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DecisionParams {
    /// Heading error to the tracked waypoint above which the robot turns on the spot when at an
    /// intersection.
    ///
    /// Units: radians
    pub turn_angle_threshold_rad: f64,

    /// A turn is finished once the heading is closer than this to the turn's target heading.
    ///
    /// Units: radians
    pub finish_turn_angle_threshold_rad: f64,
}

impl Default for DecisionParams {
    fn default() -> Self {
        Self {
            turn_angle_threshold_rad: 35f64.to_radians(),
            finish_turn_angle_threshold_rad: 5f64.to_radians(),
        }
    }
}
