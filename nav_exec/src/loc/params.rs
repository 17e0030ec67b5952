//! Parameters structure for the pose estimator

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Parameters for localisation.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LocParams {
    /// The robot is considered to be at a node when it is strictly closer than this.
    ///
    /// Units: centimeters
    pub distance_threshold_cm: f64,

    /// Distance between the two drive wheels.
    ///
    /// Units: centimeters
    pub wheel_dist_cm: f64,

    /// Readings of the range finder below this count towards an obstacle detection.
    ///
    /// Units: centimeters
    pub obstacle_threshold_cm: f64,

    /// Number of consecutive close readings needed before an obstacle is reported.
    pub obstacle_detected_cycle_threshold: u32,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for LocParams {
    fn default() -> Self {
        Self {
            distance_threshold_cm: 20.0,
            wheel_dist_cm: 15.2,
            obstacle_threshold_cm: 50.0,
            obstacle_detected_cycle_threshold: 10,
        }
    }
}
