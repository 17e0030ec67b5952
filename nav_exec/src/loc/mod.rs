//! # Localisation module
//!
//! This module provides the [`PoseEstimator`], which keeps track of where the robot is on the map.
//!
//! The pose is dead-reckoned from the wheel encoders each control cycle, then snapped onto the map
//! segment the robot is following, since the robot can only ever be on a line. The estimator also
//! keeps track of the map node the robot last passed, debounces the obstacle range finder, and
//! propagates the camera line angle between frames.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod estimator;
mod line_angle;
mod obstacle;
mod params;

// ------------------------------------------------------------------------------------------------
// EXPORTS
// ------------------------------------------------------------------------------------------------

pub use estimator::{FreezeReason, MotionUpdate, PoseEstimator};
pub use line_angle::{LineAngle, LineDetector, SharedLineAngle, VisionHandle, VisionUpdate};
pub use obstacle::ObstacleDebounce;
pub use params::LocParams;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use util::maths::wrap_2pi;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// The pose (position and heading in the map frame) of the robot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Units: centimeters
    pub x_cm: f64,

    /// Units: centimeters
    pub y_cm: f64,

    /// Angle from the map's +X axis, counter-clockwise positive, in the range [0, 2pi).
    ///
    /// Units: radians
    pub heading_rad: f64,
}

/// Errors which prevent the estimator being created.
#[derive(Debug, thiserror::Error)]
pub enum LocError {
    #[error("The map has no nodes to localise against")]
    EmptyMap,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Pose {
    /// Create a new pose, wrapping the heading into [0, 2pi).
    pub fn new(x_cm: f64, y_cm: f64, heading_rad: f64) -> Self {
        Self {
            x_cm,
            y_cm,
            heading_rad: wrap_2pi(heading_rad),
        }
    }

    pub fn position(&self) -> Point2<f64> {
        Point2::new(self.x_cm, self.y_cm)
    }

    /// Angle from this pose's position to `target`, measured like the heading.
    ///
    /// Units: radians
    pub fn bearing_to(&self, target: &Point2<f64>) -> f64 {
        wrap_2pi((target.y - self.y_cm).atan2(target.x - self.x_cm))
    }

    /// True if all fields are finite.
    pub fn is_finite(&self) -> bool {
        self.x_cm.is_finite() && self.y_cm.is_finite() && self.heading_rad.is_finite()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_pose() {
        let p = Pose::new(0.0, 0.0, -FRAC_PI_2);
        assert!((p.heading_rad - 3.0 * FRAC_PI_2).abs() < 1e-12);
        assert!((p.bearing_to(&Point2::new(-10.0, 0.0)) - PI).abs() < 1e-12);
        assert!((p.bearing_to(&Point2::new(0.0, -5.0)) - 3.0 * FRAC_PI_2).abs() < 1e-12);
        assert!(!Pose::new(std::f64::NAN, 0.0, 0.0).is_finite());
    }
}
