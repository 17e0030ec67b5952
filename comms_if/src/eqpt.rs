//! # Equipment Interface
//!
//! This module defines the data which is exchanged with the robot's equipment: the wheel
//! encoders and ultrasonic range finder on the input side, and wheel drive demands on the output
//! side.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Serialize, Deserialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// One control cycle's worth of sensor readings.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Default)]
pub struct SensorSample {
    /// Cumulative distance rolled by the right wheel.
    ///
    /// The encoder cannot tell direction, so this only ever grows.
    ///
    /// Units: centimeters
    pub right_encoder_cm: f64,

    /// Cumulative distance rolled by the left wheel.
    ///
    /// Units: centimeters
    pub left_encoder_cm: f64,

    /// Distance to the closest obstacle in front of the robot.
    ///
    /// Units: centimeters
    pub obstacle_distance_cm: f64,
}

/// Rotation direction demanded of each wheel by the last command.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct WheelDirs {
    pub left: WheelDir,
    pub right: WheelDir,
}

/// Wheel drive demands in linear wheel speed.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Default)]
pub struct WheelDems {
    /// Units: centimeters/second, positive forwards
    pub left_cms: f64,

    /// Units: centimeters/second, positive forwards
    pub right_cms: f64,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Rotation direction of a single wheel.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub enum WheelDir {
    Idle,
    Forward,
    Reverse,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for WheelDir {
    fn default() -> Self {
        WheelDir::Idle
    }
}

impl WheelDir {
    /// The sign to apply to an (unsigned) encoder delta for this direction.
    pub fn sign(&self) -> f64 {
        match self {
            WheelDir::Idle => 0.0,
            WheelDir::Forward => 1.0,
            WheelDir::Reverse => -1.0,
        }
    }

    /// Direction of a signed wheel speed demand.
    pub fn from_speed(speed: f64) -> Self {
        if speed > 0.0 {
            WheelDir::Forward
        } else if speed < 0.0 {
            WheelDir::Reverse
        } else {
            WheelDir::Idle
        }
    }
}

impl WheelDems {
    /// The directions the wheels will turn in when executing these demands.
    pub fn dirs(&self) -> WheelDirs {
        WheelDirs {
            left: WheelDir::from_speed(self.left_cms),
            right: WheelDir::from_speed(self.right_cms),
        }
    }
}

impl SensorSample {
    /// True if both encoder readings are finite, non-negative numbers.
    pub fn encoders_valid(&self) -> bool {
        is_valid_reading(self.right_encoder_cm) && is_valid_reading(self.left_encoder_cm)
    }

    /// True if the obstacle distance is a finite, non-negative number.
    pub fn obstacle_distance_valid(&self) -> bool {
        is_valid_reading(self.obstacle_distance_cm)
    }
}

fn is_valid_reading(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_wheel_dirs() {
        let dems = WheelDems { left_cms: -4.0, right_cms: 4.0 };
        assert_eq!(dems.dirs(), WheelDirs { left: WheelDir::Reverse, right: WheelDir::Forward });
        assert_eq!(WheelDems::default().dirs(), WheelDirs::default());
        assert_eq!(WheelDir::Reverse.sign(), -1.0);
        assert_eq!(WheelDir::Idle.sign(), 0.0);
    }

    #[test]
    fn test_sample_validity() {
        let mut sample = SensorSample {
            right_encoder_cm: 10.0,
            left_encoder_cm: 12.0,
            obstacle_distance_cm: 80.0,
        };
        assert!(sample.encoders_valid());
        assert!(sample.obstacle_distance_valid());

        sample.left_encoder_cm = std::f64::NAN;
        assert!(!sample.encoders_valid());
        assert!(sample.obstacle_distance_valid());

        sample.left_encoder_cm = 12.0;
        sample.obstacle_distance_cm = -1.0;
        assert!(sample.encoders_valid());
        assert!(!sample.obstacle_distance_valid());
    }
}
