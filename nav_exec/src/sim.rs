//! # Simulator
//!
//! A kinematic differential drive robot standing in for the real hardware. It turns commands into
//! wheel speeds, integrates its true pose, and produces encoder and range finder readings the same
//! way the real sensors do: the encoders count the distance each wheel rolled without telling
//! which way.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::eqpt::{SensorSample, WheelDems};
use log::trace;
use serde::Deserialize;
use util::maths::wrap_2pi;

use crate::{
    decision::{Command, TurnDirection},
    eqpt::{Actuator, SensorSource},
    loc::{LineDetector, Pose},
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Parameters of the simulated robot.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimParams {
    /// Wheel speed when driving forwards.
    ///
    /// Units: centimeters/second
    pub forward_speed_cms: f64,

    /// Wheel speed when turning on the spot.
    ///
    /// Units: centimeters/second
    pub turn_speed_cms: f64,

    /// Distance reported by the range finder.
    ///
    /// Units: centimeters
    pub obstacle_distance_cm: f64,

    /// Line angle reported by the simulated camera.
    ///
    /// Units: radians
    pub line_angle_rad: f64,
}

/// A simulated robot.
#[derive(Debug, Clone)]
pub struct SimRobot {
    params: SimParams,

    /// Units: centimeters
    wheel_dist_cm: f64,

    /// True pose of the robot.
    pose: Pose,

    dems: WheelDems,

    /// Units: centimeters
    right_encoder_cm: f64,

    /// Units: centimeters
    left_encoder_cm: f64,

    obstacle_distance_cm: f64,
}

/// A camera which always sees the line at the same angle.
#[derive(Debug, Clone, Copy)]
pub struct SimCamera {
    pub line_angle_rad: Option<f64>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for SimParams {
    fn default() -> Self {
        Self {
            forward_speed_cms: 10.0,
            turn_speed_cms: 5.0,
            obstacle_distance_cm: 999.0,
            line_angle_rad: 0.0,
        }
    }
}

impl SimRobot {
    pub fn new(params: SimParams, wheel_dist_cm: f64, initial: Pose) -> Self {
        let obstacle_distance_cm = params.obstacle_distance_cm;

        Self {
            params,
            wheel_dist_cm,
            pose: initial,
            dems: WheelDems::default(),
            right_encoder_cm: 0.0,
            left_encoder_cm: 0.0,
            obstacle_distance_cm,
        }
    }

    /// Advance the simulation by `dt_s` seconds with the current wheel demands.
    pub fn step(&mut self, dt_s: f64) {
        if !(dt_s > 0.0) {
            return;
        }

        let right = self.dems.right_cms;
        let left = self.dems.left_cms;

        self.right_encoder_cm += right.abs() * dt_s;
        self.left_encoder_cm += left.abs() * dt_s;

        let linear = 0.5 * (right + left);
        let angular = (right - left) / self.wheel_dist_cm;

        let heading = wrap_2pi(self.pose.heading_rad + angular * dt_s);
        self.pose = Pose {
            x_cm: self.pose.x_cm + linear * dt_s * heading.cos(),
            y_cm: self.pose.y_cm + linear * dt_s * heading.sin(),
            heading_rad: heading,
        };

        trace!(
            "Sim pose ({:.2}, {:.2}, {:.3} rad)",
            self.pose.x_cm,
            self.pose.y_cm,
            self.pose.heading_rad
        );
    }

    /// Place an obstacle at the given distance in front of the robot.
    pub fn set_obstacle_distance(&mut self, distance_cm: f64) {
        self.obstacle_distance_cm = distance_cm;
    }

    /// The true pose of the robot.
    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn dems(&self) -> WheelDems {
        self.dems
    }

    /// A camera seeing the line at the angle given in the parameters.
    pub fn camera(&self) -> SimCamera {
        SimCamera {
            line_angle_rad: Some(self.params.line_angle_rad),
        }
    }
}

impl SensorSource for SimRobot {
    fn collect(&mut self) -> SensorSample {
        SensorSample {
            right_encoder_cm: self.right_encoder_cm,
            left_encoder_cm: self.left_encoder_cm,
            obstacle_distance_cm: self.obstacle_distance_cm,
        }
    }
}

impl Actuator for SimRobot {
    fn execute(&mut self, cmd: &Command) {
        let fwd = self.params.forward_speed_cms;
        let turn = self.params.turn_speed_cms;

        let (left_cms, right_cms) = match cmd {
            Command::Stop => (0.0, 0.0),
            Command::Forward { .. } => (fwd, fwd),
            Command::Turn {
                direction: TurnDirection::Left,
            }
            | Command::HalfTurn => (-turn, turn),
            Command::Turn {
                direction: TurnDirection::Right,
            } => (turn, -turn),
        };

        self.dems = WheelDems {
            left_cms,
            right_cms,
        };
    }
}

impl LineDetector for SimCamera {
    fn detect_line_angle(&mut self) -> Option<f64> {
        self.line_angle_rad
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
