//! # Equipment interfaces
//!
//! Seams between the navigation core and the robot's hardware (or the simulator standing in for
//! it).

use comms_if::eqpt::SensorSample;

use crate::decision::Command;

/// Provides the sensor readings for each control cycle.
pub trait SensorSource {
    fn collect(&mut self) -> SensorSample;
}

/// Drives the wheels according to the latest command.
pub trait Actuator {
    fn execute(&mut self, cmd: &Command);
}
