//! # Line angle
//!
//! The angle of the followed line in the camera image is the only piece of state written by both
//! the control cycle (which dead-reckons it between frames) and the vision stream (which measures
//! it). It lives behind a single mutex, held only for the read or write of the pair.
//!
//! The angle is measured in the camera frame, so it has the opposite sign to a rotation of the
//! robot in the map frame.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::sync::{Arc, Mutex, MutexGuard};

use log::{trace, warn};
use serde::Serialize;

use crate::clock::{Clock, ClockId};

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Captures a camera frame and extracts the angle of the line in it.
pub trait LineDetector: Send {
    /// Angle of the line relative to the camera's forward axis, or `None` if no line is visible.
    ///
    /// Units: radians
    fn detect_line_angle(&mut self) -> Option<f64>;
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Current and previous estimate of the line angle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LineAngle {
    /// Units: radians
    pub current_rad: f64,

    /// Units: radians
    pub previous_rad: f64,
}

/// Shared handle to the line angle pair.
#[derive(Debug, Clone, Default)]
pub struct SharedLineAngle(Arc<Mutex<LineAngle>>);

/// The vision stream's side of the pose estimator.
///
/// Owns the line detector and its own clock cursor, and can be moved onto the vision thread.
pub struct VisionHandle<D: LineDetector> {
    clock: Arc<Clock>,
    clock_id: ClockId,
    line_angle: SharedLineAngle,
    detector: D,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Result of one vision update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VisionUpdate {
    /// A new line angle was stored.
    Updated { line_angle_rad: f64, dt_s: f64 },

    /// No line could be seen, the previous angle is kept.
    NoLine,

    /// The detector produced a non-finite angle, which was discarded.
    Invalid(f64),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SharedLineAngle {
    /// Copy of the current pair.
    pub fn get(&self) -> LineAngle {
        *self.lock()
    }

    /// Replace the current angle, keeping the old one as the previous.
    pub fn set(&self, angle_rad: f64) {
        let mut guard = self.lock();
        guard.previous_rad = guard.current_rad;
        guard.current_rad = angle_rad;
    }

    /// Propagate the angle through a rotation of the robot in the map frame.
    pub fn rotate(&self, robot_rotation_rad: f64) {
        let mut guard = self.lock();
        guard.previous_rad = guard.current_rad;
        guard.current_rad -= robot_rotation_rad;
    }

    fn lock(&self) -> MutexGuard<'_, LineAngle> {
        // Two plain floats, a panic while holding the lock cannot tear them.
        match self.0.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<D: LineDetector> VisionHandle<D> {
    pub(super) fn new(clock: Arc<Clock>, line_angle: SharedLineAngle, detector: D) -> Self {
        let clock_id = clock.register();

        Self {
            clock,
            clock_id,
            line_angle,
            detector,
        }
    }

    /// Acquire a new line angle from the detector and store it.
    pub fn update_from_vision(&mut self) -> VisionUpdate {
        let dt_s = self.clock.elapsed_since_last_call(self.clock_id);

        match self.detector.detect_line_angle() {
            Some(a) if a.is_finite() => {
                self.line_angle.set(a);
                trace!("Line angle {:.3} rad ({:.3} s since last frame)", a, dt_s);
                VisionUpdate::Updated {
                    line_angle_rad: a,
                    dt_s,
                }
            }
            Some(a) => {
                warn!("Line detector returned an invalid angle ({}), discarding", a);
                VisionUpdate::Invalid(a)
            }
            None => VisionUpdate::NoLine,
        }
    }

    pub fn line_angle(&self) -> LineAngle {
        self.line_angle.get()
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
