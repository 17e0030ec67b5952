//! # Decision module
//!
//! This module implements the [`DecisionEngine`], a state machine choosing the drive command for
//! each control cycle from the perceived pose, the planned waypoint and the obstacle flag. The
//! machine has three states:
//!
//! - `Stopped` - The robot is at its target. Leaves as soon as it isn't.
//! - `Forward` - Following the line to the tracked waypoint. Turns on the spot when a junction is
//!   reached and the waypoint is off to the side, or half turns when a newly planned waypoint is
//!   behind the robot.
//! - `Turning` - Turning on the spot until the heading reaches the turn's target, then waits for
//!   any obstacle to clear before going back to `Forward`.
//!
//! Transitions are computed by a pure function of the current state and a [`DecisionInput`], so
//! the engine itself only holds the current state.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod cmd;
mod params;
mod state;

// ------------------------------------------------------------------------------------------------
// EXPORTS
// ------------------------------------------------------------------------------------------------

pub use cmd::{Command, TurnDirection};
pub use params::DecisionParams;
pub use state::{NavState, TrackedWaypoint, Turn};

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{info, trace};
use serde::Serialize;

use crate::loc::Pose;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Everything the state machine looks at in one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DecisionInput {
    pub pose: Pose,

    /// True if the robot is at its target node.
    pub at_target: bool,

    /// True if the robot is at any node of the map.
    pub intersection_detected: bool,

    pub obstacle_detected: bool,

    /// The waypoint currently planned, if any.
    pub next_waypoint: Option<TrackedWaypoint>,

    /// Units: radians
    pub line_angle_rad: f64,
}

pub struct DecisionEngine {
    params: DecisionParams,
    state: NavState,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl DecisionEngine {
    /// Create a new engine in the `Stopped` state.
    pub fn new(params: DecisionParams) -> Self {
        Self {
            params,
            state: NavState::Stopped,
        }
    }

    /// Run one cycle of the state machine.
    pub fn decide(&mut self, input: &DecisionInput) -> Command {
        let (next, cmd) = self.state.transition(input, &self.params);

        if next.name() != self.state.name() {
            info!("Decision: {} -> {}", self.state, next);
        }
        trace!("Decision state {:?}, command {:?}", next, cmd);

        self.state = next;
        cmd
    }

    /// Force the engine back to `Stopped`.
    pub fn reset(&mut self) {
        if self.state != NavState::Stopped {
            info!("Decision: {} -> Stopped (reset)", self.state);
        }
        self.state = NavState::Stopped;
    }

    pub fn state(&self) -> &NavState {
        &self.state
    }
}
