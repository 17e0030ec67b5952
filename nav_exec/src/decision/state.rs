//! Decision state machine states and transition function

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::f64::consts::PI;
use std::fmt::Display;

use log::debug;
use nalgebra::Point2;
use serde::Serialize;
use util::maths::{ang_diff_signed, wrap_2pi};

use super::{Command, DecisionInput, DecisionParams, TurnDirection};
use crate::map::NodeId;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// The states of the decision engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum NavState {
    /// The robot is at its target, or hasn't started yet.
    Stopped,

    /// Following the line towards the tracked waypoint.
    Forward {
        /// The waypoint captured on entry, or when the planned waypoint last changed.
        tracked: Option<TrackedWaypoint>,
    },

    /// Turning on the spot.
    Turning(Turn),
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A waypoint and its position, as captured by the Forward state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrackedWaypoint {
    pub id: NodeId,

    /// Units: centimeters
    pub position: Point2<f64>,
}

/// An on the spot turn in progress.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Turn {
    /// Heading when the turn started.
    ///
    /// Units: radians
    pub initial_heading_rad: f64,

    /// Rotation to perform from the initial heading, counter-clockwise positive.
    ///
    /// Units: radians
    pub rotation_rad: f64,

    pub direction: TurnDirection,

    /// True if this is a half turn to reverse along the current line.
    pub half_turn: bool,

    /// Latched once the heading reaches the target.
    pub finished: bool,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl NavState {
    /// Step the state machine, returning the new state and the command to send this cycle.
    ///
    /// The command is always the one belonging to the returned state.
    pub fn transition(&self, input: &DecisionInput, params: &DecisionParams) -> (Self, Command) {
        match self {
            NavState::Stopped => stopped(input),
            NavState::Forward { tracked } => forward(*tracked, input, params),
            NavState::Turning(turn) => turning(*turn, input, params),
        }
    }

    /// Name of the state without its data.
    pub fn name(&self) -> &'static str {
        match self {
            NavState::Stopped => "Stopped",
            NavState::Forward { .. } => "Forward",
            NavState::Turning(_) => "Turning",
        }
    }

    fn forward_cmd(input: &DecisionInput) -> Command {
        Command::Forward {
            line_angle_rad: input.line_angle_rad,
        }
    }
}

impl Display for NavState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NavState::Forward {
                tracked: Some(TrackedWaypoint { id, .. }),
            } => write!(f, "Forward (to {})", id),
            NavState::Turning(t) if t.half_turn => write!(f, "Turning (half turn)"),
            NavState::Turning(t) => write!(f, "Turning ({:?})", t.direction),
            s => write!(f, "{}", s.name()),
        }
    }
}

impl Turn {
    /// Heading at which the turn is complete.
    ///
    /// Units: radians
    pub fn target_heading_rad(&self) -> f64 {
        wrap_2pi(self.initial_heading_rad + self.rotation_rad)
    }

    fn cmd(&self) -> Command {
        if self.half_turn {
            Command::HalfTurn
        } else {
            Command::Turn {
                direction: self.direction,
            }
        }
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn stopped(input: &DecisionInput) -> (NavState, Command) {
    if input.at_target {
        (NavState::Stopped, Command::Stop)
    } else {
        (
            NavState::Forward {
                tracked: input.next_waypoint,
            },
            NavState::forward_cmd(input),
        )
    }
}

fn forward(
    tracked: Option<TrackedWaypoint>,
    input: &DecisionInput,
    params: &DecisionParams,
) -> (NavState, Command) {
    // Recapture the waypoint if the planner has moved it on
    let (tracked, changed_target) = match (tracked, input.next_waypoint) {
        (Some(t), Some(w)) if t.id != w.id => (Some(w), true),
        (None, Some(w)) => (Some(w), true),
        (t, _) => (t, false),
    };

    if input.at_target {
        return (NavState::Stopped, Command::Stop);
    }

    let waypoint = match tracked {
        Some(w) => w,
        None => return (NavState::Forward { tracked }, NavState::forward_cmd(input)),
    };

    let heading = input.pose.heading_rad;
    let bearing = input.pose.bearing_to(&waypoint.position);
    let signed_diff = ang_diff_signed(heading, bearing);

    // The new waypoint is behind, go back the way we came
    if changed_target && (PI - signed_diff.abs()).abs() <= params.turn_angle_threshold_rad {
        debug!(
            "Waypoint {} is behind (bearing error {:.3} rad), half turn",
            waypoint.id, signed_diff
        );
        let turn = Turn {
            initial_heading_rad: heading,
            rotation_rad: PI,
            direction: TurnDirection::Left,
            half_turn: true,
            finished: false,
        };
        return (NavState::Turning(turn), turn.cmd());
    }

    // At a junction and the line to the waypoint leaves at an angle
    if input.intersection_detected && signed_diff.abs() > params.turn_angle_threshold_rad {
        debug!(
            "Junction turn towards {} (bearing error {:.3} rad)",
            waypoint.id, signed_diff
        );
        let turn = Turn {
            initial_heading_rad: heading,
            rotation_rad: signed_diff,
            direction: TurnDirection::from_signed_angle(signed_diff),
            half_turn: false,
            finished: false,
        };
        return (NavState::Turning(turn), turn.cmd());
    }

    (NavState::Forward { tracked }, NavState::forward_cmd(input))
}

fn turning(turn: Turn, input: &DecisionInput, params: &DecisionParams) -> (NavState, Command) {
    let mut turn = turn;

    if !turn.finished {
        let error = ang_diff_signed(input.pose.heading_rad, turn.target_heading_rad());
        turn.finished = error.abs() < params.finish_turn_angle_threshold_rad;
    }

    match (turn.finished, input.obstacle_detected) {
        (true, false) => (
            NavState::Forward {
                tracked: input.next_waypoint,
            },
            NavState::forward_cmd(input),
        ),
        (true, true) => (NavState::Turning(turn), Command::Stop),
        (false, _) => (NavState::Turning(turn), turn.cmd()),
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::loc::Pose;
    use std::f64::consts::FRAC_PI_2;

    fn input(pose: Pose, waypoint: Option<(u32, f64, f64)>) -> DecisionInput {
        DecisionInput {
            pose,
            at_target: false,
            intersection_detected: false,
            obstacle_detected: false,
            next_waypoint: waypoint.map(|(id, x, y)| TrackedWaypoint {
                id: NodeId(id),
                position: Point2::new(x, y),
            }),
            line_angle_rad: 0.05,
        }
    }

    fn forward_to(id: u32, x: f64, y: f64) -> NavState {
        NavState::Forward {
            tracked: Some(TrackedWaypoint {
                id: NodeId(id),
                position: Point2::new(x, y),
            }),
        }
    }

    #[test]
    fn test_round_trip() {
        let params = DecisionParams::default();
        let mut i = input(Pose::new(0.0, 0.0, 0.0), Some((1, 100.0, 0.0)));

        let (s, c) = NavState::Stopped.transition(&i, &params);
        assert_eq!(s, forward_to(1, 100.0, 0.0));
        assert_eq!(c, Command::Forward { line_angle_rad: 0.05 });

        let (s, c) = s.transition(&i, &params);
        assert_eq!(s, forward_to(1, 100.0, 0.0));
        assert_eq!(c, Command::Forward { line_angle_rad: 0.05 });

        i.at_target = true;
        let (s, c) = s.transition(&i, &params);
        assert_eq!(s, NavState::Stopped);
        assert_eq!(c, Command::Stop);

        // Stays stopped while at the target
        assert_eq!(s.transition(&i, &params), (NavState::Stopped, Command::Stop));
    }

    #[test]
    fn test_junction_turn_threshold() {
        let params = DecisionParams::default();
        let threshold = params.turn_angle_threshold_rad;

        // Waypoint 100 cm away at an angle just above the threshold, to the left
        let angle = threshold + 0.01;
        let mut i = input(
            Pose::new(0.0, 0.0, 0.0),
            Some((1, 100.0 * angle.cos(), 100.0 * angle.sin())),
        );
        let state = NavState::Forward {
            tracked: i.next_waypoint,
        };

        // Not at a junction, keep following the line
        let (s, _) = state.transition(&i, &params);
        assert_eq!(s, state);

        i.intersection_detected = true;
        let (s, c) = state.transition(&i, &params);
        assert_eq!(
            c,
            Command::Turn {
                direction: TurnDirection::Left
            }
        );
        match s {
            NavState::Turning(t) => {
                assert!(!t.finished && !t.half_turn);
                assert!((t.target_heading_rad() - angle).abs() < 1e-9);
            }
            s => panic!("Expected Turning, got {:?}", s),
        }

        // Just under the threshold, to the right
        let angle = -(threshold - 0.01);
        let i = DecisionInput {
            next_waypoint: Some(TrackedWaypoint {
                id: NodeId(1),
                position: Point2::new(100.0 * angle.cos(), 100.0 * angle.sin()),
            }),
            ..i
        };
        let state = NavState::Forward {
            tracked: i.next_waypoint,
        };
        assert_eq!(state.transition(&i, &params).0, state);

        // Well over it to the right
        let i = input(Pose::new(0.0, 0.0, FRAC_PI_2), Some((1, 100.0, 0.0)));
        let i = DecisionInput {
            intersection_detected: true,
            ..i
        };
        let (_, c) = NavState::Forward {
            tracked: i.next_waypoint,
        }
        .transition(&i, &params);
        assert_eq!(
            c,
            Command::Turn {
                direction: TurnDirection::Right
            }
        );
    }

    #[test]
    fn test_half_turn_on_changed_target() {
        let params = DecisionParams::default();

        // Heading +x, new waypoint behind
        let i = input(Pose::new(50.0, 0.0, 0.0), Some((0, 0.0, 0.0)));
        let (s, c) = forward_to(1, 100.0, 0.0).transition(&i, &params);
        assert_eq!(c, Command::HalfTurn);
        match s {
            NavState::Turning(t) => {
                assert!(t.half_turn);
                assert!((t.target_heading_rad() - PI).abs() < 1e-9);
            }
            s => panic!("Expected Turning, got {:?}", s),
        }

        // The same geometry without a change of waypoint doesn't turn
        let (s, c) = forward_to(0, 0.0, 0.0).transition(&i, &params);
        assert_eq!(s, forward_to(0, 0.0, 0.0));
        assert!(matches!(c, Command::Forward { .. }));
    }

    #[test]
    fn test_turn_completion() {
        let params = DecisionParams::default();
        let turn = Turn {
            initial_heading_rad: 0.0,
            rotation_rad: FRAC_PI_2,
            direction: TurnDirection::Left,
            half_turn: false,
            finished: false,
        };
        let waypoint = Some((2, 100.0, 100.0));

        // Part way round
        let i = input(Pose::new(100.0, 0.0, 1.0), waypoint);
        let (s, c) = NavState::Turning(turn).transition(&i, &params);
        assert_eq!(s, NavState::Turning(turn));
        assert_eq!(
            c,
            Command::Turn {
                direction: TurnDirection::Left
            }
        );

        // Within the finish window, blocked by an obstacle
        let mut i = input(Pose::new(100.0, 0.0, FRAC_PI_2 - 0.05), waypoint);
        i.obstacle_detected = true;
        let (s, c) = NavState::Turning(turn).transition(&i, &params);
        assert_eq!(c, Command::Stop);
        let finished = match s {
            NavState::Turning(t) => {
                assert!(t.finished);
                t
            }
            s => panic!("Expected Turning, got {:?}", s),
        };

        // Stays finished even if the heading wanders out of the window, and leaves once clear
        let mut i = input(Pose::new(100.0, 0.0, 1.0), waypoint);
        i.obstacle_detected = true;
        assert_eq!(
            NavState::Turning(finished).transition(&i, &params),
            (NavState::Turning(finished), Command::Stop)
        );
        i.obstacle_detected = false;
        let (s, c) = NavState::Turning(finished).transition(&i, &params);
        assert_eq!(s, forward_to(2, 100.0, 100.0));
        assert_eq!(c, Command::Forward { line_angle_rad: 0.05 });
    }

    #[test]
    fn test_forward_without_waypoint() {
        let params = DecisionParams::default();
        let mut i = input(Pose::new(0.0, 0.0, 0.0), None);
        i.intersection_detected = true;

        let state = NavState::Forward { tracked: None };
        let (s, c) = state.transition(&i, &params);
        assert_eq!(s, state);
        assert!(matches!(c, Command::Forward { .. }));
    }
}
