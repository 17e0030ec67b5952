//! Drive commands emitted by the decision engine

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::eqpt::{WheelDir, WheelDirs};
use serde::Serialize;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// An abstract drive command, one of which is produced every control cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum Command {
    /// Hold position.
    Stop,

    /// Drive forwards, steering to follow the line at the given angle in the camera frame.
    Forward { line_angle_rad: f64 },

    /// Turn on the spot.
    Turn { direction: TurnDirection },

    /// Turn on the spot to face the way the robot came.
    HalfTurn,
}

/// Direction of an on the spot turn, as seen from above.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TurnDirection {
    /// Counter-clockwise
    Left,

    /// Clockwise
    Right,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Command {
    /// The directions the wheels turn in while executing this command.
    pub fn wheel_directions(&self) -> WheelDirs {
        match self {
            Command::Stop => WheelDirs::default(),
            Command::Forward { .. } => WheelDirs {
                left: WheelDir::Forward,
                right: WheelDir::Forward,
            },
            Command::Turn {
                direction: TurnDirection::Left,
            }
            | Command::HalfTurn => WheelDirs {
                left: WheelDir::Reverse,
                right: WheelDir::Forward,
            },
            Command::Turn {
                direction: TurnDirection::Right,
            } => WheelDirs {
                left: WheelDir::Forward,
                right: WheelDir::Reverse,
            },
        }
    }

    /// Short name used in the archive.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Stop => "stop",
            Command::Forward { .. } => "forward",
            Command::Turn {
                direction: TurnDirection::Left,
            } => "turn_left",
            Command::Turn {
                direction: TurnDirection::Right,
            } => "turn_right",
            Command::HalfTurn => "half_turn",
        }
    }
}

impl TurnDirection {
    /// Direction of the shortest turn through a signed angle, counter-clockwise positive.
    pub fn from_signed_angle(angle_rad: f64) -> Self {
        if angle_rad >= 0.0 {
            TurnDirection::Left
        } else {
            TurnDirection::Right
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_wheel_directions() {
        assert_eq!(Command::Stop.wheel_directions(), WheelDirs::default());

        let left = Command::Turn {
            direction: TurnDirection::Left,
        }
        .wheel_directions();
        assert_eq!(left.right, WheelDir::Forward);
        assert_eq!(left.left, WheelDir::Reverse);
        assert_eq!(Command::HalfTurn.wheel_directions(), left);

        let right = Command::Turn {
            direction: TurnDirection::Right,
        }
        .wheel_directions();
        assert_eq!(right.right, WheelDir::Reverse);
        assert_eq!(right.left, WheelDir::Forward);
    }
}
