//! # Control panel telecommands
//!
//! Commands sent to the robot by the remote control panel. These only ever toggle the run flag
//! or request a pose reset; navigation itself is fully autonomous.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Serialize, Deserialize};
use structopt::StructOpt;
use thiserror::Error;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A command from the control panel.
///
/// Serialised as an internally tagged JSON object, for example `{"cmd": "run"}` or
/// `{"cmd": "reset", "x_cm": 0.0, "y_cm": 0.0, "heading_rad": 1.57}`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize, StructOpt)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum ControlCmd {
    /// Start (or resume) autonomous navigation.
    #[structopt(name = "run")]
    Run,

    /// Stop navigating, the robot holds its position until the next `Run`.
    #[structopt(name = "stop")]
    Stop,

    /// Overwrite the robot's estimated pose on the next control cycle.
    #[structopt(name = "reset")]
    Reset {
        /// X position in the map frame.
        ///
        /// Units: centimeters
        x_cm: f64,

        /// Y position in the map frame.
        ///
        /// Units: centimeters
        y_cm: f64,

        /// Heading, angle from the map's +X axis, counter-clockwise positive.
        ///
        /// Units: radians
        heading_rad: f64,
    },
}

/// Possible parsing errors.
#[derive(Debug, Error)]
pub enum ControlCmdParseError {
    #[error("Control command contains invalid JSON: {0}")]
    InvalidJson(serde_json::Error),

    #[error("Reset command contains a non-finite value: {0:?}")]
    NonFiniteReset(ControlCmd),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ControlCmd {
    /// Parse a command from a single line of JSON.
    pub fn from_json(json_str: &str) -> Result<Self, ControlCmdParseError> {
        let cmd: Self = serde_json::from_str(json_str.trim())
            .map_err(ControlCmdParseError::InvalidJson)?;

        match cmd {
            ControlCmd::Reset { x_cm, y_cm, heading_rad }
                if !(x_cm.is_finite() && y_cm.is_finite() && heading_rad.is_finite()) =>
            {
                Err(ControlCmdParseError::NonFiniteReset(cmd))
            }
            c => Ok(c),
        }
    }

    /// Serialise the command into a single line of JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
