//! # Control panel command line
//!
//! Prints a control panel command as a line of JSON, ready to be piped into the `nav_exec`
//! control panel listener. For example:
//!
//! ```text
//! nav_cmd reset 100 0 1.5708
//! ```

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use color_eyre::{eyre::WrapErr, Result};
use comms_if::tc::ControlCmd;
use structopt::StructOpt;

fn main() -> Result<()> {
    color_eyre::install()?;

    let cmd = ControlCmd::from_args();

    // Round trip through the parser so that invalid resets are caught here
    let json = cmd.to_json().wrap_err("Could not serialise the command")?;
    ControlCmd::from_json(&json).wrap_err("Invalid command")?;

    println!("{}", json);

    Ok(())
}
