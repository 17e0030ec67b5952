//! # Control panel
//!
//! The control panel can start and stop navigation, and reset the estimated pose. Commands are
//! applied from a listener thread while the control loop reads the flags, so the run flag is an
//! atomic and the pending reset sits behind a mutex.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};

use comms_if::tc::ControlCmd;
use log::{debug, info, warn};

use crate::loc::Pose;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Flags shared between the control panel listener and the control loop.
#[derive(Debug, Default)]
pub struct ControlPanel {
    run: AtomicBool,

    /// Reset requested but not yet applied by the control loop.
    reset: Mutex<Option<Pose>>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ControlPanel {
    /// Create a new panel, with navigation running if `run` is true.
    pub fn new(run: bool) -> Self {
        Self {
            run: AtomicBool::new(run),
            reset: Mutex::new(None),
        }
    }

    /// Apply a command from the control panel.
    pub fn exec(&self, cmd: &ControlCmd) {
        match cmd {
            ControlCmd::Run => {
                debug!("Recieved Run command");
                self.run.store(true, Ordering::SeqCst);
            }
            ControlCmd::Stop => {
                debug!("Recieved Stop command");
                self.run.store(false, Ordering::SeqCst);
            }
            ControlCmd::Reset {
                x_cm,
                y_cm,
                heading_rad,
            } => {
                debug!("Recieved Reset command");
                *self.lock_reset() = Some(Pose::new(*x_cm, *y_cm, *heading_rad));
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.run.load(Ordering::SeqCst)
    }

    /// Take the pending reset pose, if there is one, clearing the request.
    pub fn take_reset(&self) -> Option<Pose> {
        self.lock_reset().take()
    }

    fn lock_reset(&self) -> MutexGuard<Option<Pose>> {
        match self.reset.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Spawn a thread applying newline delimited JSON commands read from `reader` to the panel.
///
/// Lines which can't be parsed are logged and skipped. The thread ends when the reader does.
pub fn spawn_listener<R>(panel: Arc<ControlPanel>, reader: R) -> std::io::Result<JoinHandle<()>>
where
    R: BufRead + Send + 'static,
{
    thread::Builder::new()
        .name("control_panel".into())
        .spawn(move || {
            for line in reader.lines() {
                let line = match line {
                    Ok(l) => l,
                    Err(e) => {
                        warn!("Control panel input error: {}", e);
                        break;
                    }
                };

                if line.trim().is_empty() {
                    continue;
                }

                match ControlCmd::from_json(&line) {
                    Ok(cmd) => {
                        info!("Control panel command: {:?}", cmd);
                        panel.exec(&cmd);
                    }
                    Err(e) => warn!("Could not parse control panel command: {}", e),
                }
            }

            info!("Control panel input closed");
        })
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
