//! # Data Store

use log::{error, warn};
use serde::Serialize;

use crate::{
    decision::Command,
    loc::{MotionUpdate, Pose},
    map::NodeId,
    navigator::CycleReport,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Global data store for the executable.
#[derive(Default)]
pub struct DataStore {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u64,

    /// True if this cycle falls on a 1Hz boundary
    pub is_1_hz_cycle: bool,

    /// Navigation time of the start of this cycle, from the executable's clock
    pub nav_time_s: f64,

    /// The report of the last navigation cycle
    pub last_report: Option<CycleReport>,

    // Monitoring Counters
    /// Number of consecutive cycle overruns
    pub num_consec_cycle_overruns: u64,

    /// Total number of cycle overruns
    pub num_cycle_overruns: u64,

    /// Number of cycles in which the motion update was frozen
    pub num_frozen_updates: u64,
}

/// One line of the navigation archive.
#[derive(Debug, Clone, Serialize)]
pub struct ArchRecord {
    pub cycle: u64,
    pub time_s: f64,
    pub x_cm: f64,
    pub y_cm: f64,
    pub heading_rad: f64,
    pub current_node: u32,
    pub next_waypoint: Option<u32>,
    pub state: &'static str,
    pub cmd: &'static str,
    pub line_angle_rad: Option<f64>,
    pub obstacle_detected: bool,
    pub motion: &'static str,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl DataStore {
    /// Perform actions required at the start of a cycle.
    ///
    /// Sets the 1Hz cycle flag and the cycle time.
    pub fn cycle_start(&mut self, cycle_frequency_hz: f64, nav_time_s: f64) {
        let cycles_per_s = (cycle_frequency_hz.round() as u64).max(1);
        self.is_1_hz_cycle = self.num_cycles % cycles_per_s == 0;
        self.nav_time_s = nav_time_s;
    }

    /// Store the result of a navigation cycle.
    pub fn set_report(&mut self, report: CycleReport) {
        if let MotionUpdate::Frozen(_) = report.motion {
            self.num_frozen_updates += 1;
        }
        self.last_report = Some(report);
    }

    /// Record the outcome of the cycle timing, returning true if the limit on consecutive overruns
    /// has been exceeded.
    pub fn record_overrun(&mut self, overran: bool, max_consec_overruns: u64) -> bool {
        if !overran {
            self.num_consec_cycle_overruns = 0;
            return false;
        }

        self.num_cycle_overruns += 1;
        self.num_consec_cycle_overruns += 1;

        if self.num_consec_cycle_overruns > max_consec_overruns {
            error!(
                "{} consecutive cycle overruns (limit {})",
                self.num_consec_cycle_overruns, max_consec_overruns
            );
            true
        } else {
            false
        }
    }

    /// Increment the cycle counter at the end of a cycle.
    pub fn cycle_end(&mut self) {
        self.num_cycles += 1;
    }

    /// Build the archive record for the last cycle.
    pub fn arch_record(&self) -> Option<ArchRecord> {
        let r = self.last_report.as_ref()?;

        if !r.pose.is_finite() {
            warn!("Archiving a non-finite pose: {:?}", r.pose);
        }

        Some(ArchRecord {
            cycle: self.num_cycles,
            time_s: self.nav_time_s,
            x_cm: r.pose.x_cm,
            y_cm: r.pose.y_cm,
            heading_rad: r.pose.heading_rad,
            current_node: r.current_node.0,
            next_waypoint: r.next_waypoint.map(|n| n.0),
            state: r.state.name(),
            cmd: r.cmd.name(),
            line_angle_rad: match r.cmd {
                Command::Forward { line_angle_rad } => Some(line_angle_rad),
                _ => None,
            },
            obstacle_detected: r.obstacle_detected,
            motion: match r.motion {
                MotionUpdate::Fused => "fused",
                MotionUpdate::Reset => "reset",
                MotionUpdate::Frozen(_) => "frozen",
            },
        })
    }

    /// Pose and current node at the end of the last cycle.
    pub fn last_pose(&self) -> Option<(Pose, NodeId)> {
        self.last_report.map(|r| (r.pose, r.current_node))
    }
}
