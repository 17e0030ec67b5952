//! # Navigator
//!
//! Runs one control cycle of the navigation core:
//!
//!  1. Apply any pose reset from the control panel.
//!  1. Update the pose estimate from the cycle's sensor readings.
//!  1. Replan the next waypoint if the current node or the target changed.
//!  1. Run the decision engine, or command a stop if navigation isn't running.
//!  1. Feed the command's wheel directions back into the estimator for the next cycle.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::sync::Arc;

use comms_if::eqpt::SensorSample;
use log::{debug, info, warn};
use serde::Serialize;

use crate::{
    control_panel::ControlPanel,
    decision::{Command, DecisionEngine, DecisionInput, NavState, TrackedWaypoint},
    loc::{MotionUpdate, Pose, PoseEstimator},
    map::{Graph, NodeId},
    nav,
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

pub struct Navigator {
    graph: Arc<Graph>,
    estimator: PoseEstimator,
    engine: DecisionEngine,
    panel: Arc<ControlPanel>,

    target: NodeId,

    /// The (current node, target) pair the waypoint was last planned for.
    planned_for: Option<(NodeId, NodeId)>,

    /// True if there is no path to the target, the robot stays where it is.
    holding: bool,

    was_running: bool,
}

/// Summary of one control cycle, as archived.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CycleReport {
    pub cmd: Command,
    pub motion: MotionUpdate,
    pub pose: Pose,
    pub current_node: NodeId,
    pub next_waypoint: Option<NodeId>,
    pub state: NavState,
    pub obstacle_detected: bool,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Navigator {
    pub fn new(
        graph: Arc<Graph>,
        estimator: PoseEstimator,
        engine: DecisionEngine,
        panel: Arc<ControlPanel>,
        target: NodeId,
    ) -> Self {
        if !graph.contains(target) {
            warn!("Target {} is not in the map, the robot will hold position", target);
        }

        Self {
            graph,
            estimator,
            engine,
            panel,
            target,
            planned_for: None,
            holding: false,
            was_running: false,
        }
    }

    /// Run one control cycle.
    pub fn cycle(&mut self, sample: &SensorSample) -> CycleReport {
        if let Some(reset) = self.panel.take_reset() {
            self.estimator.request_reset(reset);
        }

        let motion = self.estimator.update_from_motion(sample);

        self.replan_if_needed();

        let running = self.panel.is_running();
        if running != self.was_running {
            info!("Navigation {}", if running { "running" } else { "stopped" });
            self.was_running = running;
        }

        let cmd = if running && !self.holding {
            let input = self.decision_input();
            self.engine.decide(&input)
        } else {
            self.engine.reset();
            Command::Stop
        };

        self.estimator.set_commanded_directions(cmd.wheel_directions());

        CycleReport {
            cmd,
            motion,
            pose: self.estimator.pose(),
            current_node: self.estimator.current_node(),
            next_waypoint: self.estimator.next_waypoint(),
            state: *self.engine.state(),
            obstacle_detected: self.estimator.obstacle_detected(),
        }
    }

    /// Change the node being navigated to.
    pub fn set_target(&mut self, target: NodeId) {
        if target != self.target {
            info!("New target {}", target);
            self.target = target;
        }
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    pub fn estimator(&self) -> &PoseEstimator {
        &self.estimator
    }

    pub fn state(&self) -> &NavState {
        self.engine.state()
    }

    fn replan_if_needed(&mut self) {
        let current = self.estimator.current_node();
        let key = (current, self.target);

        // A reset clears the waypoint, which also forces a replan
        if self.planned_for == Some(key) && self.estimator.next_waypoint().is_some() {
            return;
        }

        let waypoint = nav::next_waypoint(&self.graph, current, self.target);

        // Only a missing path leaves the waypoint on the current node short of the target
        self.holding = waypoint == current && current != self.target;
        if self.holding {
            warn!("No path from {} to {}, holding position", current, self.target);
        } else {
            debug!(
                "Replanned from {} to {}, next waypoint {}",
                current, self.target, waypoint
            );
        }

        self.estimator.update_next_waypoint(Some(waypoint));
        self.planned_for = Some(key);
    }

    fn decision_input(&self) -> DecisionInput {
        let next_waypoint = self.estimator.next_waypoint().and_then(|id| {
            self.graph
                .position(id)
                .map(|position| TrackedWaypoint { id, position })
        });

        DecisionInput {
            pose: self.estimator.pose(),
            at_target: self.estimator.position_is(self.target),
            intersection_detected: self.estimator.intersection_detected(),
            obstacle_detected: self.estimator.obstacle_detected(),
            next_waypoint,
            line_angle_rad: self.estimator.line_angle().current_rad,
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
