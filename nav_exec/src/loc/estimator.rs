//! Pose estimator state and motion update

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::sync::Arc;

use comms_if::eqpt::{SensorSample, WheelDirs};
use log::{debug, info, trace, warn};
use nalgebra::Point2;
use serde::Serialize;
use util::maths::wrap_2pi;

use super::{
    line_angle::SharedLineAngle, LineAngle, LineDetector, LocError, LocParams, ObstacleDebounce,
    Pose, VisionHandle,
};
use crate::{
    clock::{Clock, ClockId},
    map::{project_onto_segment, Graph, NodeId},
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Fuses encoder and range finder readings into an estimate of the robot's pose on the map.
pub struct PoseEstimator {
    params: LocParams,

    graph: Arc<Graph>,

    clock: Arc<Clock>,

    /// Cursor of the motion stream in the clock.
    motion_clock_id: ClockId,

    pose: Pose,

    /// The node the robot last passed through.
    current_node: NodeId,

    /// The node the robot is driving towards, if one has been planned.
    next_waypoint: Option<NodeId>,

    /// Units: centimeters/second
    linear_speed_cms: f64,

    /// Units: radians/second, counter-clockwise positive
    angular_speed_rads: f64,

    /// Encoder readings from the last fused cycle, (right, left), or `None` if the next valid
    /// reading has to be taken as the new baseline.
    ///
    /// Units: centimeters
    prev_encoders_cm: Option<(f64, f64)>,

    /// Time of the cycles frozen since the encoder baseline was taken.
    ///
    /// Units: seconds
    frozen_dt_s: f64,

    obstacle: ObstacleDebounce,

    /// Wheel directions of the last command sent to the actuators. The encoders can't tell which
    /// way the wheels turned so this gives the sign of each wheel's travel.
    commanded_dirs: WheelDirs,

    line_angle: SharedLineAngle,

    /// Pose to apply at the start of the next motion update.
    pending_reset: Option<Pose>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Outcome of a motion update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum MotionUpdate {
    /// The readings were fused into the pose.
    Fused,

    /// A pending reset was applied instead of fusing the readings.
    Reset,

    /// The pose was left untouched this cycle.
    Frozen(FreezeReason),
}

/// Reason for a motion update being skipped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum FreezeReason {
    /// No time passed since the last motion update.
    NoElapsedTime,

    /// An encoder reading was NaN, infinite or negative.
    InvalidEncoders { right_cm: f64, left_cm: f64 },

    /// An encoder reading went backwards, the encoders have been resynchronised.
    EncoderDecreased { right_delta_cm: f64, left_delta_cm: f64 },

    /// There was no encoder baseline after a reset, this reading became it.
    EncodersResynced,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl PoseEstimator {
    /// Create a new estimator with the robot at `initial`.
    ///
    /// The current node is the one the initial position is at, or the lowest id node if the robot
    /// doesn't start on a node.
    pub fn new(
        params: LocParams,
        graph: Arc<Graph>,
        clock: Arc<Clock>,
        initial: Pose,
    ) -> Result<Self, LocError> {
        let current_node = match graph.node_near(&initial.position(), params.distance_threshold_cm)
        {
            Some(n) => n,
            None => {
                let (first, _) = graph.nodes().next().ok_or(LocError::EmptyMap)?;
                warn!(
                    "Initial position ({:.1}, {:.1}) is not at a node, assuming {}",
                    initial.x_cm, initial.y_cm, first
                );
                first
            }
        };

        let motion_clock_id = clock.register();

        Ok(Self {
            params,
            graph,
            clock,
            motion_clock_id,
            pose: Pose::new(initial.x_cm, initial.y_cm, initial.heading_rad),
            current_node,
            next_waypoint: None,
            linear_speed_cms: 0.0,
            angular_speed_rads: 0.0,
            prev_encoders_cm: Some((0.0, 0.0)),
            frozen_dt_s: 0.0,
            obstacle: ObstacleDebounce::default(),
            commanded_dirs: WheelDirs::default(),
            line_angle: SharedLineAngle::default(),
            pending_reset: None,
        })
    }

    /// Create the handle through which the vision stream updates the line angle.
    ///
    /// The handle registers its own clock cursor, so it may be called at any rate on any thread.
    pub fn vision_handle<D: LineDetector>(&self, detector: D) -> VisionHandle<D> {
        VisionHandle::new(self.clock.clone(), self.line_angle.clone(), detector)
    }

    /// Request that the pose is overwritten at the start of the next motion update.
    pub fn request_reset(&mut self, pose: Pose) {
        info!(
            "Pose reset requested to ({:.1}, {:.1}, {:.3} rad)",
            pose.x_cm, pose.y_cm, pose.heading_rad
        );
        self.pending_reset = Some(pose);
    }

    /// Fuse one cycle of sensor readings into the estimate.
    ///
    /// Processing involves:
    ///  1. Applying any pending reset, in which case nothing else is done.
    ///  1. Wheel speeds from the encoder deltas, signed by the last commanded directions.
    ///  1. Integrating the heading, then the position along the new heading.
    ///  1. Snapping the position onto the segment from the current node to the next waypoint.
    ///  1. Moving the current node on if the robot has reached a neighbour.
    ///  1. Propagating the line angle through the rotation.
    ///  1. Debouncing the obstacle reading.
    ///
    /// Invalid encoder readings or a zero elapsed time freeze the pose for this cycle. The time of
    /// cycles frozen on invalid readings is carried into the next fused cycle, whose encoder deltas
    /// cover it. An invalid obstacle distance only skips the debounce.
    pub fn update_from_motion(&mut self, sample: &SensorSample) -> MotionUpdate {
        if let Some(reset) = self.pending_reset.take() {
            self.apply_reset(reset, sample);
            return MotionUpdate::Reset;
        }

        let dt_s = self.clock.elapsed_since_last_call(self.motion_clock_id);

        if sample.obstacle_distance_valid() {
            self.obstacle
                .update(sample.obstacle_distance_cm, &self.params);
        } else {
            warn!(
                "Invalid obstacle distance ({}), debounce skipped",
                sample.obstacle_distance_cm
            );
        }

        if !sample.encoders_valid() {
            self.frozen_dt_s += dt_s;
            warn!(
                "Invalid encoder readings (right: {}, left: {}), pose frozen",
                sample.right_encoder_cm, sample.left_encoder_cm
            );
            return MotionUpdate::Frozen(FreezeReason::InvalidEncoders {
                right_cm: sample.right_encoder_cm,
                left_cm: sample.left_encoder_cm,
            });
        }

        if !(dt_s > 0.0) {
            debug!("No time elapsed since the last motion update, pose frozen");
            return MotionUpdate::Frozen(FreezeReason::NoElapsedTime);
        }

        let (prev_right_cm, prev_left_cm) = match self.prev_encoders_cm {
            Some(prev) => prev,
            None => {
                self.resync_encoders(sample);
                debug!("Encoder baseline taken, pose frozen");
                return MotionUpdate::Frozen(FreezeReason::EncodersResynced);
            }
        };

        let right_delta_cm = sample.right_encoder_cm - prev_right_cm;
        let left_delta_cm = sample.left_encoder_cm - prev_left_cm;

        // Travel since the baseline spans the cycles frozen on invalid readings too
        let dt_s = dt_s + self.frozen_dt_s;
        self.resync_encoders(sample);

        if right_delta_cm < 0.0 || left_delta_cm < 0.0 {
            warn!(
                "Encoders went backwards (right: {:.2} cm, left: {:.2} cm), resynchronised",
                right_delta_cm, left_delta_cm
            );
            return MotionUpdate::Frozen(FreezeReason::EncoderDecreased {
                right_delta_cm,
                left_delta_cm,
            });
        }

        // ---- KINEMATICS ----

        let right_speed_cms = self.commanded_dirs.right.sign() * right_delta_cm / dt_s;
        let left_speed_cms = self.commanded_dirs.left.sign() * left_delta_cm / dt_s;

        self.linear_speed_cms = 0.5 * (right_speed_cms + left_speed_cms);
        self.angular_speed_rads = (right_speed_cms - left_speed_cms) / self.params.wheel_dist_cm;

        let rotation_rad = self.angular_speed_rads * dt_s;
        self.pose.heading_rad = wrap_2pi(self.pose.heading_rad + rotation_rad);

        let raw = Point2::new(
            self.pose.x_cm + self.linear_speed_cms * dt_s * self.pose.heading_rad.cos(),
            self.pose.y_cm + self.linear_speed_cms * dt_s * self.pose.heading_rad.sin(),
        );

        // ---- MAP MATCHING ----

        let position = self.snap_to_segment(raw);
        self.pose.x_cm = position.x;
        self.pose.y_cm = position.y;

        self.update_current_node();

        // ---- LINE ANGLE ----

        self.line_angle.rotate(rotation_rad);

        trace!(
            "Pose ({:.2}, {:.2}, {:.3} rad), v = {:.2} cm/s, w = {:.3} rad/s, node {}",
            self.pose.x_cm,
            self.pose.y_cm,
            self.pose.heading_rad,
            self.linear_speed_cms,
            self.angular_speed_rads,
            self.current_node
        );

        MotionUpdate::Fused
    }

    /// Set the node the robot is driving towards.
    ///
    /// A change of waypoint moves the robot onto the new segment straight away, so that decisions
    /// taken this cycle see the position on the line it is about to follow.
    pub fn update_next_waypoint(&mut self, waypoint: Option<NodeId>) {
        if waypoint == self.next_waypoint {
            return;
        }

        debug!("Next waypoint: {:?}", waypoint);
        self.next_waypoint = waypoint;

        let position = self.snap_to_segment(self.pose.position());
        self.pose.x_cm = position.x;
        self.pose.y_cm = position.y;
    }

    /// Record the wheel directions of the command just sent to the actuators.
    pub fn set_commanded_directions(&mut self, dirs: WheelDirs) {
        self.commanded_dirs = dirs;
    }

    /// True if the robot is strictly closer than the distance threshold to `target`.
    ///
    /// Unknown nodes are never reached.
    pub fn position_is(&self, target: NodeId) -> bool {
        match self.graph.position(target) {
            Some(p) => (p - self.pose.position()).norm() < self.params.distance_threshold_cm,
            None => false,
        }
    }

    /// True if the robot is within the distance threshold of any node.
    pub fn intersection_detected(&self) -> bool {
        self.graph
            .node_near(&self.pose.position(), self.params.distance_threshold_cm)
            .is_some()
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn current_node(&self) -> NodeId {
        self.current_node
    }

    pub fn next_waypoint(&self) -> Option<NodeId> {
        self.next_waypoint
    }

    pub fn obstacle_detected(&self) -> bool {
        self.obstacle.detected()
    }

    pub fn line_angle(&self) -> LineAngle {
        self.line_angle.get()
    }

    /// Units: centimeters/second
    pub fn linear_speed_cms(&self) -> f64 {
        self.linear_speed_cms
    }

    /// Units: radians/second
    pub fn angular_speed_rads(&self) -> f64 {
        self.angular_speed_rads
    }

    pub fn params(&self) -> &LocParams {
        &self.params
    }

    fn apply_reset(&mut self, reset: Pose, sample: &SensorSample) {
        self.pose = Pose::new(reset.x_cm, reset.y_cm, reset.heading_rad);
        self.linear_speed_cms = 0.0;
        self.angular_speed_rads = 0.0;

        // Consume the time and travel accumulated before the reset
        self.clock.elapsed_since_last_call(self.motion_clock_id);
        if sample.encoders_valid() {
            self.resync_encoders(sample);
        } else {
            self.prev_encoders_cm = None;
            self.frozen_dt_s = 0.0;
        }

        if let Some(n) = self
            .graph
            .node_near(&self.pose.position(), self.params.distance_threshold_cm)
        {
            self.current_node = n;
        }
        self.next_waypoint = None;

        info!(
            "Pose reset to ({:.1}, {:.1}, {:.3} rad), current node {}",
            self.pose.x_cm, self.pose.y_cm, self.pose.heading_rad, self.current_node
        );
    }

    fn resync_encoders(&mut self, sample: &SensorSample) {
        self.prev_encoders_cm = Some((sample.right_encoder_cm, sample.left_encoder_cm));
        self.frozen_dt_s = 0.0;
    }

    /// Project the position onto the segment being followed. Without a waypoint, or with a
    /// waypoint at the current node, the position is returned unchanged.
    fn snap_to_segment(&self, position: Point2<f64>) -> Point2<f64> {
        let waypoint = match self.next_waypoint {
            Some(w) => w,
            None => return position,
        };

        match (
            self.graph.position(self.current_node),
            self.graph.position(waypoint),
        ) {
            (Some(start), Some(end)) => {
                project_onto_segment(&position, &start, &end).unwrap_or(position)
            }
            _ => position,
        }
    }

    fn update_current_node(&mut self) {
        let position = self.pose.position();
        let threshold = self.params.distance_threshold_cm;

        let reached = self
            .graph
            .neighbours(self.current_node)
            .iter()
            .copied()
            .find(|n| {
                self.graph
                    .position(*n)
                    .map_or(false, |p| (p - position).norm() < threshold)
            });

        if let Some(n) = reached {
            info!("Reached node {} (from {})", n, self.current_node);
            self.current_node = n;
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::clock::ManualTime;
    use comms_if::eqpt::WheelDir;
    use std::f64::consts::FRAC_PI_2;

    const FORWARD: WheelDirs = WheelDirs {
        left: WheelDir::Forward,
        right: WheelDir::Forward,
    };

    /// A(0, 0), B(100, 0), C(100, 100), with edges A-B and B-C.
    fn abc() -> Arc<Graph> {
        let mut b = Graph::builder();
        let na = b.add_node(Point2::new(0.0, 0.0)).unwrap();
        let nb = b.add_node(Point2::new(100.0, 0.0)).unwrap();
        let nc = b.add_node(Point2::new(100.0, 100.0)).unwrap();
        b.add_edge(na, nb).unwrap();
        b.add_edge(nb, nc).unwrap();
        Arc::new(b.build())
    }

    fn estimator(initial: Pose) -> (PoseEstimator, Arc<ManualTime>) {
        let time = Arc::new(ManualTime::new(0.0));
        let clock = Arc::new(Clock::new(time.clone()));
        let est = PoseEstimator::new(LocParams::default(), abc(), clock, initial).unwrap();
        (est, time)
    }

    fn sample(right_cm: f64, left_cm: f64) -> SensorSample {
        SensorSample {
            right_encoder_cm: right_cm,
            left_encoder_cm: left_cm,
            obstacle_distance_cm: 999.0,
        }
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    #[test]
    fn test_pure_translation() {
        // Off the map segments so nothing is snapped
        let heading = 0.6;
        let (mut est, time) = estimator(Pose::new(40.0, -30.0, heading));
        est.set_commanded_directions(FORWARD);

        time.advance(0.5);
        assert_eq!(est.update_from_motion(&sample(10.0, 10.0)), MotionUpdate::Fused);

        let p = est.pose();
        assert_close(est.linear_speed_cms(), 20.0);
        assert_close(est.angular_speed_rads(), 0.0);
        assert_close(p.x_cm, 40.0 + 20.0 * 0.5 * heading.cos());
        assert_close(p.y_cm, -30.0 + 20.0 * 0.5 * heading.sin());
        assert_close(p.heading_rad, heading);
    }

    #[test]
    fn test_rotation() {
        let (mut est, time) = estimator(Pose::new(0.0, 0.0, 0.0));
        est.set_commanded_directions(WheelDirs {
            left: WheelDir::Reverse,
            right: WheelDir::Forward,
        });

        // Quarter turn counter-clockwise: each wheel rolls a quarter of the wheel circle
        let quarter = FRAC_PI_2 * 0.5 * LocParams::default().wheel_dist_cm;
        time.advance(1.0);
        est.update_from_motion(&sample(quarter, quarter));

        let p = est.pose();
        assert_close(est.linear_speed_cms(), 0.0);
        assert_close(p.heading_rad, FRAC_PI_2);
        assert_close(p.x_cm, 0.0);
        assert_close(p.y_cm, 0.0);

        // Line angle is dead-reckoned with the opposite sign
        assert_close(est.line_angle().current_rad, -FRAC_PI_2);

        // Idle wheels don't move the estimate even if the encoders tick
        est.set_commanded_directions(WheelDirs::default());
        time.advance(1.0);
        est.update_from_motion(&sample(quarter + 3.0, quarter + 3.0));
        assert_close(est.pose().heading_rad, FRAC_PI_2);
    }

    #[test]
    fn test_snapping_and_node_transition() {
        let (mut est, time) = estimator(Pose::new(0.0, 0.0, 0.1));
        assert_eq!(est.current_node(), NodeId(0));
        est.set_commanded_directions(FORWARD);
        est.update_next_waypoint(Some(NodeId(1)));

        // Drifting heading, but the position stays on the A-B segment
        time.advance(1.0);
        est.update_from_motion(&sample(50.0, 50.0));
        let p = est.pose();
        assert_close(p.y_cm, 0.0);
        assert_close(p.x_cm, 50.0 * 0.1f64.cos());
        assert_close(p.heading_rad, 0.1);
        assert_eq!(est.current_node(), NodeId(0));
        assert!(!est.intersection_detected());

        // Into B's threshold
        time.advance(1.0);
        est.update_from_motion(&sample(85.0, 85.0));
        assert_eq!(est.current_node(), NodeId(1));
        assert!(est.intersection_detected());
        assert!(est.position_is(NodeId(1)));
        assert!(!est.position_is(NodeId(2)));
        assert!(!est.position_is(NodeId(7)));
    }

    #[test]
    fn test_position_is_strict() {
        let (est, _) = estimator(Pose::new(80.0, 0.0, 0.0));
        assert!(!est.position_is(NodeId(1)));
        let (est, _) = estimator(Pose::new(80.5, 0.0, 0.0));
        assert!(est.position_is(NodeId(1)));
    }

    #[test]
    fn test_faults_freeze() {
        let (mut est, time) = estimator(Pose::new(40.0, -30.0, 0.0));
        est.set_commanded_directions(FORWARD);
        let start = est.pose();

        // No elapsed time
        assert_eq!(
            est.update_from_motion(&sample(5.0, 5.0)),
            MotionUpdate::Frozen(FreezeReason::NoElapsedTime)
        );
        assert_eq!(est.pose(), start);

        // NaN and negative readings
        time.advance(0.1);
        assert!(matches!(
            est.update_from_motion(&sample(std::f64::NAN, 5.0)),
            MotionUpdate::Frozen(FreezeReason::InvalidEncoders { .. })
        ));
        time.advance(0.1);
        assert!(matches!(
            est.update_from_motion(&sample(5.0, -1.0)),
            MotionUpdate::Frozen(FreezeReason::InvalidEncoders { .. })
        ));
        assert_eq!(est.pose(), start);
        assert!(est.pose().is_finite());

        // The valid reading is fused against the last good encoders, over the frozen cycles' time
        time.advance(0.1);
        assert_eq!(est.update_from_motion(&sample(5.0, 5.0)), MotionUpdate::Fused);
        assert_close(est.pose().x_cm, 45.0);
        assert!((est.linear_speed_cms() - 5.0 / 0.3).abs() < 1e-6);

        // Going backwards resyncs without moving
        time.advance(0.1);
        assert!(matches!(
            est.update_from_motion(&sample(2.0, 6.0)),
            MotionUpdate::Frozen(FreezeReason::EncoderDecreased { .. })
        ));
        assert_close(est.pose().x_cm, 45.0);
        time.advance(0.1);
        est.update_from_motion(&sample(3.0, 7.0));
        assert_close(est.pose().x_cm, 46.0);
    }

    #[test]
    fn test_speed_across_frozen_cycle() {
        let (mut est, time) = estimator(Pose::new(40.0, -30.0, 0.0));
        est.set_commanded_directions(FORWARD);

        // 10 cm/s throughout, with an unreadable encoder in the middle cycle
        time.advance(0.1);
        est.update_from_motion(&sample(1.0, 1.0));
        assert!((est.linear_speed_cms() - 10.0).abs() < 1e-6);

        time.advance(0.1);
        est.update_from_motion(&sample(std::f64::NAN, 2.0));

        time.advance(0.1);
        assert_eq!(est.update_from_motion(&sample(3.0, 3.0)), MotionUpdate::Fused);
        assert!((est.linear_speed_cms() - 10.0).abs() < 1e-6);
        assert!((est.angular_speed_rads()).abs() < 1e-9);
        assert_close(est.pose().x_cm, 43.0);

        // A backwards reading drops the frozen time along with the old baseline
        time.advance(0.1);
        est.update_from_motion(&sample(std::f64::NAN, 4.0));
        time.advance(0.1);
        est.update_from_motion(&sample(0.5, 0.5));
        time.advance(0.1);
        est.update_from_motion(&sample(1.5, 1.5));
        assert!((est.linear_speed_cms() - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_obstacle_debounce() {
        let (mut est, time) = estimator(Pose::new(0.0, 0.0, 0.0));
        let n = est.params().obstacle_detected_cycle_threshold;

        let close = |d: f64| SensorSample {
            obstacle_distance_cm: d,
            ..Default::default()
        };

        for _ in 0..n {
            time.advance(0.12);
            est.update_from_motion(&close(10.0));
        }
        assert!(est.obstacle_detected());

        // Invalid distances leave the detection as it was
        time.advance(0.12);
        est.update_from_motion(&close(std::f64::NAN));
        assert!(est.obstacle_detected());

        time.advance(0.12);
        est.update_from_motion(&close(60.0));
        assert!(!est.obstacle_detected());
    }

    #[test]
    fn test_reset() {
        let (mut est, time) = estimator(Pose::new(0.0, 0.0, 0.0));
        est.set_commanded_directions(FORWARD);
        est.update_next_waypoint(Some(NodeId(1)));

        time.advance(1.0);
        est.update_from_motion(&sample(30.0, 30.0));
        assert_close(est.pose().x_cm, 30.0);

        // Reset onto C, skipping the fusion of the 20 cm travelled meanwhile
        est.request_reset(Pose::new(100.0, 95.0, -FRAC_PI_2));
        time.advance(1.0);
        assert_eq!(est.update_from_motion(&sample(50.0, 50.0)), MotionUpdate::Reset);

        let p = est.pose();
        assert_eq!((p.x_cm, p.y_cm), (100.0, 95.0));
        assert_close(p.heading_rad, 3.0 * FRAC_PI_2);
        assert_eq!(est.current_node(), NodeId(2));
        assert_eq!(est.next_waypoint(), None);

        // Fusion restarts from the encoders at the reset
        time.advance(1.0);
        assert_eq!(est.update_from_motion(&sample(52.0, 52.0)), MotionUpdate::Fused);
        assert_close(est.pose().y_cm, 93.0);
    }

    #[test]
    fn test_reset_with_invalid_encoders() {
        let (mut est, time) = estimator(Pose::new(40.0, -30.0, 0.0));
        est.set_commanded_directions(FORWARD);

        time.advance(1.0);
        est.update_from_motion(&sample(0.0, 0.0));
        time.advance(1.0);
        est.update_from_motion(&sample(50.0, 50.0));
        assert_close(est.pose().x_cm, 90.0);

        // The travel before the reset must not be fused into the reset pose
        est.request_reset(Pose::new(40.0, -30.0, 0.0));
        time.advance(1.0);
        assert_eq!(
            est.update_from_motion(&sample(std::f64::NAN, 50.0)),
            MotionUpdate::Reset
        );

        time.advance(1.0);
        assert_eq!(
            est.update_from_motion(&sample(50.0, 50.0)),
            MotionUpdate::Frozen(FreezeReason::EncodersResynced)
        );
        assert_eq!(est.pose(), Pose::new(40.0, -30.0, 0.0));

        time.advance(1.0);
        assert_eq!(est.update_from_motion(&sample(52.0, 52.0)), MotionUpdate::Fused);
        assert_close(est.pose().x_cm, 42.0);
        assert_close(est.linear_speed_cms(), 2.0);
    }

    #[test]
    fn test_empty_map() {
        let clock = Arc::new(Clock::new(ManualTime::new(0.0)));
        assert!(matches!(
            PoseEstimator::new(
                LocParams::default(),
                Arc::new(Graph::default()),
                clock,
                Pose::default()
            ),
            Err(LocError::EmptyMap)
        ));
    }
}
