//! Obstacle detection debouncing

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{debug, info};

use super::LocParams;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Filters single close readings out of the range finder data.
///
/// An obstacle is only reported once `obstacle_detected_cycle_threshold` consecutive readings are
/// below `obstacle_threshold_cm`. A single reading at or above the threshold clears the detection
/// straight away.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObstacleDebounce {
    /// Number of consecutive close readings, saturating at the cycle threshold.
    counter: u32,

    detected: bool,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ObstacleDebounce {
    /// Feed one reading into the filter, returning whether an obstacle is now detected.
    pub fn update(&mut self, distance_cm: f64, params: &LocParams) -> bool {
        if distance_cm < params.obstacle_threshold_cm {
            self.counter = (self.counter + 1).min(params.obstacle_detected_cycle_threshold);

            if !self.detected && self.counter >= params.obstacle_detected_cycle_threshold {
                info!("Obstacle detected at {:.1} cm", distance_cm);
                self.detected = true;
            }
        } else {
            if self.detected {
                info!("Obstacle cleared");
            } else if self.counter > 0 {
                debug!("Obstacle debounce reset after {} close readings", self.counter);
            }
            self.counter = 0;
            self.detected = false;
        }

        self.detected
    }

    pub fn detected(&self) -> bool {
        self.detected
    }

    pub fn counter(&self) -> u32 {
        self.counter
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_debounce() {
        let params = LocParams::default();
        let n = params.obstacle_detected_cycle_threshold;
        let mut d = ObstacleDebounce::default();

        // One short of the threshold, then a far reading
        for _ in 0..(n - 1) {
            assert!(!d.update(10.0, &params));
        }
        assert!(!d.update(params.obstacle_threshold_cm, &params));
        assert_eq!(d.counter(), 0);

        // Exactly the threshold
        for i in 0..n {
            assert_eq!(d.update(10.0, &params), i == n - 1);
        }

        // Keeps detecting without the counter growing
        for _ in 0..5 {
            assert!(d.update(10.0, &params));
        }
        assert_eq!(d.counter(), n);

        // A single far reading clears it
        assert!(!d.update(200.0, &params));
        assert!(!d.detected());
        assert_eq!(d.counter(), 0);
    }
}
