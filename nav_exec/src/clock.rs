//! # System clock
//!
//! Monotonic time shared by the whole executable. Each consumer (for example the motion and
//! vision update streams of the [`crate::loc::PoseEstimator`]) registers for its own
//! [`ClockId`], which gives it a private "time since my last call" cursor unaffected by how
//! often any other consumer queries the clock.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A source of monotonic time.
pub trait TimeSource: Send + Sync {
    /// Seconds since an arbitrary, fixed origin. Must never decrease.
    fn now_s(&self) -> f64;
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Identifies one consumer's cursor in the [`Clock`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClockId(usize);

/// Process-wide clock with per-consumer cursors.
pub struct Clock {
    source: Box<dyn TimeSource>,

    /// Time at which each consumer last asked for its elapsed time.
    cursors: Mutex<HashMap<ClockId, f64>>,

    next_id: AtomicUsize,
}

/// Wall-clock time source backed by [`std::time::Instant`].
#[derive(Debug, Clone, Copy)]
pub struct MonotonicTime {
    origin: Instant,
}

/// A time source which only moves when told to.
///
/// Used by the simulator and the tests so that a run is fully deterministic.
#[derive(Debug, Default)]
pub struct ManualTime {
    now_bits: AtomicU64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Clock {
    pub fn new<S: TimeSource + 'static>(source: S) -> Self {
        Self {
            source: Box::new(source),
            cursors: Mutex::new(HashMap::new()),
            next_id: AtomicUsize::new(0),
        }
    }

    /// Create a clock running on wall-clock time.
    pub fn monotonic() -> Self {
        Self::new(MonotonicTime::new())
    }

    /// Current time of the underlying source.
    pub fn now_s(&self) -> f64 {
        self.source.now_s()
    }

    /// Register a new consumer. Its cursor starts at the current time.
    pub fn register(&self) -> ClockId {
        let id = ClockId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let now = self.now_s();
        self.lock_cursors().insert(id, now);
        id
    }

    /// Get the number of seconds since the last call to this function with the same `id`, or since
    /// the `id` was registered if this is the first call.
    ///
    /// An unknown `id` is registered on the spot and `0.0` is returned.
    pub fn elapsed_since_last_call(&self, id: ClockId) -> f64 {
        let now = self.now_s();
        let mut cursors = self.lock_cursors();

        match cursors.insert(id, now) {
            Some(last) => (now - last).max(0.0),
            None => 0.0,
        }
    }

    fn lock_cursors(&self) -> MutexGuard<'_, HashMap<ClockId, f64>> {
        // Cursors are plain timestamps, a panic while holding the lock cannot leave them torn.
        match self.cursors.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl MonotonicTime {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicTime {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicTime {
    fn now_s(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

impl ManualTime {
    pub fn new(start_s: f64) -> Self {
        Self {
            now_bits: AtomicU64::new(start_s.to_bits()),
        }
    }

    /// Move time forward by `dt_s` seconds. Negative steps are ignored.
    pub fn advance(&self, dt_s: f64) {
        if !(dt_s > 0.0) {
            return;
        }

        // The closure always returns Some so the update cannot fail
        let _ = self
            .now_bits
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |bits| {
                Some((f64::from_bits(bits) + dt_s).to_bits())
            });
    }
}

impl TimeSource for ManualTime {
    fn now_s(&self) -> f64 {
        f64::from_bits(self.now_bits.load(Ordering::SeqCst))
    }
}

impl<T: TimeSource + ?Sized> TimeSource for Arc<T> {
    fn now_s(&self) -> f64 {
        (**self).now_s()
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_independent_cursors() {
        let time = Arc::new(ManualTime::new(10.0));
        let clock = Clock::new(time.clone());

        let motion = clock.register();
        let vision = clock.register();
        assert_ne!(motion, vision);

        time.advance(0.5);
        assert_eq!(clock.elapsed_since_last_call(motion), 0.5);

        time.advance(0.25);
        assert_eq!(clock.elapsed_since_last_call(motion), 0.25);

        // The vision cursor hasn't moved since registration
        assert_eq!(clock.elapsed_since_last_call(vision), 0.75);

        // Back to back calls with no time passing give zero
        assert_eq!(clock.elapsed_since_last_call(vision), 0.0);
    }

    #[test]
    fn test_unknown_id() {
        let clock = Clock::new(ManualTime::new(0.0));
        assert_eq!(clock.elapsed_since_last_call(ClockId(42)), 0.0);
    }

    #[test]
    fn test_manual_time_ignores_negative_steps() {
        let time = ManualTime::new(1.0);
        time.advance(-1.0);
        time.advance(std::f64::NAN);
        assert_eq!(time.now_s(), 1.0);
        time.advance(2.0);
        assert_eq!(time.now_s(), 3.0);
    }

    #[test]
    fn test_monotonic_clock() {
        let clock = Clock::monotonic();
        let id = clock.register();
        let a = clock.elapsed_since_last_call(id);
        let b = clock.elapsed_since_last_call(id);
        assert!(a >= 0.0 && b >= 0.0);
    }
}
