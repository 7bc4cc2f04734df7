//! Clock abstraction so attempt bookkeeping can be tested without sleeping.
//!
//! ```
//! use std::time::Duration;
//!
//! use recipebox_common::time::{Clock, MockClock};
//!
//! let clock = MockClock::new();
//! let start = clock.now();
//! clock.advance(Duration::from_secs(5));
//! assert_eq!(clock.now().duration_since(start), Duration::from_secs(5));
//! ```

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

/// Source of monotonic and wall-clock time.
pub trait Clock: Send + Sync {
    /// Monotonic instant, used for measuring elapsed time.
    fn now(&self) -> Instant;

    /// Wall-clock time, used for timestamps shown to users or logs.
    fn utc_now(&self) -> DateTime<Utc>;
}

/// Real system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn utc_now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually advanced clock for deterministic tests.
///
/// Clones share the same elapsed time, so a clock handed to a component can
/// still be advanced from the test body.
#[derive(Debug, Clone)]
pub struct MockClock {
    start: Instant,
    base_utc: DateTime<Utc>,
    elapsed: Arc<Mutex<Duration>>,
}

impl MockClock {
    /// Create a mock clock anchored at the current real time.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            base_utc: Utc::now(),
            elapsed: Arc::new(Mutex::new(Duration::ZERO)),
        }
    }

    /// Move the clock forward without waiting.
    pub fn advance(&self, duration: Duration) {
        let mut elapsed = self.elapsed.lock().unwrap_or_else(PoisonError::into_inner);
        *elapsed += duration;
    }

    /// Total simulated time since creation.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        *self.elapsed.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn now(&self) -> Instant {
        self.start + self.elapsed()
    }

    fn utc_now(&self) -> DateTime<Utc> {
        // chrono::Duration::from_std only fails past ~292 billion years
        self.base_utc + chrono::Duration::from_std(self.elapsed()).unwrap_or(chrono::Duration::MAX)
    }
}
