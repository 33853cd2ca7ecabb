//! Controllable clock for deterministic envelope timestamps.

use chrono::{DateTime, Duration, FixedOffset};
use parking_lot::Mutex;
use slicekit_core::ClockEffects;
use std::sync::Arc;

/// Clock that only moves when told to.
///
/// Clones share the same time, so a test can keep one handle and give
/// another to a slice.
#[derive(Debug, Clone)]
pub struct ManualClock {
    current: Arc<Mutex<DateTime<FixedOffset>>>,
}

impl ManualClock {
    /// Start at the given RFC 3339 instant.
    pub fn at(rfc3339: &str) -> Self {
        let start = DateTime::parse_from_rfc3339(rfc3339).expect("valid RFC 3339 start time");
        Self {
            current: Arc::new(Mutex::new(start)),
        }
    }

    /// Start at the Unix epoch in UTC.
    pub fn epoch() -> Self {
        Self::at("1970-01-01T00:00:00.000+00:00")
    }

    /// Advance by `seconds`.
    pub fn advance_secs(&self, seconds: i64) {
        self.advance(Duration::seconds(seconds));
    }

    /// Advance by an arbitrary duration.
    pub fn advance(&self, by: Duration) {
        let mut current = self.current.lock();
        *current += by;
    }

    /// Jump to an absolute RFC 3339 instant.
    pub fn set(&self, rfc3339: &str) {
        *self.current.lock() =
            DateTime::parse_from_rfc3339(rfc3339).expect("valid RFC 3339 time");
    }
}

impl ClockEffects for ManualClock {
    fn now(&self) -> DateTime<FixedOffset> {
        *self.current.lock()
    }
}
