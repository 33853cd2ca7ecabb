//! Effect interfaces and their production handlers.
//!
//! # Effect Classification
//!
//! - **Category**: Infrastructure Effect
//! - **Usage**: every reducer that stamps `lastModified` / `lastHydrated`
//!
//! Reducers never read the wall clock directly. They ask the injected
//! [`ClockEffects`] handler, which keeps them deterministic under test
//! (see `slicekit-testkit::ManualClock`).

use crate::time::IsoTimestamp;
use chrono::{DateTime, FixedOffset, Local};

/// Timestamp source for envelope bookkeeping.
pub trait ClockEffects: Send + Sync {
    /// Current time, carrying the offset it should be reported in.
    fn now(&self) -> DateTime<FixedOffset>;

    /// Current time as an ISO-8601 string with explicit offset.
    fn now_iso(&self) -> IsoTimestamp {
        IsoTimestamp::from_datetime(&self.now())
    }
}

/// Real clock handler for production use
///
/// Reports local time with the local UTC offset.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Create a new system clock handler
    pub fn new() -> Self {
        Self
    }
}

impl ClockEffects for SystemClock {
    #[allow(clippy::disallowed_methods)]
    fn now(&self) -> DateTime<FixedOffset> {
        // Local::now() is allowed in production handlers that implement effect traits.
        let now = Local::now();
        now.with_timezone(now.offset())
    }
}
