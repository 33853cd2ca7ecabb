//! slicekit Testing Infrastructure
//!
//! Shared test setup for slicekit crates: a controllable clock, a small
//! application state with one slice of each kind, property-test
//! strategies, and a diagnostic sink that records what it is given.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! slicekit-testkit = { path = "../slicekit-testkit" }
//! ```
//!
//! ```rust,no_run
//! use slicekit_testkit::*;
//!
//! #[test]
//! fn my_test() {
//!     let clock = ManualClock::epoch();
//!     let (mut store, slices) = app_store(&clock);
//!     store.dispatch(slices.counter.actions.set(Counter { count: 2 })).unwrap();
//! }
//! ```

pub mod clock;
pub mod fixtures;
pub mod recorder;
pub mod strategies;

pub use clock::ManualClock;
pub use fixtures::*;
pub use recorder::RecordingSink;

/// Install a `tracing` subscriber honouring `RUST_LOG`, once per process.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
