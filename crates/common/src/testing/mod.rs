//! Test doubles for time and retry delays
//!
//! Available in this crate's own tests and, through the `test-utils`
//! feature, to downstream test suites.

pub mod sleeper;
pub mod time;

pub use sleeper::RecordingSleeper;
pub use time::MockClock;
