//! Time abstractions
//!
//! Token expiry is tracked against a [`Clock`] so tests can move time forward
//! without sleeping. Production code uses [`SystemClock`].

pub mod clock;

pub use clock::{Clock, SystemClock};
