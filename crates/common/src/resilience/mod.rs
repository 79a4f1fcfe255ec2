//! Retry primitives
//!
//! The request executor owns the retry loop; this module supplies the pieces
//! it is built from:
//! - [`Backoff`]: the exponential delay schedule (`base * 2^attempt`)
//! - [`Sleeper`]: how a delay is actually waited out, swappable in tests

pub mod backoff;

pub use backoff::{Backoff, Sleeper, TokioSleeper};
