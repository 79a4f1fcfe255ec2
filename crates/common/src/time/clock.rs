//! Clock trait and the system implementation

use std::fmt::Debug;
use std::time::Instant;

/// Source of monotonic time.
///
/// Implementations must be cheap to call; the token manager consults the
/// clock on every token request.
pub trait Clock: Debug + Send + Sync {
    /// Current monotonic instant.
    fn now(&self) -> Instant;
}

/// Real system clock. Use this in production code.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
