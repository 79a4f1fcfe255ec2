//! Exponential backoff schedule and sleep abstraction

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;

/// Exponential backoff: the delay before retry `attempt` (0-based) is
/// `base * 2^attempt`, so the schedule runs base, 2x, 4x, ...
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    base: Duration,
}

impl Backoff {
    #[must_use]
    pub const fn new(base: Duration) -> Self {
        Self { base }
    }

    #[must_use]
    pub const fn base(&self) -> Duration {
        self.base
    }

    /// Delay to wait after failed attempt number `attempt` (0-based).
    /// Saturates at [`Duration::MAX`] once `2^attempt` leaves `u32`.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        match 2_u32.checked_pow(attempt) {
            Some(factor) => self.base.saturating_mul(factor),
            None if self.base.is_zero() => Duration::ZERO,
            None => Duration::MAX,
        }
    }
}

/// Waits out a retry delay.
#[async_trait]
pub trait Sleeper: Debug + Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// [`Sleeper`] backed by `tokio::time::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}
