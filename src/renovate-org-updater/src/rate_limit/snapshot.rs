//! Rate limit snapshot taken from a single API response.

use serde::Serialize;
use std::time::Duration;

/// Rate limit state reported alongside an API response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateLimitSnapshot {
    /// Requests remaining in the current window.
    pub remaining: u32,

    /// Total requests allowed per window.
    pub limit: u32,

    /// Unix timestamp when the rate limit resets.
    pub reset: u64,
}

impl RateLimitSnapshot {
    /// Returns true when no requests are left in the current window.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Time left until the window resets, clamped to zero.
    #[must_use]
    pub fn until_reset(&self, now: u64) -> Duration {
        Duration::from_secs(self.reset.saturating_sub(now))
    }
}
