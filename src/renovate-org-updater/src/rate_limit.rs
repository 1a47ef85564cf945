//! Rate limiting utilities for GitHub API.
//!
//! Every API response carries `x-ratelimit-*` metadata. The [`RateLimiter`]
//! turns a [`RateLimitSnapshot`] into a decision: keep going, warn that the
//! budget is running low, or suspend until the window resets. Callers that
//! suspend are expected to retry the same operation afterwards.

mod snapshot;

pub use snapshot::RateLimitSnapshot;

use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

/// Remaining requests below which a warning is emitted.
pub const LOW_WATER_MARK: u32 = 100;

/// Shortest wait before retrying a rejected request.
///
/// A rejection whose reset is already in the past (local clock ahead of the
/// server) still backs off for this long.
pub const MIN_RETRY_WAIT: Duration = Duration::from_secs(1);

/// What to do after observing a rate limit snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    /// Plenty of budget left.
    Proceed,

    /// Budget is low but not exhausted.
    Warn {
        /// Requests remaining in the current window.
        remaining: u32,
    },

    /// Budget is exhausted; block for the given duration, then retry.
    Suspend(Duration),
}

/// Decides whether API calls must wait for the rate limit window to reset.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    low_water_mark: u32,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(LOW_WATER_MARK)
    }
}

impl RateLimiter {
    /// Creates a limiter warning when fewer than `low_water_mark` requests remain.
    #[must_use]
    pub fn new(low_water_mark: u32) -> Self {
        Self { low_water_mark }
    }

    /// Decides against the current wall clock.
    #[must_use]
    pub fn decide(&self, snapshot: &RateLimitSnapshot) -> RateLimitDecision {
        self.decide_at(snapshot, unix_now())
    }

    /// Decides against an explicit unix timestamp.
    ///
    /// An exhausted snapshot whose reset time has already passed yields
    /// [`RateLimitDecision::Proceed`]: the window has rolled over.
    #[must_use]
    pub fn decide_at(&self, snapshot: &RateLimitSnapshot, now: u64) -> RateLimitDecision {
        if snapshot.is_exhausted() {
            let wait = snapshot.until_reset(now);
            if wait.is_zero() {
                return RateLimitDecision::Proceed;
            }
            return RateLimitDecision::Suspend(wait);
        }

        if snapshot.remaining < self.low_water_mark {
            return RateLimitDecision::Warn {
                remaining: snapshot.remaining,
            };
        }

        RateLimitDecision::Proceed
    }

    /// Evaluates the metadata of a response, sleeping if the budget is exhausted.
    ///
    /// # Returns
    ///
    /// Returns `true` if we waited, `false` if no wait was needed.
    pub async fn observe(&self, rate: Option<&RateLimitSnapshot>) -> bool {
        let Some(snapshot) = rate else {
            return false;
        };

        debug!(
            remaining = snapshot.remaining,
            limit = snapshot.limit,
            "Rate limit status"
        );

        match self.decide(snapshot) {
            RateLimitDecision::Proceed => false,
            RateLimitDecision::Warn { remaining } => {
                warn!(
                    remaining,
                    limit = snapshot.limit,
                    "Approaching rate limit"
                );
                false
            }
            RateLimitDecision::Suspend(wait) => {
                sleep_until_reset(snapshot, wait).await;
                true
            }
        }
    }

    /// Waits out an explicit rate limit rejection.
    ///
    /// Unlike [`RateLimiter::observe`], this always returns after the reset
    /// time so the rejected request can be retried once. The wait is never
    /// shorter than [`MIN_RETRY_WAIT`].
    pub async fn wait_for_reset(&self, snapshot: &RateLimitSnapshot) -> Duration {
        let wait = snapshot.until_reset(unix_now()).max(MIN_RETRY_WAIT);
        sleep_until_reset(snapshot, wait).await;
        wait
    }
}

async fn sleep_until_reset(snapshot: &RateLimitSnapshot, wait: Duration) {
    info!(
        wait_secs = wait.as_secs(),
        reset_at = snapshot.reset,
        "Rate limit reached, waiting for reset"
    );
    tokio::time::sleep(wait).await;
}

/// Current unix time in seconds.
pub(crate) fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
