use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};

use crate::http::{HttpHeaders, header_get};

/// Remaining-quota level below which the client waits for the reset.
pub const LOW_WATER_MARK: usize = 50;

/// Extra wait added on top of the advertised reset time.
pub const RESET_SAFETY_MARGIN: Duration = Duration::from_secs(10);

/// Type alias for the governor rate limiter.
type GovernorRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Rate limit information reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitInfo {
    /// Maximum requests allowed per period, when the platform reports it.
    pub limit: Option<usize>,
    /// Remaining requests in current period.
    pub remaining: usize,
    /// When the rate limit resets.
    pub reset_at: DateTime<Utc>,
}

impl RateLimitInfo {
    pub fn is_low(&self) -> bool {
        self.remaining < LOW_WATER_MARK
    }

    /// How long to wait before the next request, if the quota is low.
    ///
    /// A reset time in the past still waits for the safety margin.
    pub fn backoff_delay(&self, now: DateTime<Utc>) -> Option<Duration> {
        if !self.is_low() {
            return None;
        }
        let until_reset = (self.reset_at - now).to_std().unwrap_or(Duration::ZERO);
        Some(until_reset + RESET_SAFETY_MARGIN)
    }
}

/// Extract rate limit info from `x-ratelimit-*` response headers.
///
/// Remaining and reset are required; a missing or garbled limit is left out.
pub fn parse_rate_limit_headers(headers: &HttpHeaders) -> Option<RateLimitInfo> {
    let limit = header_get(headers, "x-ratelimit-limit")
        .and_then(|value| value.trim().parse::<usize>().ok());
    let remaining = header_get(headers, "x-ratelimit-remaining")?
        .trim()
        .parse::<usize>()
        .ok()?;
    let reset_epoch = header_get(headers, "x-ratelimit-reset")?
        .trim()
        .parse::<i64>()
        .ok()?;
    let reset_at = DateTime::from_timestamp(reset_epoch, 0).unwrap_or_else(Utc::now);
    Some(RateLimitInfo {
        limit,
        remaining,
        reset_at,
    })
}

/// Default proactive pacing for GitHub (requests per second).
pub const GITHUB_DEFAULT_RPS: u32 = 10;

/// Client-side request pacing using the governor crate.
///
/// This complements the header-driven back-off: it keeps bursts from
/// draining the quota in the first place.
///
/// # Example
///
/// ```ignore
/// let limiter = ApiRateLimiter::new(10); // 10 requests per second
/// limiter.wait().await;
/// ```
#[derive(Clone)]
pub struct ApiRateLimiter {
    inner: Arc<GovernorRateLimiter>,
}

impl ApiRateLimiter {
    /// Create a new rate limiter. Zero is treated as one request per second.
    pub fn new(requests_per_second: u32) -> Self {
        let rps = NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::MIN);
        Self {
            inner: Arc::new(RateLimiter::direct(Quota::per_second(rps))),
        }
    }

    /// Wait until a request is allowed by the rate limiter.
    pub async fn wait(&self) {
        self.inner.until_ready().await;
    }
}

impl std::fmt::Debug for ApiRateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiRateLimiter").finish_non_exhaustive()
    }
}
