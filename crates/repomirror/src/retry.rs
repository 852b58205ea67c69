//! Retry policy for whole sync jobs.
//!
//! Jobs are retried as a unit with a constant delay; the job itself has no
//! retry logic of its own.

use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use backon::{ConstantBuilder, Retryable};

/// Retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: usize = 5;
/// Pause between attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(300);

/// How often and how far apart a failed job is re-run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: usize,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn new(max_retries: usize, delay: Duration) -> Self {
        Self { max_retries, delay }
    }

    /// A policy that runs the job exactly once.
    #[must_use]
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// Build a constant backoff strategy from this policy.
    #[must_use]
    pub fn into_backoff(self) -> ConstantBuilder {
        ConstantBuilder::default()
            .with_delay(self.delay)
            .with_max_times(self.max_retries)
    }
}

/// Run `operation` until it succeeds, fails terminally, or the policy is
/// exhausted.
///
/// `on_retry` sees the error, the attempt that produced it (1-based) and the
/// delay before the next one. Returns the final result together with the
/// number of attempts made.
pub async fn with_retry<T, E, F, Fut, IsRetryable, OnRetry>(
    mut operation: F,
    policy: RetryPolicy,
    is_retryable: IsRetryable,
    on_retry: OnRetry,
) -> (Result<T, E>, u32)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    IsRetryable: Fn(&E) -> bool,
    OnRetry: Fn(&E, u32, Duration),
{
    let attempt = AtomicU32::new(0);

    let retry_op = || {
        attempt.fetch_add(1, Ordering::SeqCst);
        operation()
    };

    let result = retry_op
        .retry(policy.into_backoff())
        .when(|err| is_retryable(err))
        .notify(|err, dur| {
            let current_attempt = attempt.load(Ordering::SeqCst);
            tracing::debug!(
                attempt = current_attempt,
                delay_secs = dur.as_secs(),
                error = %err,
                "Retrying after failure"
            );
            on_retry(err, current_attempt, dur);
        })
        .await;

    (result, attempt.load(Ordering::SeqCst))
}
