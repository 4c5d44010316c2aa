//! Bounded retry with fixed or exponential backoff.

use std::future::Future;
use std::time::Duration;

use crate::error::DirectLineError;

/// Retry policy configuration.
///
/// A `multiplier` of `1.0` gives a fixed delay between attempts; anything
/// larger grows the delay up to `max_backoff`. A `Retry-After` sent with a
/// rate limit raises the delay for that attempt; one longer than
/// `max_retry_after` ends retrying.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Initial backoff duration.
    pub initial_backoff: Duration,
    /// Maximum backoff duration.
    pub max_backoff: Duration,
    /// Backoff multiplier.
    pub multiplier: f64,
    /// Longest server-requested wait the policy will sit out.
    pub max_retry_after: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::fixed(3, Duration::from_secs(5))
    }
}

impl RetryPolicy {
    /// Fixed delay between a bounded number of attempts.
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            initial_backoff: delay,
            max_backoff: delay,
            multiplier: 1.0,
            max_retry_after: Duration::from_secs(60),
        }
    }

    /// Single attempt, no retry.
    pub fn none() -> Self {
        Self::fixed(1, Duration::ZERO)
    }

    /// Execute an async operation with retry.
    ///
    /// Only errors for which [`DirectLineError::is_retryable`] holds are
    /// retried; anything else is returned immediately.
    pub async fn execute<F, Fut, T>(&self, mut operation: F) -> Result<T, DirectLineError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, DirectLineError>>,
    {
        let mut backoff = self.initial_backoff;
        let mut last_error = None;

        for attempt in 0..self.max_attempts {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    if !e.is_retryable() || attempt + 1 >= self.max_attempts {
                        return Err(e);
                    }

                    let delay = match e.retry_after() {
                        Some(requested) if requested > self.max_retry_after => {
                            tracing::warn!(
                                retry_after_ms = requested.as_millis() as u64,
                                error = %e,
                                "Server asked to wait longer than allowed, giving up"
                            );
                            return Err(e);
                        }
                        Some(requested) => backoff.max(requested),
                        None => backoff,
                    };

                    tracing::warn!(
                        attempt = attempt + 1,
                        max_attempts = self.max_attempts,
                        backoff_ms = delay.as_millis() as u64,
                        error = %e,
                        "Retrying after error"
                    );

                    tokio::time::sleep(delay).await;

                    backoff = Duration::from_secs_f64(
                        (backoff.as_secs_f64() * self.multiplier)
                            .min(self.max_backoff.as_secs_f64()),
                    );

                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(DirectLineError::Timeout(0)))
    }
}
