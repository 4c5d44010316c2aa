//! Deadline-bounded polling.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use crate::error::DirectLineError;

/// How long to keep polling for a result, and how often.
#[derive(Debug, Clone, PartialEq)]
pub struct PollPolicy {
    /// Total time budget, measured from the first poll.
    pub deadline: Duration,
    /// Pause between polls.
    pub interval: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            deadline: Duration::from_secs(10),
            interval: Duration::from_secs(1),
        }
    }
}

impl PollPolicy {
    /// Poll exactly once.
    pub fn once() -> Self {
        Self {
            deadline: Duration::ZERO,
            interval: Duration::ZERO,
        }
    }

    /// Run `operation` until it yields `Some`, or the deadline passes.
    ///
    /// Each poll is cut off at the remaining deadline and counts as a
    /// `Timeout` failure. Errors from individual polls are logged and polling
    /// continues. Returns
    /// `Ok(None)` at the deadline if at least one poll succeeded, otherwise the
    /// last error seen. At least one poll is always made.
    pub async fn run<F, Fut, T>(&self, mut operation: F) -> Result<Option<T>, DirectLineError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Option<T>, DirectLineError>>,
    {
        let started = Instant::now();
        let mut polls = 0u32;
        let mut any_success = false;
        let mut last_error = None;

        loop {
            polls += 1;
            let remaining = self.deadline.saturating_sub(started.elapsed());
            let outcome = if remaining.is_zero() {
                operation().await
            } else {
                match tokio::time::timeout(remaining, operation()).await {
                    Ok(outcome) => outcome,
                    Err(_) => Err(DirectLineError::Timeout(remaining.as_millis() as u64)),
                }
            };

            match outcome {
                Ok(Some(value)) => {
                    tracing::debug!(polls, "Poll produced a result");
                    return Ok(Some(value));
                }
                Ok(None) => any_success = true,
                Err(e) => {
                    tracing::warn!(poll = polls, error = %e, "Poll failed");
                    last_error = Some(e);
                }
            }

            if started.elapsed() + self.interval > self.deadline {
                break;
            }
            tokio::time::sleep(self.interval).await;
        }

        tracing::debug!(polls, "Poll deadline reached without a result");
        match last_error {
            Some(e) if !any_success => Err(e),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn stops_at_first_result() {
        let policy = PollPolicy {
            deadline: Duration::from_secs(10),
            interval: Duration::from_secs(1),
        };
        let calls = Arc::new(AtomicUsize::new(0));

        let result = policy
            .run(|| {
                let calls = calls.clone();
                async move {
                    let n = calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, DirectLineError>((n == 2).then_some("done"))
                }
            })
            .await;

        assert_eq!(result.unwrap(), Some("done"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn returns_none_after_deadline() {
        let policy = PollPolicy {
            deadline: Duration::from_secs(3),
            interval: Duration::from_secs(1),
        };
        let calls = Arc::new(AtomicUsize::new(0));

        let result = policy
            .run(|| {
                let calls = calls.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<Option<()>, DirectLineError>(None)
                }
            })
            .await;

        assert!(matches!(result, Ok(None)));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn once_polls_a_single_time() {
        let calls = Arc::new(AtomicUsize::new(0));
        let result = PollPolicy::once()
            .run(|| {
                let calls = calls.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<Option<()>, DirectLineError>(None)
                }
            })
            .await;

        assert!(matches!(result, Ok(None)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn only_failures_surface_the_last_error() {
        let policy = PollPolicy {
            deadline: Duration::from_secs(2),
            interval: Duration::from_secs(1),
        };

        let result = policy
            .run(|| async { Err::<Option<()>, _>(DirectLineError::api(500, "boom")) })
            .await;

        assert!(matches!(result, Err(DirectLineError::Api { status: 500, .. })));
    }
}
