//! Exponential backoff for advisory requests.
//!
//! Rate limiting (HTTP 429) and transport/decoding failures are retried;
//! everything else is returned as-is.

use std::future::Future;
use std::time::Duration;

use crate::config::AiConfig;
use crate::{Error, Result};

/// How many attempts to make and how long to wait between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &AiConfig) -> Self {
        Self {
            max_attempts: config.max_retries.max(1),
            base_delay: Duration::from_millis(config.base_delay_ms),
        }
    }

    /// Delay after the `attempt`-th failure (1-based)
    ///
    /// Base delay: 1000ms, doubling each attempt
    /// Delays: 1000ms, 2000ms, 4000ms
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt.saturating_sub(1))
    }
}

/// Check if an advisory error is worth another attempt
pub fn is_retryable(err: &Error) -> bool {
    matches!(
        err,
        Error::Http(_) | Error::RateLimited(_) | Error::HttpStatus(_) | Error::Json(_) | Error::Io(_)
    )
}

/// Run `operation` until it succeeds, fails permanently, or the attempts
/// run out. Exhaustion is reported as `Failed to fetch <what>`.
pub async fn with_backoff<F, Fut, T>(policy: &RetryPolicy, what: &str, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempts = 0;
    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) if is_retryable(&e) => {
                attempts += 1;
                if attempts >= policy.max_attempts {
                    tracing::warn!(error = %e, attempts, "giving up on {}", what);
                    return Err(Error::Advisor(format!(
                        "Failed to fetch {}. Please try again.",
                        what
                    )));
                }
                let delay = policy.backoff_delay(attempts);
                tracing::warn!(
                    error = %e,
                    attempt = attempts,
                    max_attempts = policy.max_attempts,
                    delay_ms = delay.as_millis(),
                    "Advisory request failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_backoff_delay() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff_delay(1), Duration::from_millis(1000));
        assert_eq!(policy.backoff_delay(2), Duration::from_millis(2000));
        assert_eq!(policy.backoff_delay(3), Duration::from_millis(4000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_after_rate_limit() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let started = tokio::time::Instant::now();

        let result = with_backoff(&RetryPolicy::default(), "explanation", move || async move {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(Error::RateLimited(429))
            } else {
                Ok("done")
            }
        })
        .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // 1000ms + 2000ms of backoff, give or take timer granularity
        let waited = started.elapsed();
        assert!(waited >= Duration::from_millis(3000) && waited < Duration::from_millis(3100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_max_attempts() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: Result<()> = with_backoff(&RetryPolicy::default(), "quiz", move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(Error::HttpStatus(500))
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch quiz. Please try again.");
    }

    #[tokio::test]
    async fn test_permanent_error_not_retried() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: Result<()> = with_backoff(&RetryPolicy::default(), "quiz", move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(Error::Advisor("bad key".to_string()))
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(Error::Advisor(msg)) if msg == "bad key"));
    }
}
