//! Retry with exponential backoff.

use std::{future::Future, time::Duration};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::pipeline::EnrichmentError;

/// How enrichment calls are retried.
///
/// Each attempt runs under `attempt_timeout_ms`. Only retryable errors are
/// retried, at most `max_retries` times, waiting
/// `initial_backoff_ms * backoff_multiplier ^ retry` capped at
/// `max_backoff_ms` between attempts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub backoff_multiplier: f64,
    pub max_backoff_ms: u64,
    pub attempt_timeout_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_backoff_ms: 200,
            backoff_multiplier: 2.0,
            max_backoff_ms: 2_000,
            attempt_timeout_ms: 5_000,
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `retry` (zero-based).
    pub fn delay(&self, retry: u32) -> Duration {
        let exponent = i32::try_from(retry).unwrap_or(i32::MAX);
        let millis = self.initial_backoff_ms as f64 * self.backoff_multiplier.powi(exponent);
        let capped = millis.min(self.max_backoff_ms as f64).max(0.0);
        Duration::from_millis(capped as u64)
    }

    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_millis(self.attempt_timeout_ms)
    }

    /// Runs `attempt` until it succeeds, fails with a non-retryable error, or
    /// the retries are used up.
    ///
    /// # Errors
    ///
    /// Returns the error of the last attempt. An attempt exceeding the
    /// timeout fails with [`EnrichmentError::Timeout`].
    pub async fn run<T, F, Fut>(&self, mut attempt: F) -> Result<T, EnrichmentError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, EnrichmentError>>,
    {
        let mut retry = 0;
        loop {
            let result = match tokio::time::timeout(self.attempt_timeout(), attempt()).await {
                Ok(result) => result,
                Err(_) => Err(EnrichmentError::Timeout),
            };

            match result {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && retry < self.max_retries => {
                    let delay = self.delay(retry);
                    debug!(
                        retry = retry + 1,
                        delay_ms = delay.as_millis() as u64,
                        err:% = err;
                        "Retrying enrichment"
                    );
                    tokio::time::sleep(delay).await;
                    retry += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    fn policy() -> RetryPolicy {
        RetryPolicy {
            initial_backoff_ms: 1,
            max_backoff_ms: 4,
            attempt_timeout_ms: 50,
            ..RetryPolicy::default()
        }
    }

    #[test]
    fn test_delay_grows_and_caps() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay(0), Duration::from_millis(200));
        assert_eq!(policy.delay(1), Duration::from_millis(400));
        assert_eq!(policy.delay(3), Duration::from_millis(1_600));
        assert_eq!(policy.delay(4), Duration::from_millis(2_000));
        assert_eq!(policy.delay(40), Duration::from_millis(2_000));
    }

    #[tokio::test]
    async fn test_retries_transient_errors() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result = policy()
            .run(move || async move {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(EnrichmentError::Unavailable("busy".into()))
                } else {
                    Ok(7)
                }
            })
            .await;
        assert_eq!(result, Ok(7));
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: Result<(), _> = policy()
            .run(move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(EnrichmentError::Unavailable("down".into()))
            })
            .await;
        assert!(matches!(result, Err(EnrichmentError::Unavailable(_))));
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_malformed_is_not_retried() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: Result<(), _> = policy()
            .run(move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(EnrichmentError::Malformed("garbage".into()))
            })
            .await;
        assert!(matches!(result, Err(EnrichmentError::Malformed(_))));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_attempt_times_out() {
        let policy = RetryPolicy {
            max_retries: 0,
            ..policy()
        };
        let result: Result<(), _> = policy
            .run(move || async move {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(())
            })
            .await;
        assert_eq!(result, Err(EnrichmentError::Timeout));
    }
}
