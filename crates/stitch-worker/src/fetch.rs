//! Bounded-retry asset fetching.
//!
//! One policy, applied uniformly by every download call site: frames, audio
//! chunks, and the metadata document all go through [`AssetFetcher`].

use std::future::Future;
use std::time::Duration;

use tracing::debug;

use stitch_storage::{BlobClient, StorageError};

use crate::error::JobError;

/// Bounded retry with linearly increasing backoff.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Backoff unit; the sleep after attempt `n` is `n * unit_delay`.
    pub unit_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            unit_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// Delay slept after the given 1-based attempt fails.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.unit_delay.saturating_mul(attempt)
    }
}

/// Error and attempt count of an exhausted retry loop.
#[derive(Debug)]
pub struct RetryFailure<E> {
    pub error: E,
    pub attempts: u32,
}

/// Run `operation` until it succeeds, the policy is exhausted, or an error
/// is not worth retrying.
pub async fn retry_with_backoff<F, Fut, T, E>(
    policy: &RetryPolicy,
    operation_name: &str,
    is_retryable: impl Fn(&E) -> bool,
    operation: F,
) -> Result<T, RetryFailure<E>>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt = 0u32;

    loop {
        attempt += 1;
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < policy.max_attempts && is_retryable(&e) => {
                let delay = policy.delay_after(attempt);
                debug!(
                    "{} attempt {} failed, retrying in {:?}: {}",
                    operation_name, attempt, delay, e
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => {
                return Err(RetryFailure {
                    error: e,
                    attempts: attempt,
                })
            }
        }
    }
}

/// Retrieves single named blobs for one job's container.
pub struct AssetFetcher<'a> {
    client: &'a BlobClient,
    container: &'a str,
    policy: RetryPolicy,
}

impl<'a> AssetFetcher<'a> {
    pub fn new(client: &'a BlobClient, container: &'a str, policy: RetryPolicy) -> Self {
        Self {
            client,
            container,
            policy,
        }
    }

    /// Fetch one blob, retrying transient failures.
    ///
    /// The caller decides whether the resulting `AssetUnavailable` is fatal
    /// or a tracked omission.
    pub async fn fetch(&self, key: &str) -> Result<Vec<u8>, JobError> {
        retry_with_backoff(&self.policy, key, StorageError::is_retryable, || {
            self.client.download_bytes(self.container, key)
        })
        .await
        .map_err(|failure| JobError::AssetUnavailable {
            key: key.to_string(),
            attempts: failure.attempts,
            source: failure.error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            unit_delay: Duration::from_millis(1),
        }
    }

    #[test]
    fn test_linear_backoff_delays() {
        let policy = RetryPolicy {
            max_attempts: 3,
            unit_delay: Duration::from_millis(500),
        };

        assert_eq!(policy.delay_after(1), Duration::from_millis(500));
        assert_eq!(policy.delay_after(2), Duration::from_millis(1000));
        assert_eq!(policy.delay_after(3), Duration::from_millis(1500));
    }

    #[tokio::test]
    async fn test_immediate_success_makes_one_attempt() {
        let calls = AtomicU32::new(0);

        let result = retry_with_backoff(&fast_policy(), "test", |_: &String| true, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, String>(42) }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_transient_failure_eventually_succeeds() {
        let calls = AtomicU32::new(0);

        let result = retry_with_backoff(&fast_policy(), "test", |_: &&str| true, || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err("transient")
                } else {
                    Ok(7)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhaustion_reports_attempt_count() {
        let calls = AtomicU32::new(0);

        let result = retry_with_backoff(&fast_policy(), "test", |_: &&str| true, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<u32, _>("still down") }
        })
        .await;

        let failure = result.unwrap_err();
        assert_eq!(failure.attempts, 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_retryable_error_short_circuits() {
        let calls = AtomicU32::new(0);

        let result = retry_with_backoff(&fast_policy(), "test", |_: &&str| false, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<u32, _>("gone for good") }
        })
        .await;

        let failure = result.unwrap_err();
        assert_eq!(failure.attempts, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
