//! Worker configuration.

use std::path::PathBuf;
use std::time::Duration;

use crate::fetch::RetryPolicy;

/// Per-process pipeline configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Root under which each job creates its own working directory
    pub work_dir: PathBuf,
    /// Retry policy applied to every asset download
    pub retry: RetryPolicy,
    /// Lifetime of the presigned artifact reference
    pub url_expiry: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("/tmp/framestitch"),
            retry: RetryPolicy::default(),
            url_expiry: Duration::from_secs(7 * 24 * 3600),
        }
    }
}

impl WorkerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            work_dir: std::env::var("WORKER_WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.work_dir),
            retry: RetryPolicy {
                max_attempts: std::env::var("FETCH_MAX_ATTEMPTS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.retry.max_attempts),
                unit_delay: Duration::from_millis(
                    std::env::var("FETCH_BACKOFF_MS")
                        .ok()
                        .and_then(|s| s.parse().ok())
                        .unwrap_or(defaults.retry.unit_delay.as_millis() as u64),
                ),
            },
            url_expiry: Duration::from_secs(
                std::env::var("ARTIFACT_URL_EXPIRY_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.url_expiry.as_secs()),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WorkerConfig::default();
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.unit_delay, Duration::from_millis(500));
        assert_eq!(config.url_expiry, Duration::from_secs(604_800));
    }
}
