//! Bounded retry for provider payloads that are occasionally malformed

use crate::error::TubeError;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Retry configuration
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total number of attempts, including the first
    pub max_attempts: u32,
    /// Pause between attempts
    pub delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            delay: Duration::ZERO,
        }
    }
}

/// Retry executor
#[derive(Debug, Clone, Default)]
pub struct RetryExecutor {
    config: RetryConfig,
}

impl RetryExecutor {
    /// Create a new retry executor with configuration
    pub fn with_config(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Get retry configuration
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Run `func` until it succeeds, fails with a non-retryable error, or the
    /// attempt budget is spent. The last error is returned.
    pub async fn execute<F, Fut, T>(&self, mut func: F) -> Result<T, TubeError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, TubeError>>,
    {
        let attempts = self.config.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            debug!("Attempt {}/{}", attempt, attempts);
            match func().await {
                Ok(result) => return Ok(result),
                Err(error) if error.is_retryable() && attempt < attempts => {
                    warn!("Attempt {} failed, retrying: {}", attempt, error);
                    if !self.config.delay.is_zero() {
                        tokio::time::sleep(self.config.delay).await;
                    }
                    attempt += 1;
                }
                Err(error) => return Err(error),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_retries_retryable_error_once() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let executor = RetryExecutor::default();

        let result: Result<u32, TubeError> = executor
            .execute(move || async move {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                if n == 0 {
                    Err(TubeError::ExtractionFailed("shape".to_string()))
                } else {
                    Ok(n)
                }
            })
            .await;

        assert_eq!(result.unwrap(), 1);
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_gives_up_after_budget() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let executor = RetryExecutor::default();

        let result: Result<(), TubeError> = executor
            .execute(move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(TubeError::ExtractionFailed("shape".to_string()))
            })
            .await;

        assert!(matches!(result, Err(TubeError::ExtractionFailed(_))));
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_non_retryable_error_is_returned_immediately() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let executor = RetryExecutor::with_config(RetryConfig {
            max_attempts: 5,
            delay: Duration::from_millis(1),
        });

        let result: Result<(), TubeError> = executor
            .execute(move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(TubeError::NotFound)
            })
            .await;

        assert!(matches!(result, Err(TubeError::NotFound)));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_retry_config_default() {
        let config = RetryConfig::default();
        assert_eq!(config.max_attempts, 2);
        assert!(config.delay.is_zero());
    }
}
