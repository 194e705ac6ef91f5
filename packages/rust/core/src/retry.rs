//! Retrying executor for remote calls.
//!
//! Only transient failures (see [`contentseed_shared::SeedError::is_transient`]) are retried.
//! The wait before retry `n` (0-based) is `initial_delay * 2^n`.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::warn;

use contentseed_shared::{Result, RetryConfig};

/// Retry settings for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(1000),
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            initial_delay: Duration::from_millis(config.initial_delay_ms),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (0-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.initial_delay
            .saturating_mul(2u32.saturating_pow(attempt))
    }

    /// Run `call` until it succeeds, fails with a non-transient error, or
    /// the retry budget is spent. The last error is returned unchanged.
    pub async fn execute<T, F, Fut>(&self, operation: &str, mut call: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0;
        loop {
            match call().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() && attempt < self.max_retries => {
                    let delay = self.delay_for(attempt);
                    attempt += 1;
                    warn!(
                        operation,
                        attempt,
                        max_retries = self.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "transient failure, retrying"
                    );
                    sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contentseed_shared::SeedError;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            initial_delay: Duration::from_millis(1),
        }
    }

    /// Fails transiently `failures` times, then returns the call number.
    async fn run(policy: RetryPolicy, failures: u32) -> (Result<u32>, u32) {
        let calls = AtomicU32::new(0);
        let result = policy
            .execute("test", || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < failures {
                        Err(SeedError::Transient(format!("failure {n}")))
                    } else {
                        Ok(n)
                    }
                }
            })
            .await;
        (result, calls.load(Ordering::SeqCst))
    }

    #[tokio::test]
    async fn succeeds_after_transient_failures_within_budget() {
        let (result, calls) = run(fast(3), 2).await;
        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls, 3);

        let (result, calls) = run(fast(3), 3).await;
        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls, 4);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let (result, calls) = run(fast(2), 5).await;
        assert_eq!(calls, 3);
        match result {
            Err(SeedError::Transient(msg)) => assert_eq!(msg, "failure 2"),
            other => panic!("expected last transient error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_transient_errors_are_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = fast(3)
            .execute("test", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async {
                    Err(SeedError::Remote {
                        status: 400,
                        message: "bad mutation".into(),
                    })
                }
            })
            .await;
        assert!(matches!(result, Err(SeedError::Remote { status: 400, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn delays_double() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(0), Duration::from_millis(1000));
        assert_eq!(policy.delay_for(1), Duration::from_millis(2000));
        assert_eq!(policy.delay_for(3), Duration::from_millis(8000));
    }

    #[test]
    fn from_config() {
        let config = RetryConfig {
            max_retries: 5,
            initial_delay_ms: 250,
        };
        let policy = RetryPolicy::from(&config);
        assert_eq!(policy.max_retries, 5);
        assert_eq!(policy.initial_delay, Duration::from_millis(250));
    }
}
