//! Bounded retry with exponential backoff for inference calls.

use crate::config::RetryConfig;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// Outcome of a single attempt, as seen by the retry loop.
#[derive(Debug)]
pub enum AttemptError<E> {
    /// May succeed if tried again (timeouts, throttling, upstream 5xx).
    Transient(E),
    Permanent(E),
}

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_retries: u32,
    initial_backoff: Duration,
    max_backoff: Duration,
    backoff_multiplier: f64,
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            initial_backoff: Duration::from_millis(config.initial_backoff_ms),
            max_backoff: Duration::from_millis(config.max_backoff_ms),
            backoff_multiplier: config.backoff_multiplier,
        }
    }
}

impl RetryPolicy {
    #[cfg(test)]
    pub fn none() -> Self {
        Self::from(&RetryConfig::default())
    }

    fn backoff_duration(&self, attempt: u32) -> Duration {
        let backoff =
            self.initial_backoff.as_millis() as f64 * self.backoff_multiplier.powi(attempt as i32);
        let backoff_ms = backoff.min(self.max_backoff.as_millis() as f64) as u64;

        // Up to 25% jitter
        let jitter = (backoff_ms as f64 * 0.25 * rand_jitter()) as u64;
        Duration::from_millis(backoff_ms + jitter)
    }

    /// Runs `operation` until it succeeds, fails permanently, or the retry
    /// budget is spent. The error of the last attempt is returned.
    pub async fn run<T, E, F, Fut>(&self, operation_name: &str, mut operation: F) -> Result<T, E>
    where
        E: std::fmt::Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AttemptError<E>>>,
    {
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(result) => {
                    if attempt > 0 {
                        info!(
                            operation = operation_name,
                            attempt = attempt + 1,
                            "Inference call succeeded after retry"
                        );
                    }
                    return Ok(result);
                }
                Err(AttemptError::Permanent(e)) => return Err(e),
                Err(AttemptError::Transient(e)) => {
                    if attempt >= self.max_retries {
                        if self.max_retries > 0 {
                            warn!(
                                operation = operation_name,
                                attempts = attempt + 1,
                                error = %e,
                                "Inference call failed after all retries"
                            );
                        }
                        return Err(e);
                    }

                    let backoff = self.backoff_duration(attempt);
                    warn!(
                        operation = operation_name,
                        attempt = attempt + 1,
                        max_retries = self.max_retries,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %e,
                        "Inference call failed, retrying"
                    );

                    sleep(backoff).await;
                    attempt += 1;
                }
            }
        }
    }
}

fn rand_jitter() -> f64 {
    use std::time::SystemTime;
    let nanos = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .subsec_nanos();
    (nanos % 1000) as f64 / 1000.0
}
