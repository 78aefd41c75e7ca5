use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::debug;
use tracing::warn;

use crate::Result;

/// Retry policy with exponential backoff for embedding API calls
///
/// Only rate-limit failures are retried; every other error returns
/// immediately. Backoff doubles per attempt and is clamped to the
/// configured floor and ceiling.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, counting the first call
    max_attempts: u32,
    /// Shortest wait between attempts, in seconds
    floor_secs: u64,
    /// Longest wait between attempts, in seconds
    ceiling_secs: u64,
}

impl RetryPolicy {
    #[must_use]
    pub const fn new(max_attempts: u32, floor_secs: u64, ceiling_secs: u64) -> Self {
        Self {
            max_attempts,
            floor_secs,
            ceiling_secs,
        }
    }

    /// Execute an async operation, retrying rate-limit failures
    pub async fn execute<F, Fut, T>(&self, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 1;

        loop {
            match operation().await {
                Ok(result) => {
                    if attempt > 1 {
                        debug!("Operation succeeded on attempt {}", attempt);
                    }
                    return Ok(result);
                }
                Err(err) => {
                    if err.is_rate_limited() && attempt < self.max_attempts {
                        let backoff = self.backoff(attempt);
                        warn!(
                            "Attempt {} was rate limited: {}. Retrying in {:?}...",
                            attempt, err, backoff
                        );

                        sleep(backoff).await;
                        attempt += 1;
                    } else {
                        return Err(err);
                    }
                }
            }
        }
    }

    /// Backoff for a given attempt: `2^attempt` seconds clamped to
    /// `[floor_secs, ceiling_secs]`
    fn backoff(&self, attempt: u32) -> Duration {
        let secs = 2_u64
            .saturating_pow(attempt)
            .min(self.ceiling_secs)
            .max(self.floor_secs);

        Duration::from_secs(secs)
    }
}
