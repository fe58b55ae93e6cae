//! Rate-limit retry
//!
//! Handlers that want to ride out provider throttling wrap their call in
//! [`RetryPolicy::run`]. Only HTTP 429 is retried; any other failure returns
//! immediately.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::errors::Error;

/// Fixed-delay retry budget for rate-limited calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: usize,
    /// Wait between attempts
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: usize, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Run `operation` until it succeeds, fails with something other than a
    /// rate limit, or the attempt budget is spent. Exhaustion yields
    /// [`Error::MaxRetriesExceeded`] naming `label`.
    pub async fn run<F, Fut, T>(&self, label: &str, operation: F) -> Result<T, Error>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, Error>>,
    {
        let mut attempts = 0;

        loop {
            attempts += 1;
            match operation().await {
                Ok(value) => {
                    if attempts > 1 {
                        debug!("{} succeeded after {} attempts", label, attempts);
                    }
                    return Ok(value);
                }
                Err(error) if error.is_rate_limited() => {
                    if attempts >= self.max_attempts {
                        warn!("{} still rate limited after {} attempts", label, attempts);
                        return Err(Error::MaxRetriesExceeded(label.to_string()));
                    }
                    debug!(
                        "Rate limited on {} (attempt {}/{}), retrying in {:?}",
                        label, attempts, self.max_attempts, self.delay
                    );
                    tokio::time::sleep(self.delay).await;
                }
                Err(error) => return Err(error),
            }
        }
    }
}
