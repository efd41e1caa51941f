//! Market data API clients

pub mod quote_summary;
pub mod yahoo;

pub use yahoo::YahooFinanceClient;

use crate::config::ResearchConfig;
use crate::error::Result;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Retry schedule for upstream calls
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff_base: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff_base: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff_base,
        }
    }

    pub fn from_config(config: &ResearchConfig) -> Self {
        Self::new(config.max_retries, config.retry_backoff_base)
    }

    /// Delay before retrying after failed attempt `attempt` (0-based)
    pub fn delay(&self, attempt: u32) -> Duration {
        self.backoff_base * 2_u32.saturating_pow(attempt)
    }

    /// Run `operation` until it succeeds, fails with a non-retryable error,
    /// or the attempts are used up
    pub async fn run<T, F, Fut>(&self, what: &str, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt + 1 < self.max_attempts => {
                    let delay = self.delay(attempt);
                    warn!(
                        "{what} failed (attempt {}/{}): {e}; retrying in {delay:?}",
                        attempt + 1,
                        self.max_attempts
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
