//! Exponential backoff for calls to rate-limited upstreams.

use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Attempts after the first one.
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub factor: u32,
    /// Extra random delay as a fraction of the computed one (0.0 disables it).
    pub jitter: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_retries: 2,
            initial_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(30),
            factor: 2,
            jitter: 0.1,
        }
    }
}

impl RetryPolicy {
    pub fn without_jitter(mut self) -> Self {
        self.jitter = 0.0;
        self
    }

    /// Backoff before retry number `retry` (0-based), capped at `max_delay`.
    pub fn delay_for(&self, retry: u32) -> Duration {
        let multiplier = self.factor.saturating_pow(retry);
        let base = self
            .initial_delay
            .saturating_mul(multiplier)
            .min(self.max_delay);
        if self.jitter <= 0.0 {
            return base;
        }
        let extra = base.mul_f64(rand::thread_rng().gen_range(0.0..self.jitter));
        (base + extra).min(self.max_delay)
    }

    /// Runs `operation` until it succeeds, fails with an error `is_retryable`
    /// rejects, or the retries are used up. The last error is returned.
    pub async fn run<T, E, F, Fut, R>(&self, mut operation: F, is_retryable: R) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        R: Fn(&E) -> bool,
        E: std::fmt::Display,
    {
        let mut retry = 0;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if retry < self.max_retries && is_retryable(&e) => {
                    let delay = self.delay_for(retry);
                    warn!(
                        "Attempt {} failed: {}. Retrying in {:?}",
                        retry + 1,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    retry += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
