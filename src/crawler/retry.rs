//! Bounded retry with exponential backoff
//!
//! Every failure is treated as retryable. After the last attempt the
//! operation's own error is returned unchanged.

use crate::config::RetryConfig;
use rand::Rng;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Immutable retry configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one
    pub max_attempts: u32,

    /// Backoff base in seconds
    pub base_delay: f64,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: f64) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, 1.0)
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self::new(config.max_attempts, config.base_delay)
    }
}

/// Runs fallible async operations under a [`RetryPolicy`]
#[derive(Debug, Clone, Default)]
pub struct RetryExecutor {
    policy: RetryPolicy,
}

impl RetryExecutor {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Deterministic part of the backoff before retry number `attempt + 1`
    ///
    /// `base_delay * 2^attempt` seconds.
    pub fn base_backoff(&self, attempt: u32) -> f64 {
        self.policy.base_delay * 2f64.powi(attempt.min(30) as i32)
    }

    /// Backoff with up to one second of uniform jitter added
    ///
    /// Saturates at `Duration::MAX`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let jitter: f64 = rand::thread_rng().gen_range(0.0..1.0);
        Duration::try_from_secs_f64(self.base_backoff(attempt) + jitter).unwrap_or(Duration::MAX)
    }

    /// Invokes `operation` until it succeeds or the attempts run out
    ///
    /// `operation` receives the zero-based attempt index. A policy with
    /// `max_attempts == 0` still runs the operation once.
    ///
    /// # Returns
    ///
    /// * `Ok(T)` - The first successful result
    /// * `Err(E)` - The error of the final attempt, unchanged
    pub async fn execute<T, E, F, Fut>(&self, mut operation: F) -> Result<T, E>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            match operation(attempt).await {
                Ok(value) => return Ok(value),
                Err(error) => {
                    if attempt + 1 >= max_attempts {
                        tracing::debug!("Giving up after {} attempts: {}", max_attempts, error);
                        return Err(error);
                    }

                    let delay = self.backoff(attempt);
                    tracing::warn!(
                        "Retry {}/{} after {:.2}s: {}",
                        attempt + 1,
                        max_attempts,
                        delay.as_secs_f64(),
                        error
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
