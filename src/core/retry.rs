//! Bounded retry with exponential backoff
//!
//! The attempt/backoff/give-up state machine is an explicit policy object
//! invoked imperatively around the call site, so it is testable in isolation
//! from the model call itself. All errors are retried uniformly up to the
//! attempt cap; no non-retryable category is distinguished.

use crate::core::client::CallError;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error};

/// Error observed by the caller once the attempt cap is exhausted. Carries the
/// last attempt's underlying error; it is never silently swallowed.
#[derive(Error, Debug)]
pub enum RetryError {
    #[error("retries exhausted after {attempts} attempts: {source}")]
    Exhausted {
        attempts: u32,
        #[source]
        source: CallError,
    },
}

/// Retry policy: attempt cap plus a clamped exponential backoff schedule.
///
/// The wait before attempt `i` (1-based) is `clamp(base * 2^(i-1), min, max)`.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base: Duration,
    pub min_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base: Duration::from_secs(1),
            min_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Backoff before the given attempt number (the first attempt never
    /// waits, so `attempt >= 2`).
    pub fn delay_before(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(32);
        let raw = self
            .base
            .saturating_mul(1u32.checked_shl(exp).unwrap_or(u32::MAX));
        raw.clamp(self.min_delay, self.max_delay)
    }

    /// Run `op` until it succeeds or the attempt cap is reached. Each call of
    /// `op` is one attempt; validation failures inside `op` consume an attempt
    /// exactly like transport errors.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, RetryError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, CallError>>,
    {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match op().await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!(attempt, "call succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(err) => {
                    if attempt >= self.max_attempts {
                        error!(attempt, %err, "retries exhausted");
                        return Err(RetryError::Exhausted {
                            attempts: attempt,
                            source: err,
                        });
                    }
                    let delay = self.delay_before(attempt + 1);
                    debug!(attempt, %err, ?delay, "attempt failed, backing off");
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}
