use std::thread;
use std::time::Duration;

use super::error::{FengliError, RetryError};
use crate::core::BotConfig;

/// Fixed-count, fixed-delay retry. No backoff and no jitter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            delay: Duration::from_secs(3),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries, delay }
    }

    pub fn from_config(config: &BotConfig) -> Self {
        Self::new(
            config.max_retries,
            Duration::from_secs(config.retry_delay_secs),
        )
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }
}

/// Run `op` until it succeeds or the policy runs out of retries. `op`
/// receives the 1-based attempt number.
///
/// Every error kind is retried, including `InvalidTranscript`, which
/// cannot succeed on a later attempt. Changing that is a product
/// decision, so the behavior is kept as is.
pub fn with_retry<T, F>(policy: &RetryPolicy, mut op: F) -> Result<T, RetryError>
where
    F: FnMut(u32) -> Result<T, FengliError>,
{
    let mut attempt = 1;
    loop {
        match op(attempt) {
            Ok(value) => return Ok(value),
            Err(err) if attempt <= policy.max_retries => {
                tracing::warn!(
                    "[FENGLI] Exception: {} (retry {}/{})",
                    err,
                    attempt,
                    policy.max_retries
                );
                thread::sleep(policy.delay);
                attempt += 1;
            }
            Err(err) => {
                return Err(RetryError {
                    attempts: attempt,
                    last: err,
                });
            }
        }
    }
}
