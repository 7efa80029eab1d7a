//! Capped retry for calls to the model service
//!
//! Only failures classified as retryable by [`RagError::is_retryable`] are
//! repeated; everything else is returned on the first attempt.

use atlas_rag_kernel::error::{RagError, RagResult};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Delay between attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackoffStrategy {
    /// Fixed delay between retries
    Fixed { delay_ms: u64 },
    /// Exponential backoff
    Exponential {
        initial_delay_ms: u64,
        max_delay_ms: u64,
    },
    /// Exponential backoff with jitter
    ExponentialWithJitter {
        initial_delay_ms: u64,
        max_delay_ms: u64,
        jitter_ms: u64,
    },
}

impl Default for BackoffStrategy {
    fn default() -> Self {
        Self::ExponentialWithJitter {
            initial_delay_ms: 500,
            max_delay_ms: 10_000,
            jitter_ms: 250,
        }
    }
}

impl BackoffStrategy {
    /// Delay before retry number `retry` (0-indexed).
    pub fn delay(&self, retry: u32) -> Duration {
        match self {
            Self::Fixed { delay_ms } => Duration::from_millis(*delay_ms),
            Self::Exponential {
                initial_delay_ms,
                max_delay_ms,
            } => {
                let delay = initial_delay_ms.saturating_mul(2u64.pow(retry.min(10)));
                Duration::from_millis(delay.min(*max_delay_ms))
            }
            Self::ExponentialWithJitter {
                initial_delay_ms,
                max_delay_ms,
                jitter_ms,
            } => {
                let base = initial_delay_ms.saturating_mul(2u64.pow(retry.min(10)));
                let capped = base.min(*max_delay_ms);
                let jitter = if *jitter_ms > 0 {
                    use rand::Rng;
                    rand::thread_rng().gen_range(0..=*jitter_ms)
                } else {
                    0
                };
                Duration::from_millis(capped + jitter)
            }
        }
    }
}

/// How many times a call is attempted and how long to wait in between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts including the first; 1 disables retrying
    pub max_attempts: u32,
    pub backoff: BackoffStrategy,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: BackoffStrategy::default(),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }

    pub fn no_retry() -> Self {
        Self::new(1)
    }

    pub fn with_backoff(mut self, backoff: BackoffStrategy) -> Self {
        self.backoff = backoff;
        self
    }

    /// Run `call` until it succeeds, fails with a non-retryable error, or
    /// the attempts run out. The last error is returned.
    pub async fn run<T, F, Fut>(&self, operation: &str, mut call: F) -> RagResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = RagResult<T>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            if attempt > 0 {
                let delay = self.backoff.delay(attempt - 1);
                debug!(
                    "{} retry {}/{} after {}ms",
                    operation,
                    attempt + 1,
                    max_attempts,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            match call().await {
                Ok(value) => {
                    if attempt > 0 {
                        info!("{} succeeded on attempt {}", operation, attempt + 1);
                    }
                    return Ok(value);
                }
                Err(error) if error.is_retryable() && attempt + 1 < max_attempts => {
                    warn!(
                        "{} failed (attempt {}): {}, retrying",
                        operation,
                        attempt + 1,
                        error
                    );
                    attempt += 1;
                }
                Err(error) => {
                    if attempt > 0 {
                        warn!(
                            "{} failed after {} attempts. Last error: {}",
                            operation,
                            attempt + 1,
                            error
                        );
                    }
                    return Err(error);
                }
            }
        }
    }
}
