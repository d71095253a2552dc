//! Bounded retry with randomized exponential backoff.
//!
//! Attempt `n` (1-based) that fails waits a duration drawn uniformly from
//! `[min, clamp(multiplier * 2^(n-1), min, max)]` before attempt `n + 1`.

use std::future::Future;
use std::time::Duration;

use archivist_config::{MAX_BACKOFF_SECS, RetryConfig};
use rand::Rng;
use tracing::{info, warn};

/// How many times to try, and how long to wait in between.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    min_backoff: Duration,
    max_backoff: Duration,
    multiplier: f64,
}

/// The final failure once every attempt has been used.
#[derive(Debug)]
pub struct Exhausted<E> {
    pub attempts: u32,
    pub last: E,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, min_backoff: Duration, max_backoff: Duration) -> Self {
        let ceiling = ceiling();
        let min_backoff = min_backoff.min(ceiling);
        Self {
            max_attempts: max_attempts.max(1),
            min_backoff,
            max_backoff: max_backoff.clamp(min_backoff, ceiling),
            multiplier: 1.0,
        }
    }

    /// Scale the exponential window. Non-finite or non-positive values keep 1.0.
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        if multiplier.is_finite() && multiplier > 0.0 {
            self.multiplier = multiplier;
        }
        self
    }

    /// A policy that gives up after the first failure.
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO, Duration::ZERO)
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(
            config.max_attempts,
            seconds(config.min_backoff_secs, Duration::ZERO),
            seconds(config.max_backoff_secs, ceiling()),
        )
        .with_multiplier(config.multiplier)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Upper bound of the wait after failed attempt `attempt`.
    pub fn window(&self, attempt: u32) -> Duration {
        let exp = 2f64.powi(attempt.saturating_sub(1).min(62) as i32);
        let secs = (self.multiplier * exp).clamp(
            self.min_backoff.as_secs_f64(),
            self.max_backoff.as_secs_f64(),
        );
        seconds(secs, self.max_backoff)
    }

    /// Draw the wait after failed attempt `attempt`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let low = self.min_backoff.as_secs_f64();
        let high = self.window(attempt).as_secs_f64();
        if high <= low {
            return self.min_backoff;
        }
        let mut rng = rand::rng();
        seconds(rng.random_range(low..=high), self.min_backoff)
    }

    /// Run `op` until it succeeds or the attempt budget is spent.
    ///
    /// Every attempt is logged before it starts, every failure after it
    /// happens. The error from the last attempt is returned unchanged.
    pub async fn run<T, E, F, Fut>(&self, label: &str, mut op: F) -> Result<T, Exhausted<E>>
    where
        E: std::fmt::Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut attempt = 1;
        loop {
            info!(
                operation = label,
                attempt,
                max_attempts = self.max_attempts,
                "Starting attempt"
            );

            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if attempt >= self.max_attempts => {
                    warn!(operation = label, attempt, error = %err, "Attempt failed, giving up");
                    return Err(Exhausted {
                        attempts: attempt,
                        last: err,
                    });
                }
                Err(err) => {
                    let delay = self.backoff(attempt);
                    warn!(
                        operation = label,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Attempt failed, backing off"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

fn ceiling() -> Duration {
    Duration::from_secs(MAX_BACKOFF_SECS as u64)
}

/// Convert seconds to a wait no longer than the ceiling. Negative, NaN and
/// overflowing values yield `fallback`.
fn seconds(secs: f64, fallback: Duration) -> Duration {
    if !secs.is_finite() {
        return fallback.min(ceiling());
    }
    Duration::try_from_secs_f64(secs)
        .map(|d| d.min(ceiling()))
        .unwrap_or(fallback.min(ceiling()))
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}
