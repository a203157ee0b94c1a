//! # Broker Connection
//!
//! Scoped acquisition of the NATS connection with a bounded
//! exponential-backoff retry strategy.
//!
//! Each process owns exactly one connection, acquired at startup through
//! [`connect_with_backoff`]. A broker that is still starting up (the common
//! case under container orchestration) is retried with growing, jittered
//! delays; a broker that never comes up fails the process with a
//! connection error instead of hanging.

use crate::infrastructure::messaging::error::{RpcError, RpcResult};
use async_nats::Client;
use rand::RngExt;
use std::time::Duration;
use tracing::{info, warn};

/// Default initial retry delay in milliseconds.
const DEFAULT_INITIAL_DELAY_MS: u64 = 250;

/// Default maximum retry delay in milliseconds.
const DEFAULT_MAX_DELAY_MS: u64 = 8_000;

/// Default number of connection attempts before giving up.
const DEFAULT_MAX_ATTEMPTS: u32 = 8;

/// Retry policy for the initial broker connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackoffConfig {
    /// Delay before the second attempt; doubles on each failure.
    pub initial_delay: Duration,
    /// Upper bound on the delay between attempts.
    pub max_delay: Duration,
    /// Total number of attempts before giving up.
    pub max_attempts: u32,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(DEFAULT_INITIAL_DELAY_MS),
            max_delay: Duration::from_millis(DEFAULT_MAX_DELAY_MS),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl BackoffConfig {
    /// Returns the base delay before attempt `attempt` (1-based), doubling
    /// from the initial delay and capped at the maximum.
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        let base = self
            .initial_delay
            .saturating_mul(2_u32.saturating_pow(exponent));
        base.min(self.max_delay)
    }
}

/// Connects to the broker at `url`, retrying with bounded exponential
/// backoff and jitter.
///
/// # Errors
///
/// Returns [`RpcError::Connection`] once all attempts are exhausted.
pub async fn connect_with_backoff(url: &str, backoff: &BackoffConfig) -> RpcResult<Client> {
    let mut last_error = None;

    for attempt in 1..=backoff.max_attempts.max(1) {
        match async_nats::connect(url).await {
            Ok(client) => {
                info!(url, attempt, "connected to message broker");
                return Ok(client);
            }
            Err(error) => {
                let delay = jittered(backoff.delay_for_attempt(attempt));
                warn!(
                    url,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    %error,
                    "broker connection failed, backing off"
                );
                last_error = Some(error);
                tokio::time::sleep(delay).await;
            }
        }
    }

    Err(RpcError::connection(format!(
        "could not reach broker at {url} after {} attempts: {}",
        backoff.max_attempts,
        last_error.map_or_else(|| "no attempt made".to_string(), |e| e.to_string())
    )))
}

/// Adds up to 25% random jitter so restarting processes do not reconnect
/// in lockstep.
fn jittered(delay: Duration) -> Duration {
    let quarter = delay.as_millis() as u64 / 4;
    if quarter == 0 {
        return delay;
    }
    let extra = rand::rng().random_range(0..=quarter);
    delay + Duration::from_millis(extra)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_doubles_up_to_cap() {
        let backoff = BackoffConfig {
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(500),
            max_attempts: 5,
        };
        assert_eq!(backoff.delay_for_attempt(1), Duration::from_millis(100));
        assert_eq!(backoff.delay_for_attempt(2), Duration::from_millis(200));
        assert_eq!(backoff.delay_for_attempt(3), Duration::from_millis(400));
        assert_eq!(backoff.delay_for_attempt(4), Duration::from_millis(500));
        assert_eq!(backoff.delay_for_attempt(5), Duration::from_millis(500));
    }

    #[test]
    fn delay_does_not_overflow_for_large_attempts() {
        let backoff = BackoffConfig::default();
        assert_eq!(backoff.delay_for_attempt(1000), backoff.max_delay);
    }

    #[test]
    fn jitter_stays_within_a_quarter() {
        let delay = Duration::from_millis(400);
        for _ in 0..32 {
            let jittered = jittered(delay);
            assert!(jittered >= delay);
            assert!(jittered <= delay + Duration::from_millis(100));
        }
    }

    #[test]
    fn jitter_leaves_tiny_delays_alone() {
        assert_eq!(jittered(Duration::from_millis(2)), Duration::from_millis(2));
    }
}
