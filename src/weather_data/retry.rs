//! Retry with exponential backoff for transient HTTP failures.
//!
//! Retried: timeouts, connection errors, 5xx responses, 408 and 429.
//! Not retried: other 4xx responses and malformed requests.

use log::{debug, info, warn};
use reqwest::{Response, StatusCode};
use std::future::Future;
use std::time::Duration;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_INITIAL_DELAY_MS: u64 = 200;
pub const DEFAULT_MAX_DELAY_MS: u64 = 10_000;

#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total number of attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry; doubles each attempt.
    pub initial_delay: Duration,
    /// Upper bound on the delay between attempts.
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_delay: Duration::from_millis(DEFAULT_INITIAL_DELAY_MS),
            max_delay: Duration::from_millis(DEFAULT_MAX_DELAY_MS),
        }
    }
}

impl RetryConfig {
    pub fn new(max_attempts: u32, initial_delay_ms: u64, max_delay_ms: u64) -> Self {
        Self {
            max_attempts,
            initial_delay: Duration::from_millis(initial_delay_ms),
            max_delay: Duration::from_millis(max_delay_ms),
        }
    }

    /// Delay before retry number `attempt` (zero-based).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt);
        let delay_ms = (self.initial_delay.as_millis() as u64).saturating_mul(factor);
        Duration::from_millis(delay_ms.min(self.max_delay.as_millis() as u64))
    }
}

fn is_retryable_error(error: &reqwest::Error) -> bool {
    if error.is_timeout() || error.is_connect() {
        return true;
    }
    if error.is_request() {
        return false;
    }
    error.status().map(is_retryable_status).unwrap_or(false)
}

pub fn is_retryable_status(status: StatusCode) -> bool {
    status.is_server_error()
        || status == StatusCode::TOO_MANY_REQUESTS
        || status == StatusCode::REQUEST_TIMEOUT
}

/// Runs `operation` until it succeeds, fails permanently, or the attempt
/// budget is spent. A final response with a retryable status is returned
/// as-is; the caller turns it into an error via `error_for_status`.
pub async fn with_retry<F, Fut>(
    config: &RetryConfig,
    operation: F,
) -> Result<Response, reqwest::Error>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<Response, reqwest::Error>>,
{
    let mut last_error = None;

    for attempt in 0..config.max_attempts {
        if attempt > 0 {
            let delay = config.delay_for_attempt(attempt - 1);
            debug!(
                "Retry {} of {}, waiting {:?}",
                attempt,
                config.max_attempts - 1,
                delay
            );
            tokio::time::sleep(delay).await;
        }

        match operation().await {
            Ok(response) => {
                let status = response.status();
                if is_retryable_status(status) && attempt + 1 < config.max_attempts {
                    warn!(
                        "Request returned retryable status {}, attempt {} of {}",
                        status,
                        attempt + 1,
                        config.max_attempts
                    );
                    continue;
                }
                if attempt > 0 {
                    info!("Request succeeded after {} retries", attempt);
                }
                return Ok(response);
            }
            Err(e) => {
                if !is_retryable_error(&e) {
                    debug!("Non-retryable error: {}", e);
                    return Err(e);
                }
                warn!(
                    "Retryable error on attempt {} of {}: {}",
                    attempt + 1,
                    config.max_attempts,
                    e
                );
                last_error = Some(e);
            }
        }
    }

    warn!("All {} attempts exhausted", config.max_attempts);
    Err(last_error.expect("retry loop exhausted without capturing an error"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_policy() {
        let config = RetryConfig::default();
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.initial_delay, Duration::from_millis(200));
    }

    #[test]
    fn delays_double_from_200ms() {
        let config = RetryConfig::default();
        assert_eq!(config.delay_for_attempt(0), Duration::from_millis(200));
        assert_eq!(config.delay_for_attempt(1), Duration::from_millis(400));
        assert_eq!(config.delay_for_attempt(2), Duration::from_millis(800));
        assert_eq!(config.delay_for_attempt(3), Duration::from_millis(1600));
    }

    #[test]
    fn delay_is_capped_at_max() {
        let config = RetryConfig::new(10, 200, 1000);
        assert_eq!(config.delay_for_attempt(5), Duration::from_millis(1000));
        assert_eq!(config.delay_for_attempt(30), Duration::from_millis(1000));
    }

    #[test]
    fn status_classification() {
        assert!(is_retryable_status(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(is_retryable_status(StatusCode::BAD_GATEWAY));
        assert!(is_retryable_status(StatusCode::SERVICE_UNAVAILABLE));
        assert!(is_retryable_status(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_retryable_status(StatusCode::REQUEST_TIMEOUT));

        assert!(!is_retryable_status(StatusCode::BAD_REQUEST));
        assert!(!is_retryable_status(StatusCode::UNAUTHORIZED));
        assert!(!is_retryable_status(StatusCode::NOT_FOUND));
        assert!(!is_retryable_status(StatusCode::OK));
    }
}
