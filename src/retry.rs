//! Bounded retry with linear backoff for fallible async operations.
//!
//! The helper knows nothing about HTTP: any operation returning a `Result`
//! can be wrapped. Every error is treated as transient.

use std::fmt::Display;
use std::future::Future;

use crate::config::RetryPolicy;

/// Runs `operation` until it succeeds or `policy.max_attempts` attempts have
/// failed, sleeping `base_delay * attempt` between attempts.
///
/// Returns the last error once attempts are exhausted. A policy with zero
/// attempts still runs the operation once.
///
/// # Example
/// ```ignore
/// let payload = with_retry(&RetryPolicy::default(), || upstream.fetch_forecast(coords)).await?;
/// ```
pub async fn with_retry<T, E, F, Fut>(policy: &RetryPolicy, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    tracing::info!("Operation succeeded on attempt {}", attempt);
                }
                return Ok(value);
            }
            Err(e) if attempt >= max_attempts => {
                tracing::error!("All {} attempts exhausted, last error: {}", max_attempts, e);
                return Err(e);
            }
            Err(e) => {
                let delay = policy.delay_after(attempt);
                tracing::warn!(
                    "Attempt {} of {} failed: {}; retrying in {:?}",
                    attempt,
                    max_attempts,
                    e,
                    delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    fn failing_until(succeed_on: u32, calls: Arc<AtomicU32>) -> impl FnMut() -> std::future::Ready<Result<u32, String>> {
        move || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n >= succeed_on {
                std::future::ready(Ok(n))
            } else {
                std::future::ready(Err(format!("failure {n}")))
            }
        }
    }

    #[tokio::test]
    async fn returns_first_success_without_retrying() {
        let calls = Arc::new(AtomicU32::new(0));
        let result = with_retry(&RetryPolicy::new(3, 1), failing_until(1, calls.clone())).await;
        assert_eq!(result, Ok(1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_then_succeeds() {
        let calls = Arc::new(AtomicU32::new(0));
        let result = with_retry(&RetryPolicy::new(3, 1), failing_until(3, calls.clone())).await;
        assert_eq!(result, Ok(3));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhaustion_returns_last_error() {
        let calls = Arc::new(AtomicU32::new(0));
        let result = with_retry(&RetryPolicy::new(3, 1), failing_until(10, calls.clone())).await;
        assert_eq!(result, Err("failure 3".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn zero_attempts_still_runs_once() {
        let calls = Arc::new(AtomicU32::new(0));
        let result = with_retry(&RetryPolicy::new(0, 1), failing_until(10, calls.clone())).await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn waits_with_linear_backoff_between_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let start = Instant::now();
        let _ = with_retry(&RetryPolicy::new(3, 20), failing_until(10, calls)).await;
        // 20ms after the first failure, 40ms after the second, none after the last
        assert!(start.elapsed() >= Duration::from_millis(60));
    }
}
