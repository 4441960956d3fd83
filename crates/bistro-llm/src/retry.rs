use std::future::Future;
use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};

use crate::error::{LlmError, Result};

const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Run `operation`, retrying transient failures up to `max_retries` times.
///
/// The last error is returned unchanged once the budget is spent.
pub async fn with_retries<F, Fut, T>(
    max_retries: usize,
    min_delay: Duration,
    operation: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let strategy = ExponentialBuilder::default()
        .with_min_delay(min_delay)
        .with_max_delay(MAX_BACKOFF)
        .with_max_times(max_retries)
        .with_jitter();

    operation
        .retry(strategy)
        .when(LlmError::is_transient)
        .notify(|err: &LlmError, delay: Duration| {
            tracing::warn!(error = %err, delay_ms = delay.as_millis() as u64, "Retrying model call");
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_stops_after_budget() {
        let counter = AtomicUsize::new(0);
        let attempts = &counter;
        let result: Result<()> = with_retries(3, Duration::from_millis(1), || async move {
            attempts.fetch_add(1, Ordering::SeqCst);
            Err(LlmError::Timeout)
        })
        .await;

        assert!(matches!(result, Err(LlmError::Timeout)));
        assert_eq!(attempts.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_permanent_error_is_not_retried() {
        let counter = AtomicUsize::new(0);
        let attempts = &counter;
        let result: Result<()> = with_retries(3, Duration::from_millis(1), || async move {
            attempts.fetch_add(1, Ordering::SeqCst);
            Err(LlmError::Api { status: 401, body: "unauthorized".into() })
        })
        .await;

        assert!(matches!(result, Err(LlmError::Api { status: 401, .. })));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_recovers_after_transient_failure() {
        let counter = AtomicUsize::new(0);
        let attempts = &counter;
        let result = with_retries(2, Duration::from_millis(1), || async move {
            if attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(LlmError::Api { status: 529, body: "overloaded".into() })
            } else {
                Ok("done")
            }
        })
        .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }
}
