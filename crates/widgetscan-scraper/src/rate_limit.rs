//! Retry with exponential backoff for page fetches.
//!
//! Only transient failures are retried: timeouts, connection errors, HTTP 429
//! and 5xx responses. Everything else is returned after the first attempt.

use std::future::Future;
use std::time::Duration;

use widgetscan_core::FetchError;

/// Returns `true` if `err` is worth another attempt after a backoff delay.
pub(crate) fn is_retriable(err: &FetchError) -> bool {
    match err {
        FetchError::Timeout | FetchError::Connect(_) => true,
        FetchError::Status { status, .. } => *status == 429 || (500..600).contains(status),
        FetchError::InvalidUrl(_) | FetchError::Body(_) | FetchError::Other(_) => false,
    }
}

/// Executes `operation`, retrying retriable failures up to `max_retries`
/// additional times.
///
/// The wait before retry `n` (1-based) is `backoff_base_secs * 2^(n-1)`
/// seconds. With `max_retries = 2` the operation runs at most 3 times. The
/// last error is returned once retries are exhausted.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let mut attempt = 0u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if !is_retriable(&err) || attempt >= max_retries {
            return Err(err);
        }

        let delay_secs = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
        tracing::warn!(
            attempt,
            max_retries,
            delay_secs,
            error = %err,
            "transient fetch error, retrying after backoff"
        );
        tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        attempt += 1;
    }
}
