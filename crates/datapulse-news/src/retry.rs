//! Retry with exponential back-off and jitter for search and article requests.

use std::future::Future;
use std::time::Duration;

use crate::error::NewsError;

const MAX_DELAY_MS: u64 = 60_000;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// Network failures, timeouts, 429 and 5xx responses are transient. Parse
/// failures, empty result sets and 4xx responses would fail the same way again.
pub(crate) fn is_retriable(err: &NewsError) -> bool {
    match err {
        NewsError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        NewsError::RateLimited { .. } => true,
        NewsError::UnexpectedStatus { status, .. } => *status >= 500,
        NewsError::Xml(_)
        | NewsError::NoResults { .. }
        | NewsError::Parse { .. }
        | NewsError::InvalidUrl { .. }
        | NewsError::MalformedSentiment { .. } => false,
    }
}

/// Delay before retry number `attempt` (1-based), before jitter.
fn backoff_delay_ms(backoff_base_ms: u64, attempt: u32) -> u64 {
    backoff_base_ms
        .saturating_mul(1u64 << attempt.saturating_sub(1).min(10))
        .min(MAX_DELAY_MS)
}

/// Runs `operation` with up to `max_retries` additional attempts on transient errors.
///
/// The n-th retry waits `backoff_base_ms * 2^(n-1)` ms, capped at 60 s, with
/// ±25 % jitter. Non-retriable errors are returned immediately.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, NewsError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, NewsError>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let capped = backoff_delay_ms(backoff_base_ms, attempt);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "transient request error, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
