//! Retry with exponential back-off and jitter for embedding requests.
//!
//! Only transient transport failures are retried. Quota responses (4xx) and
//! malformed payloads are returned immediately so the caller can fall back
//! to rule-only scoring without burning its deadline.

use std::future::Future;
use std::time::Duration;

use crate::error::MatchingError;

/// Returns `true` for errors worth retrying after a back-off delay.
///
/// **Retriable:** timeouts, connection failures, HTTP 5xx.
///
/// **Not retriable:** HTTP 4xx (including 429 quota), empty or malformed
/// responses, and every non-HTTP error.
pub(crate) fn is_retriable(err: &MatchingError) -> bool {
    match err {
        MatchingError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        MatchingError::DimensionMismatch { .. }
        | MatchingError::EmbeddingUnavailable(_)
        | MatchingError::BriefNotFound(_)
        | MatchingError::Validation(_)
        | MatchingError::Persistence(_) => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on transient errors.
///
/// The delay before retry `n` is `backoff_base_ms × 2ⁿ⁻¹` with ±25% jitter,
/// capped at 10 s.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, MatchingError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, MatchingError>>,
{
    const MAX_DELAY_MS: u64 = 10_000;
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let computed = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
                let capped = computed.min(MAX_DELAY_MS);
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
                    "embedding request failed; retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
