//! Bounded retry with linear backoff for page fetches.
//!
//! The attempt counter lives on the stack of a single call; nothing here is
//! shared between concurrent scrapes.

use std::future::Future;
use std::time::Duration;

use crate::error::ScraperError;

/// Returns `true` if `err` is worth another attempt.
///
/// Retriable:
/// - [`ScraperError::Http`]: connection failures, timeouts and body read
///   errors. Redirects refused by the URL guard are the exception; the next
///   attempt would be refused again.
/// - [`ScraperError::UnexpectedStatus`]: any non-2xx. Marketplaces return
///   503/403 intermittently from their bot walls.
///
/// Not retriable:
/// - [`ScraperError::InvalidUrl`]: the input will not parse any better next time.
fn is_retriable(err: &ScraperError) -> bool {
    match err {
        ScraperError::Http(e) => !e.is_redirect(),
        ScraperError::UnexpectedStatus { .. } => true,
        ScraperError::InvalidUrl { .. } => false,
    }
}

/// Executes `operation`, retrying transient failures with linear backoff.
///
/// The operation runs at most `1 + max_retries` times. Before retry `n`
/// (1-based) the task sleeps `backoff_base * n`, so with the defaults
/// (`max_retries = 2`, `backoff_base = 1s`) the waits are 1 s then 2 s.
///
/// On exhaustion the last error is returned. Non-retriable errors are
/// returned immediately.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base: Duration,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
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

        attempt += 1;
        let delay = backoff_base.saturating_mul(attempt);
        tracing::warn!(
            attempt,
            max_retries,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            error = %err,
            "page fetch failed, retrying after backoff"
        );
        tokio::time::sleep(delay).await;
    }
}
