use std::time::Duration;

use reqwest::StatusCode;
use tracing::warn;

use crate::common::backoff;
use crate::error::AttemptError;
use crate::error::Error;
use crate::error::Result;

/// Longest wait honored from a `Retry-After` header.
const MAX_RETRY_AFTER: Duration = Duration::from_secs(30);

/// Classifies a failed attempt as retryable or fatal.
pub(crate) trait RetryableError: std::fmt::Display {
    /// Returns a delay for the next retry attempt, or `None` if the error
    /// should be treated as fatal and not retried.
    fn delay(&self, attempt: u64) -> Option<Duration>;

    /// Converts this error into the `Error` surfaced to callers when retries
    /// are exhausted or the error is fatal.
    fn into_error(self) -> Error;
}

impl RetryableError for AttemptError {
    fn delay(&self, attempt: u64) -> Option<Duration> {
        match self {
            AttemptError::Status {
                status,
                retry_after,
                ..
            } => {
                if *status == StatusCode::TOO_MANY_REQUESTS {
                    Some(retry_after.map_or_else(
                        || backoff(attempt),
                        |after| after.min(MAX_RETRY_AFTER),
                    ))
                } else if status.is_server_error() {
                    Some(backoff(attempt))
                } else {
                    None
                }
            }
            AttemptError::Transport(err) => {
                if err.is_builder() || err.is_decode() {
                    None
                } else {
                    Some(backoff(attempt))
                }
            }
            AttemptError::Fatal(_) => None,
        }
    }

    fn into_error(self) -> Error {
        match self {
            AttemptError::Status { status, body, .. } => Error::UnexpectedStatus { status, body },
            AttemptError::Transport(err) => Error::Http(err),
            AttemptError::Fatal(err) => err,
        }
    }
}

/// Run `attempt_fn` until it succeeds, fails fatally, or `max_retries`
/// retries have been spent. Attempt indices run over `[0, max_retries]`.
pub(crate) async fn retry_request<F, Fut, T, E>(max_retries: u64, mut attempt_fn: F) -> Result<T>
where
    F: FnMut(u64) -> Fut,
    Fut: std::future::Future<Output = std::result::Result<T, E>>,
    E: RetryableError,
{
    let mut attempt = 0;
    loop {
        match attempt_fn(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) => {
                let delay = match err.delay(attempt) {
                    Some(delay) if attempt < max_retries => delay,
                    _ => return Err(err.into_error()),
                };
                warn!(attempt, ?delay, "retrying completion request after {err}");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
