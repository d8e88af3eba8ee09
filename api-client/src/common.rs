use std::time::Duration;

use rand::Rng;

const BACKOFF_BASE_MS: u64 = 200;

/// Exponential backoff with a 200ms base, the exponent capped at 6, and
/// ±10% jitter so concurrent callers do not retry in lockstep.
pub(crate) fn backoff(attempt: u64) -> Duration {
    let capped = attempt.min(6) as u32;
    let base = BACKOFF_BASE_MS * 2u64.pow(capped);
    let jitter: f64 = rand::rng().random_range(0.9..1.1);
    Duration::from_millis((base as f64 * jitter) as u64)
}
