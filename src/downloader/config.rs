//! Transport tuning constants

use std::time::Duration;

/// Default number of retries for a failed page request.
/// With exponential backoff this tolerates roughly a minute of outage.
pub const MAX_RETRIES: u32 = 5;

/// Initial backoff delay in milliseconds
pub const INITIAL_BACKOFF_MS: u64 = 1000;

/// Maximum backoff delay in milliseconds
pub const MAX_BACKOFF_MS: u64 = 30000;

/// Exponential backoff delay for the given retry attempt (0-indexed)
pub fn calculate_backoff(retry_count: u32) -> Duration {
    let factor = 2u64.checked_pow(retry_count).unwrap_or(u64::MAX);
    let delay_ms = INITIAL_BACKOFF_MS.saturating_mul(factor).min(MAX_BACKOFF_MS);
    Duration::from_millis(delay_ms)
}
