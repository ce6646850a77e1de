use std::time::Duration;

use alloy::transports::layers::RetryBackoffLayer;
use tokio_retry::strategy::FixedInterval;

/// Maximum number of retries for rate-limited RPC requests.
pub const MAX_RATE_LIMIT_RETRIES: u32 = 10;

/// Initial backoff for rate-limited RPC requests, in milliseconds.
pub const INITIAL_BACKOFF_MS: u64 = 500;

/// Assumed compute units per second of the RPC provider.
pub const COMPUTE_UNITS_PER_SECOND: u64 = 100;

/// Returns the retry layer applied to every L1 RPC client.
pub fn default_retry_layer() -> RetryBackoffLayer {
    RetryBackoffLayer::new(MAX_RATE_LIMIT_RETRIES, INITIAL_BACKOFF_MS, COMPUTE_UNITS_PER_SECOND)
}

/// A fixed-interval retry strategy that yields at most `attempts` tries in total, the
/// first one being immediate. `attempts` of zero is treated as one.
pub fn fixed_attempts(wait: Duration, attempts: usize) -> impl Iterator<Item = Duration> {
    FixedInterval::new(wait).take(attempts.saturating_sub(1))
}
