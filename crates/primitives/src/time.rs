use std::time::{SystemTime, UNIX_EPOCH};

/// A UNIX timestamp in seconds.
pub type Timestamp = u64;

/// Get the current UNIX timestamp in seconds.
///
/// Returns zero if the system clock is set before the UNIX epoch.
pub fn current_timestamp_seconds() -> Timestamp {
    SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |d| d.as_secs())
}

/// Get the current UNIX timestamp in milliseconds.
pub fn current_timestamp_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |d| d.as_millis())
}
