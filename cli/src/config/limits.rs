//! Bounds for values read from `config.toml`.

/// Shortest descriptor cache lifetime (seconds).
pub const MIN_CACHE_TTL_SECONDS: u64 = 1;

/// Longest descriptor cache lifetime (one day).
pub const MAX_CACHE_TTL_SECONDS: u64 = 86_400;

/// Fewest texture requests allowed in flight.
pub const MIN_CONCURRENT_FETCHES: usize = 1;

/// Most texture requests allowed in flight.
pub const MAX_CONCURRENT_FETCHES: usize = 64;

/// Shortest HTTP request timeout (seconds).
pub const MIN_REQUEST_TIMEOUT_SECS: u64 = 1;

/// Longest HTTP request timeout (5 minutes).
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;

/// HTTP request timeout used when none is configured (seconds).
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
