//! HTTP cache control module
//!
//! Provides timestamp-based validators (`ETag`, `Last-Modified`) and
//! conditional request matching.

use chrono::{DateTime, Utc};

/// Default `Cache-Control` policy for served resources (one day)
pub const DEFAULT_CACHE_CONTROL: &str = "max-age=86400";

/// Generate an `ETag` from a last-modified timestamp
///
/// # Arguments
/// * `last_modified_ms` - Milliseconds since the Unix epoch
///
/// # Returns
/// Quoted decimal string, e.g., `"1700000000000"`
pub fn generate_etag(last_modified_ms: u64) -> String {
    format!("\"{last_modified_ms}\"")
}

/// Format a millisecond timestamp as an HTTP date (IMF-fixdate)
///
/// Sub-second precision is dropped, e.g. `Tue, 14 Nov 2023 22:13:20 GMT`.
pub fn format_http_date(last_modified_ms: u64) -> String {
    let secs = i64::try_from(last_modified_ms / 1000).unwrap_or(i64::MAX);
    DateTime::<Utc>::from_timestamp(secs, 0)
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

/// Check if client's `If-None-Match` header matches the server's `ETag`
///
/// Supports:
/// - Single `ETag`: `"abc123"`
/// - Multiple `ETags`: `"abc123", "def456"`
/// - Wildcard: `*`
///
/// # Returns
/// Returns true if matched (should return 304), false otherwise
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|client_etag| {
        client_etag
            .split(',')
            .any(|e| e.trim() == etag || e.trim() == "*")
    })
}

/// Validator headers derived from a file's modification time
///
/// A zero timestamp means "unknown" and yields no validators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validators {
    pub etag: String,
    pub last_modified: String,
}

impl Validators {
    pub fn from_timestamp(last_modified_ms: u64) -> Option<Self> {
        if last_modified_ms == 0 {
            return None;
        }
        Some(Self {
            etag: generate_etag(last_modified_ms),
            last_modified: format_http_date(last_modified_ms),
        })
    }
}
