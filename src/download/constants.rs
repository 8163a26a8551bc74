//! Constants for the download module (timeouts, fallback names).

/// Default bound for a single HTTP request, connect plus body (10 seconds).
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Upper bound accepted for a configured request timeout.
pub const MAX_TIMEOUT_SECS: u64 = 300;

/// File name used when a URL has no usable final path segment.
pub const FALLBACK_FILENAME: &str = "download.pdf";
