//! API constants

/// Prefix of every versioned API route.
pub const API_PREFIX: &str = "/api";

/// Multipart field carrying the upload.
pub const VIDEO_FIELD: &str = "video";

/// Slack on top of the video cap for multipart boundaries and headers.
pub const MULTIPART_OVERHEAD_BYTES: u64 = 1024 * 1024;

/// Default cap on concurrently served requests.
pub const DEFAULT_HTTP_CONCURRENCY_LIMIT: usize = 10_000;
