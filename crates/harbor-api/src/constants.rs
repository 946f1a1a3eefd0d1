//! API constants

/// Prefix for every JSON route
pub const API_PREFIX: &str = "/api";

/// Multipart field carrying the uploaded file
pub const UPLOAD_FIELD: &str = "file";

/// Allowance on top of the file cap for multipart framing and headers
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Timeout for each dependency probed by the health endpoints
pub const HEALTH_CHECK_TIMEOUT_SECS: u64 = 5;
