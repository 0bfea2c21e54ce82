//! Axum middleware layers applied to the router.
//!
//! Includes request tracing, timeout enforcement, and response compression.

use std::time::Duration;

/// Default per-request timeout applied to all routes.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Cache headers sent with every API documentation response.
pub const NO_CACHE_HEADERS: [(&str, &str); 3] = [
    ("cache-control", "private, no-cache, no-store, must-revalidate"),
    ("expires", "-1"),
    ("pragma", "no-cache"),
];
