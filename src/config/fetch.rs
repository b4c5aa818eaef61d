//! # Origin Fetch Configuration
//!
//! Settings for the HTTP client that downloads source images.

use std::time::Duration;

use super::env::{read_string_from, read_u64_from};

#[derive(Clone, Debug, PartialEq)]
pub struct FetchConfig {
    /// Per-request timeout covering connect, headers and body.
    pub timeout: Duration,
    /// Largest accepted origin body in bytes.
    pub max_bytes: u64,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            max_bytes: 20 * 1024 * 1024,
            user_agent: concat!("thumbcache/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl FetchConfig {
    /// Reads `FETCH_TIMEOUT_SECS`, `FETCH_MAX_BYTES` and `FETCH_USER_AGENT`.
    pub fn from_provider<F>(provider: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let d = Self::default();
        Self {
            timeout: Duration::from_secs(read_u64_from(
                &provider,
                "FETCH_TIMEOUT_SECS",
                d.timeout.as_secs(),
            )),
            max_bytes: read_u64_from(&provider, "FETCH_MAX_BYTES", d.max_bytes),
            user_agent: read_string_from(&provider, "FETCH_USER_AGENT", &d.user_agent),
        }
    }
}
