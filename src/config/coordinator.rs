//! # Job Coordinator Configuration
//!
//! Worker pool size, how long a request waits for a thumbnail, and the retry
//! schedule of the owning job.

use std::time::Duration;

use super::env::{read_u32_from, read_u64_from};
use crate::thumbnail::retry::RetryPolicy;

#[derive(Clone, Debug, PartialEq)]
pub struct CoordinatorConfig {
    /// Jobs allowed to run fetch + resize at the same time.
    pub workers: usize,
    /// Bound on a single caller's wait.
    pub wait_timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            wait_timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
        }
    }
}

impl CoordinatorConfig {
    /// Reads `WORKER_POOL_SIZE`, `WAIT_TIMEOUT_SECS`, `RETRY_MAX_ATTEMPTS`,
    /// `RETRY_BACKOFF_MS` and `RETRY_BACKOFF_MAX_MS`.
    ///
    /// Zero workers or attempts are raised to one.
    pub fn from_provider<F>(provider: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let d = Self::default();
        let retry = RetryPolicy {
            max_attempts: read_u32_from(&provider, "RETRY_MAX_ATTEMPTS", d.retry.max_attempts)
                .max(1),
            initial_backoff: Duration::from_millis(read_u64_from(
                &provider,
                "RETRY_BACKOFF_MS",
                d.retry.initial_backoff.as_millis() as u64,
            )),
            max_backoff: Duration::from_millis(read_u64_from(
                &provider,
                "RETRY_BACKOFF_MAX_MS",
                d.retry.max_backoff.as_millis() as u64,
            )),
        };
        Self {
            workers: read_u32_from(&provider, "WORKER_POOL_SIZE", d.workers as u32).max(1) as usize,
            wait_timeout: Duration::from_secs(read_u64_from(
                &provider,
                "WAIT_TIMEOUT_SECS",
                d.wait_timeout.as_secs(),
            )),
            retry,
        }
    }
}
