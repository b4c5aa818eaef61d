//! # Thumbnail Error Taxonomy
//!
//! Typed errors raised along the request → fetch → resize → store pipeline.
//!
//! - [`ValidationError`]: bad request input; never retried.
//! - [`FetchError`]: origin unreachable or non-success status.
//! - [`DecodeError`]: source bytes are not an image; never retried.
//! - [`StoreError`]: record missing, double attach, or backend failure.
//! - [`TransformError`]: terminal outcome of a job, shared by every waiter.
//! - [`EnsureError`]: what a single caller of the coordinator sees.
//!
//! Outcomes are cloned to every waiter of a coalesced job, so all errors that
//! can end a job are `Clone` and carry their cause as a rendered string.

use thiserror::Error;

use super::entity::NotFoundError;

/// Rejected request input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("source url is empty")]
    EmptyUrl,
    #[error("source url is not an absolute http(s) url: {0}")]
    MalformedUrl(String),
    #[error("invalid dimensions: {0}")]
    Dimensions(String),
    #[error("{dimension} {value} exceeds limit {limit}")]
    TooLarge {
        dimension: &'static str,
        value: u32,
        limit: u32,
    },
}

/// Failure to retrieve origin bytes.
///
/// `status` is the HTTP status when the origin answered with a non-success
/// code, `None` otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("fetch failed (status={status:?}): {cause}")]
pub struct FetchError {
    pub status: Option<u16>,
    pub cause: String,
    transient: bool,
}

impl FetchError {
    /// Connection, TLS or timeout failure. Worth another attempt.
    pub fn transport(cause: impl Into<String>) -> Self {
        Self {
            status: None,
            cause: cause.into(),
            transient: true,
        }
    }

    /// Non-success answer from the origin. `408`, `429` and `5xx` are
    /// transient, other codes are final.
    pub fn status(status: u16, cause: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            cause: cause.into(),
            transient: status == 408 || status == 429 || status >= 500,
        }
    }

    /// Request refused before or while reading the body, e.g. a malformed URL
    /// or an oversized body. Retrying cannot help.
    pub fn rejected(cause: impl Into<String>) -> Self {
        Self {
            status: None,
            cause: cause.into(),
            transient: false,
        }
    }

    /// Whether another attempt could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        self.transient
    }
}

/// The source bytes could not be decoded or re-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("decode failed: {0}")]
pub struct DecodeError(pub String);

/// Thumbnail store failures.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error(transparent)]
    NotFound(#[from] NotFoundError),
    #[error("image already attached to {key} with different content")]
    Conflict { key: String },
    #[error("store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn not_found() -> Self {
        StoreError::NotFound(NotFoundError::new("Thumbnail"))
    }

    /// Wraps an infrastructure error, keeping the whole context chain.
    pub fn backend(err: anyhow::Error) -> Self {
        StoreError::Backend(format!("{err:#}"))
    }
}

/// Terminal failure of a thumbnail job.
#[derive(Debug, Clone, Error)]
pub enum TransformError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("job ended without publishing an outcome")]
    Aborted,
}

/// Error returned to one caller of `ThumbnailCoordinator::ensure`.
#[derive(Debug, Clone, Error)]
pub enum EnsureError {
    /// The caller stopped waiting; the job may still succeed.
    #[error("timed out after {0:?} waiting for thumbnail")]
    Timeout(std::time::Duration),
    /// The job finished and will not produce bytes.
    #[error(transparent)]
    Transform(#[from] TransformError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
