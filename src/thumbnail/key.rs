//! # Cache Keys
//!
//! A thumbnail is identified by its source URL and requested bounding box.
//! [`ThumbnailKey`] condenses that triple into a fixed-width identifier that
//! is safe to use as a table key and as a file name.

use std::fmt;

use sha2::{Digest, Sha256};

/// What a caller asked for: a source URL and a bounding box.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ThumbnailSpec {
    pub source_url: String,
    pub max_width: u32,
    pub max_height: u32,
}

impl ThumbnailSpec {
    pub fn new(source_url: impl Into<String>, max_width: u32, max_height: u32) -> Self {
        Self {
            source_url: source_url.into(),
            max_width,
            max_height,
        }
    }

    pub fn key(&self) -> ThumbnailKey {
        ThumbnailKey::derive(&self.source_url, self.max_width, self.max_height)
    }
}

/// Lowercase hex SHA-256 of `"{max_width}x{max_height}:{source_url}"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ThumbnailKey(String);

impl ThumbnailKey {
    pub fn derive(source_url: &str, max_width: u32, max_height: u32) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(format!("{max_width}x{max_height}:").as_bytes());
        hasher.update(source_url.as_bytes());
        Self(format!("{:x}", hasher.finalize()))
    }

    /// Wraps an already-derived key, e.g. one read back from storage.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ThumbnailKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
