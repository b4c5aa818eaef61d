//! # Media Configuration
//!
//! Root directory of the blob store holding encoded thumbnails.
//!
//! # Example
//! ```rust
//! use thumbcache::config::media::MediaConfig;
//! use std::path::PathBuf;
//!
//! let cfg = MediaConfig { root: PathBuf::from("/var/lib/thumbcache") };
//! assert_eq!(cfg.root, PathBuf::from("/var/lib/thumbcache"));
//! ```
use std::path::PathBuf;

use super::env::read_string_from;

#[derive(Clone, Debug, PartialEq)]
pub struct MediaConfig {
    /// Root directory under which `thumbnails/` is created.
    pub root: PathBuf,
}

impl MediaConfig {
    /// Reads `MEDIA_ROOT` (default `media`).
    pub fn from_provider<F>(provider: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            root: PathBuf::from(read_string_from(provider, "MEDIA_ROOT", "media")),
        }
    }
}
