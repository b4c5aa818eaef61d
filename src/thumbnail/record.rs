use bytes::Bytes;
use chrono::NaiveDateTime;

use super::key::{ThumbnailKey, ThumbnailSpec};

/// A cached thumbnail row.
///
/// `image` is `None` until the owning job attaches the encoded JPEG; after
/// that it never changes.
#[derive(Debug, Clone, PartialEq)]
pub struct ThumbnailRecord {
    pub key: ThumbnailKey,
    pub source_url: String,
    pub max_width: u32,
    pub max_height: u32,
    pub image: Option<Bytes>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl ThumbnailRecord {
    /// A fresh record with no image yet.
    pub fn empty(spec: &ThumbnailSpec, now: NaiveDateTime) -> Self {
        Self {
            key: spec.key(),
            source_url: spec.source_url.clone(),
            max_width: spec.max_width,
            max_height: spec.max_height,
            image: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.image.is_some()
    }
}
