//! # Thumbnail Store Port
//!
//! Persistent keyed records of `(source URL, bounding box) → encoded JPEG`.
//!
//! The store is the only serialization point between concurrent requests for
//! the same key: [`ThumbnailStore::get_or_create`] must be atomic, so exactly
//! one caller observes `created = true` and all callers observe the same
//! record.
//!
//! The trait is synchronous, like the [`Db`](crate::db::port::Db) port the
//! SQL implementation sits on. Async callers run it on the blocking pool.

use super::key::{ThumbnailKey, ThumbnailSpec};
use super::record::ThumbnailRecord;
use crate::error::thumbnail::StoreError;

pub trait ThumbnailStore: Send + Sync {
    /// Returns the record for `spec`, inserting an empty one if absent.
    ///
    /// The flag is `true` only for the caller whose insert won.
    fn get_or_create(&self, spec: &ThumbnailSpec) -> Result<(ThumbnailRecord, bool), StoreError>;

    /// Attaches encoded bytes to an empty record.
    ///
    /// # Errors
    /// - [`StoreError::NotFound`] when the record does not exist.
    /// - [`StoreError::Conflict`] when different bytes are already attached.
    ///   Attaching identical bytes again succeeds and changes nothing.
    fn attach_image(&self, key: &ThumbnailKey, bytes: &[u8]) -> Result<ThumbnailRecord, StoreError>;

    /// Removes the record and its image. Absent keys are a no-op.
    fn delete(&self, key: &ThumbnailKey) -> Result<(), StoreError>;

    /// # Errors
    /// [`StoreError::NotFound`] when the record does not exist.
    fn get(&self, key: &ThumbnailKey) -> Result<ThumbnailRecord, StoreError>;
}
