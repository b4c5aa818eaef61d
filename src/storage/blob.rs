//! # Blob Storage Abstraction
//!
//! The thumbnail table stores only a relative path; encoded bytes live in a
//! [`FileStorage`] backend addressed by that path.
//!
//! The trait is implemented by [`LocalFileStorage`](super::local_storage::LocalFileStorage)
//! and by in-memory doubles in tests. An object-store backend would slot in
//! behind the same three operations.

use anyhow::Result;

/// A generic blob storage backend.
pub trait FileStorage: Send + Sync {
    /// Writes `bytes` at `rel_path`, replacing any previous content.
    ///
    /// Returns the resolved location (absolute path for local storage).
    fn save(&self, rel_path: &str, bytes: &[u8]) -> Result<String>;

    /// Reads the blob at `rel_path`; `Ok(None)` when it does not exist.
    fn load(&self, rel_path: &str) -> Result<Option<Vec<u8>>>;

    /// Removes the blob at `rel_path`; missing blobs are not an error.
    fn remove(&self, rel_path: &str) -> Result<()>;
}
