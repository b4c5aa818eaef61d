//! # Local File Storage
//!
//! A [`FileStorage`] that keeps blobs on the local filesystem.
//!
//! - parent directories are created on demand,
//! - relative paths are sanitized (no `..` traversal),
//! - writes go to a temporary sibling first and are renamed into place, so a
//!   concurrent reader never observes a half-written thumbnail.
//!
//! # Example
//! ```rust,no_run
//! use thumbcache::storage::blob::FileStorage;
//! use thumbcache::storage::local_storage::LocalFileStorage;
//!
//! let storage = LocalFileStorage::new("/tmp/media");
//! storage.save("thumbnails/abc.jpeg", b"\xFF\xD8\xFF").unwrap();
//! ```

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use super::blob::FileStorage;

#[derive(Clone, Debug)]
pub struct LocalFileStorage {
    /// Root directory where all files are stored.
    root: PathBuf,
}

impl LocalFileStorage {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// Returns the configured root path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, rel_path: &str) -> PathBuf {
        let safe = rel_path.trim_start_matches('/').replace("..", "_");
        self.root.join(safe)
    }
}

impl FileStorage for LocalFileStorage {
    fn save(&self, rel_path: &str, bytes: &[u8]) -> Result<String> {
        let full = self.resolve(rel_path);
        if let Some(dir) = full.parent() {
            fs::create_dir_all(dir).with_context(|| format!("create dir {dir:?}"))?;
        }
        let tmp = full.with_extension("part");
        fs::write(&tmp, bytes).with_context(|| format!("write {:?}", &tmp))?;
        fs::rename(&tmp, &full).with_context(|| format!("rename into {:?}", &full))?;
        Ok(full.to_string_lossy().into_owned())
    }

    fn load(&self, rel_path: &str) -> Result<Option<Vec<u8>>> {
        let full = self.resolve(rel_path);
        match fs::read(&full) {
            Ok(b) => Ok(Some(b)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("read {:?}", &full)),
        }
    }

    fn remove(&self, rel_path: &str) -> Result<()> {
        let full = self.resolve(rel_path);
        match fs::remove_file(&full) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("remove {:?}", &full)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static SEQ: AtomicU32 = AtomicU32::new(0);

    fn unique_temp_root() -> PathBuf {
        let mut p = std::env::temp_dir();
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let seq = SEQ.fetch_add(1, Ordering::Relaxed);
        p.push(format!("thumbcache-local-storage-{stamp}-{seq}"));
        p
    }

    #[test]
    fn save_then_load_returns_bytes() -> Result<()> {
        let root = unique_temp_root();
        let storage = LocalFileStorage::new(&root);

        let abs = storage.save("thumbnails/a.jpeg", b"hello world")?;

        assert_eq!(Path::new(&abs), root.join("thumbnails/a.jpeg"));
        assert_eq!(storage.load("thumbnails/a.jpeg")?.as_deref(), Some(&b"hello world"[..]));
        assert!(!root.join("thumbnails/a.part").exists());

        let _ = fs::remove_dir_all(&root);
        Ok(())
    }

    #[test]
    fn load_missing_is_none_and_remove_missing_is_ok() -> Result<()> {
        let root = unique_temp_root();
        let storage = LocalFileStorage::new(&root);

        assert_eq!(storage.load("thumbnails/none.jpeg")?, None);
        storage.remove("thumbnails/none.jpeg")?;
        Ok(())
    }

    #[test]
    fn remove_deletes_file() -> Result<()> {
        let root = unique_temp_root();
        let storage = LocalFileStorage::new(&root);
        storage.save("thumbnails/b.jpeg", b"x")?;

        storage.remove("thumbnails/b.jpeg")?;

        assert!(!root.join("thumbnails/b.jpeg").exists());
        let _ = fs::remove_dir_all(&root);
        Ok(())
    }

    #[test]
    fn sanitize_blocks_parent_segments_and_leading_slash() -> Result<()> {
        let root = unique_temp_root();
        let storage = LocalFileStorage::new(&root);

        let abs = storage.save("../secret.jpeg", b"x")?;
        assert_eq!(Path::new(&abs), root.join("_/secret.jpeg"));

        let abs = storage.save("/top/level.jpeg", b"y")?;
        assert_eq!(Path::new(&abs), root.join("top/level.jpeg"));

        let _ = fs::remove_dir_all(&root);
        Ok(())
    }

    #[test]
    fn root_returns_configured_path() {
        let root = unique_temp_root();
        let storage = LocalFileStorage::new(&root);
        assert_eq!(storage.root(), root.as_path());
    }
}
