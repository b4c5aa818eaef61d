//! # SQL-backed Thumbnail Store
//!
//! Rows live in the `thumbnails` table behind the [`Db`] port; encoded JPEGs
//! live in a [`FileStorage`] under `thumbnails/`.
//!
//! ## Atomicity
//! - `get_or_create` is `INSERT IGNORE` against the unique `cache_key`
//!   followed by a point `SELECT`. The affected-row count tells the winner.
//! - `attach_image` writes the blob under a content-addressed name first, then
//!   claims the row with a conditional `UPDATE`. A writer that loses the claim
//!   removes its own blob unless the winner wrote the very same name
//!   (identical bytes), which makes repeated attaches idempotent.
//!
//! ## Lost blobs
//! A row whose blob file has disappeared reads as a record without an image,
//! so the next request produces it again. The claim accepts that stale
//! `image_path` as well as `NULL`.

use std::sync::Arc;

use anyhow::Context;
use bytes::Bytes;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use super::key::{ThumbnailKey, ThumbnailSpec};
use super::record::ThumbnailRecord;
use super::store::ThumbnailStore;
use crate::db::port::{Db, Row};
use crate::error::thumbnail::StoreError;
use crate::params;
use crate::storage::blob::FileStorage;
use crate::time::clock::Clock;

const SELECT_BY_KEY: &str = "SELECT cache_key, url, max_width, max_height, image_path, \
     created_at, updated_at FROM thumbnails WHERE cache_key = ?";

const INSERT_IGNORE: &str = "INSERT IGNORE INTO thumbnails \
     (cache_key, url, max_width, max_height, image_path, created_at, updated_at) \
     VALUES (?, ?, ?, ?, NULL, ?, ?)";

const CLAIM_IMAGE: &str = "UPDATE thumbnails SET image_path = ?, updated_at = ? \
     WHERE cache_key = ? AND (image_path IS NULL OR image_path = ?)";

const DELETE_BY_KEY: &str = "DELETE FROM thumbnails WHERE cache_key = ?";

/// Inserting can race a concurrent delete of the same key; give up after this
/// many insert/select rounds.
const GET_OR_CREATE_ROUNDS: usize = 3;

pub struct DbThumbnailStore {
    db: Arc<dyn Db>,
    blobs: Arc<dyn FileStorage>,
    clock: Arc<dyn Clock>,
}

impl DbThumbnailStore {
    /// DDL of the backing table.
    pub const SCHEMA: &'static str = "CREATE TABLE IF NOT EXISTS thumbnails (
    id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
    cache_key CHAR(64) NOT NULL,
    url TEXT NOT NULL,
    max_width INT UNSIGNED NOT NULL,
    max_height INT UNSIGNED NOT NULL,
    image_path VARCHAR(255) NULL,
    created_at DATETIME(6) NOT NULL,
    updated_at DATETIME(6) NOT NULL,
    UNIQUE KEY uq_thumbnails_cache_key (cache_key)
)";

    pub fn new(db: Arc<dyn Db>, blobs: Arc<dyn FileStorage>, clock: Arc<dyn Clock>) -> Self {
        Self { db, blobs, clock }
    }

    /// Creates the `thumbnails` table if it does not exist.
    pub fn ensure_schema(&self) -> anyhow::Result<()> {
        self.db
            .exec(Self::SCHEMA, &[])
            .context("create thumbnails table")?;
        Ok(())
    }

    /// Relative blob path for `bytes` attached to `key`.
    pub fn blob_path(key: &ThumbnailKey, bytes: &[u8]) -> String {
        let digest = format!("{:x}", Sha256::digest(bytes));
        format!("thumbnails/{key}-{}.jpeg", &digest[..16])
    }

    fn select(&self, key: &ThumbnailKey) -> Result<Option<(ThumbnailRecord, Option<String>)>, StoreError> {
        let row = self
            .db
            .fetch_one(SELECT_BY_KEY, &params![key.as_str()])
            .map_err(StoreError::backend)?;
        match row {
            None => Ok(None),
            Some(row) => self.materialize(&row).map(Some),
        }
    }

    /// Maps a row and loads its blob, if any.
    fn materialize(&self, row: &Row) -> Result<(ThumbnailRecord, Option<String>), StoreError> {
        let read = || -> anyhow::Result<(ThumbnailRecord, Option<String>)> {
            let image_path = row.get_string_opt("image_path")?;
            let image = match &image_path {
                None => None,
                Some(path) => match self.blobs.load(path)? {
                    Some(bytes) => Some(Bytes::from(bytes)),
                    None => {
                        warn!(path = %path, "thumbnail blob is missing");
                        None
                    }
                },
            };
            let rec = ThumbnailRecord {
                key: ThumbnailKey::from_raw(row.get_string("cache_key")?),
                source_url: row.get_string("url")?,
                max_width: row.get_u32("max_width")?,
                max_height: row.get_u32("max_height")?,
                image,
                created_at: row.get_datetime("created_at")?,
                updated_at: row.get_datetime("updated_at")?,
            };
            Ok((rec, image_path))
        };
        read().map_err(StoreError::backend)
    }
}

impl ThumbnailStore for DbThumbnailStore {
    fn get_or_create(&self, spec: &ThumbnailSpec) -> Result<(ThumbnailRecord, bool), StoreError> {
        let key = spec.key();
        for _ in 0..GET_OR_CREATE_ROUNDS {
            let now = self.clock.now();
            let inserted = self
                .db
                .exec(
                    INSERT_IGNORE,
                    &params![
                        key.as_str(),
                        spec.source_url.as_str(),
                        spec.max_width,
                        spec.max_height,
                        now,
                        now
                    ],
                )
                .map_err(StoreError::backend)?;

            if let Some((rec, _)) = self.select(&key)? {
                debug!(key = %key, created = inserted == 1, "thumbnail row resolved");
                return Ok((rec, inserted == 1));
            }
            warn!(key = %key, "thumbnail row vanished after insert, retrying");
        }
        Err(StoreError::Backend(format!(
            "could not create thumbnail row {key} after {GET_OR_CREATE_ROUNDS} rounds"
        )))
    }

    fn attach_image(&self, key: &ThumbnailKey, bytes: &[u8]) -> Result<ThumbnailRecord, StoreError> {
        let path = Self::blob_path(key, bytes);

        let (current, image_path) = self.select(key)?.ok_or_else(StoreError::not_found)?;
        if current.is_ready() {
            return match image_path {
                Some(existing) if existing == path => Ok(current),
                _ => Err(StoreError::Conflict {
                    key: key.to_string(),
                }),
            };
        }
        // Set only when the previous blob was lost.
        let stale = image_path;
        if let Some(lost) = &stale {
            debug!(key = %key, path = %lost, "replacing lost thumbnail blob");
        }

        self.blobs
            .save(&path, bytes)
            .with_context(|| format!("save blob {path}"))
            .map_err(StoreError::backend)?;

        let claimed = self
            .db
            .exec(
                CLAIM_IMAGE,
                &params![path.as_str(), self.clock.now(), key.as_str(), stale.as_deref()],
            )
            .map_err(StoreError::backend)?;

        if claimed == 1 {
            return self
                .select(key)?
                .map(|(rec, _)| rec)
                .ok_or_else(StoreError::not_found);
        }

        match self.select(key)? {
            Some((rec, Some(existing))) if existing == path && rec.is_ready() => Ok(rec),
            other => {
                if let Err(e) = self.blobs.remove(&path) {
                    warn!(path = %path, error = %e, "failed to remove unclaimed blob");
                }
                match other {
                    None => Err(StoreError::not_found()),
                    Some(_) => Err(StoreError::Conflict {
                        key: key.to_string(),
                    }),
                }
            }
        }
    }

    fn delete(&self, key: &ThumbnailKey) -> Result<(), StoreError> {
        let path = self
            .db
            .fetch_one(SELECT_BY_KEY, &params![key.as_str()])
            .map_err(StoreError::backend)?
            .map(|row| row.get_string_opt("image_path"))
            .transpose()
            .map_err(StoreError::backend)?
            .flatten();

        self.db
            .exec(DELETE_BY_KEY, &params![key.as_str()])
            .map_err(StoreError::backend)?;

        if let Some(path) = path {
            self.blobs.remove(&path).map_err(StoreError::backend)?;
        }
        Ok(())
    }

    fn get(&self, key: &ThumbnailKey) -> Result<ThumbnailRecord, StoreError> {
        self.select(key)?
            .map(|(rec, _)| rec)
            .ok_or_else(StoreError::not_found)
    }
}
