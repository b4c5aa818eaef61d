use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Arc, Mutex, MutexGuard};

use bytes::Bytes;

use super::key::{ThumbnailKey, ThumbnailSpec};
use super::record::ThumbnailRecord;
use super::store::ThumbnailStore;
use crate::error::thumbnail::StoreError;
use crate::time::clock::Clock;

/// Process-local [`ThumbnailStore`].
///
/// Used when no database is configured. Every operation holds one mutex, which
/// makes `get_or_create` trivially atomic. Contents are lost on restart.
pub struct MemoryThumbnailStore {
    records: Mutex<HashMap<ThumbnailKey, ThumbnailRecord>>,
    clock: Arc<dyn Clock>,
}

impl MemoryThumbnailStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            clock,
        }
    }

    pub fn len(&self) -> usize {
        self.lock().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<ThumbnailKey, ThumbnailRecord>>, StoreError> {
        self.records
            .lock()
            .map_err(|_| StoreError::Backend("memory store lock poisoned".into()))
    }
}

impl ThumbnailStore for MemoryThumbnailStore {
    fn get_or_create(&self, spec: &ThumbnailSpec) -> Result<(ThumbnailRecord, bool), StoreError> {
        let mut records = self.lock()?;
        match records.entry(spec.key()) {
            Entry::Occupied(e) => Ok((e.get().clone(), false)),
            Entry::Vacant(e) => {
                let rec = ThumbnailRecord::empty(spec, self.clock.now());
                Ok((e.insert(rec).clone(), true))
            }
        }
    }

    fn attach_image(&self, key: &ThumbnailKey, bytes: &[u8]) -> Result<ThumbnailRecord, StoreError> {
        let mut records = self.lock()?;
        let rec = records.get_mut(key).ok_or_else(StoreError::not_found)?;
        if let Some(existing) = &rec.image {
            if existing.as_ref() == bytes {
                return Ok(rec.clone());
            }
            return Err(StoreError::Conflict {
                key: key.to_string(),
            });
        }
        rec.image = Some(Bytes::copy_from_slice(bytes));
        rec.updated_at = self.clock.now();
        Ok(rec.clone())
    }

    fn delete(&self, key: &ThumbnailKey) -> Result<(), StoreError> {
        self.lock()?.remove(key);
        Ok(())
    }

    fn get(&self, key: &ThumbnailKey) -> Result<ThumbnailRecord, StoreError> {
        self.lock()?
            .get(key)
            .cloned()
            .ok_or_else(StoreError::not_found)
    }
}
