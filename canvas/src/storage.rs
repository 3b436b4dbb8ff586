//! Room persistence over a key-value blob store.
//!
//! Each room is one blob under the key `drawing_{room_id}` holding the JSON
//! array of its shapes. Writes overwrite the whole blob (last writer wins).
//! Reads never fail: a missing or malformed blob loads as an empty room.
//!
//! The engine only needs [`BlobStore`]; the browser host backs it with
//! `localStorage`, tests use [`MemoryBlobStore`].

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::doc::Shape;

/// Storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Synchronous string-keyed blob store.
///
/// `set` must replace the previous value in a single step so a reader never
/// observes a half-written blob.
pub trait BlobStore {
    /// Read the blob under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `Backend` if the store cannot be read.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Write `value` under `key`, replacing any previous blob.
    ///
    /// # Errors
    ///
    /// Returns `Backend` if the store rejects the write (e.g. quota exceeded).
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Delete the blob under `key`. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `Backend` if the store cannot be modified.
    fn remove(&self, key: &str) -> StorageResult<()>;
}

/// Storage key for a room's drawing.
#[must_use]
pub fn room_key(room_id: &str) -> String {
    format!("drawing_{room_id}")
}

/// Load a room's shapes. Missing or unreadable data yields an empty room.
#[must_use]
pub fn load_shapes(store: &dyn BlobStore, room_id: &str) -> Vec<Shape> {
    let key = room_key(room_id);
    let raw = match store.get(&key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            log::warn!("reading {key} failed, starting empty: {e}");
            return Vec::new();
        }
    };
    match serde_json::from_str(&raw) {
        Ok(shapes) => shapes,
        Err(e) => {
            log::warn!("discarding malformed drawing in {key}: {e}");
            Vec::new()
        }
    }
}

/// Serialize `shapes` and overwrite the room's blob.
///
/// # Errors
///
/// Returns `Serialization` if a shape cannot be encoded, or `Backend` if the
/// store rejects the write.
pub fn save_shapes(store: &dyn BlobStore, room_id: &str, shapes: &[Shape]) -> StorageResult<()> {
    let raw = serde_json::to_string(shapes)?;
    store.set(&room_key(room_id), &raw)
}

/// In-memory blob store for tests and ephemeral rooms.
///
/// Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    blobs: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryBlobStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let blobs = self
            .blobs
            .try_borrow()
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        Ok(blobs.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut blobs = self
            .blobs
            .try_borrow_mut()
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        blobs.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut blobs = self
            .blobs
            .try_borrow_mut()
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        blobs.remove(key);
        Ok(())
    }
}
