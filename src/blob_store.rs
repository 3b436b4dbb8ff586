//! `localStorage`-backed blob store.

use canvas::storage::{BlobStore, StorageError, StorageResult};
use web_sys::Storage;

/// Room blobs kept in the window's `localStorage`.
pub struct LocalBlobStore {
    storage: Storage,
}

impl LocalBlobStore {
    /// Bind to the current window's `localStorage`.
    ///
    /// # Errors
    ///
    /// Returns `Backend` when there is no window or storage is disabled
    /// (private browsing modes, sandboxed frames).
    pub fn from_window() -> StorageResult<Self> {
        let window = web_sys::window().ok_or_else(|| StorageError::Backend("no window".into()))?;
        let storage = window
            .local_storage()
            .map_err(|e| backend_error("open", &e))?
            .ok_or_else(|| StorageError::Backend("localStorage unavailable".into()))?;
        Ok(Self { storage })
    }
}

impl BlobStore for LocalBlobStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.storage.get_item(key).map_err(|e| backend_error("read", &e))
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.storage.set_item(key, value).map_err(|e| backend_error("write", &e))
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.storage.remove_item(key).map_err(|e| backend_error("remove", &e))
    }
}

fn backend_error(op: &str, err: &wasm_bindgen::JsValue) -> StorageError {
    StorageError::Backend(format!("localStorage {op} failed: {err:?}"))
}
