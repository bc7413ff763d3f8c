//! `localStorage` adapter

use crate::describe;
use codepad_core::{CodepadError, KeyValueStore, Result};
use web_sys::Storage;

pub struct LocalStorageStore {
    storage: Storage,
}

impl LocalStorageStore {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// The window's `localStorage`
    pub fn from_window() -> Result<Self> {
        let window =
            web_sys::window().ok_or_else(|| CodepadError::Storage("no window".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(|e| CodepadError::Storage(describe(&e)))?
            .ok_or_else(|| CodepadError::Storage("localStorage is unavailable".to_string()))?;
        Ok(Self::new(storage))
    }
}

impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|e| CodepadError::Storage(describe(&e)))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        // Fails when the quota is exceeded
        self.storage
            .set_item(key, value)
            .map_err(|e| CodepadError::Storage(describe(&e)))
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.storage
            .remove_item(key)
            .map_err(|e| CodepadError::Storage(describe(&e)))
    }
}
