//! In-memory key-value store using DashMap

use crate::ports::KeyValueStore;
use crate::Result;
use dashmap::DashMap;
use std::sync::Arc;

/// Key-value store held in memory.
///
/// Clones share the same map, so a test can keep a handle and inspect what a
/// `ProjectStore` wrote.
#[derive(Clone, Default)]
pub struct MemoryStore {
    data: Arc<DashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.get(key).map(|entry| entry.value().clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.data.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_operations() {
        let store = MemoryStore::new();

        store.set("key1", "value").unwrap();
        assert_eq!(store.get("key1").unwrap().as_deref(), Some("value"));

        assert_eq!(store.get("nonexistent").unwrap(), None);

        store.remove("key1").unwrap();
        assert_eq!(store.get("key1").unwrap(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_clones_share_data() {
        let store = MemoryStore::new();
        let handle = store.clone();

        store.set("projects", "[]").unwrap();
        assert_eq!(handle.get("projects").unwrap().as_deref(), Some("[]"));
        assert_eq!(handle.len(), 1);
    }
}
