//! File-backed key-value store
//!
//! Every key lives in one JSON object on disk. Writes go to a temp file that
//! is then renamed over the original, so a crash never leaves half a file.

use codepad_core::{CodepadError, KeyValueStore, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let data = fs::read(&self.path)?;
        serde_json::from_slice(&data).map_err(|e| {
            CodepadError::Storage(format!("failed to parse {}: {}", self.path.display(), e))
        })
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp_path = self.path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(entries)?;

        fs::write(&tmp_path, bytes)?;
        fs::rename(&tmp_path, &self.path)?;
        debug!(path = %self.path.display(), keys = entries.len(), "Wrote storage file");
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codepad_core::ProjectStore;

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/storage.json");

        let store = FileStore::open(&path);
        assert_eq!(store.get("projects").unwrap(), None);
        store.set("projects", "[]").unwrap();
        store.set("projectName", "Demo").unwrap();

        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get("projects").unwrap().as_deref(), Some("[]"));

        reopened.remove("projects").unwrap();
        assert_eq!(store.get("projects").unwrap(), None);
        assert_eq!(store.get("projectName").unwrap().as_deref(), Some("Demo"));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_project_store_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProjectStore::new(FileStore::open(dir.path().join("storage.json")));

        let project = store.create().unwrap();
        let copy = store.duplicate(&project).unwrap();
        store.delete(&project.id).unwrap();

        let names: Vec<String> = store.list().unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec![copy.name]);
    }

    #[test]
    fn test_corrupt_file_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "not json").unwrap();

        let err = FileStore::open(&path).get("projects").unwrap_err();
        assert!(matches!(err, CodepadError::Storage(_)));
    }
}
