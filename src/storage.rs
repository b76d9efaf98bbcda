//! Durable key-value storage backing the entry store and preferences

use crate::error::{FreewriteError, Result};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::debug;

/// Synchronous string key-value store.
pub trait KeyValueStore {
    /// Returns `None` when the key has never been written.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the value stored under `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Directory-backed store: one file per key.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) the storage directory
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        debug!(dir = %dir.display(), "opened file store");
        Ok(FileStore { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(FreewriteError::Io(e)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let target = self.path_for(key);
        let tmp = self.dir.join(format!(".{}.tmp", key));

        // Write then rename so a failed write never truncates the old value
        fs::write(&tmp, value)
            .and_then(|_| fs::rename(&tmp, &target))
            .map_err(|source| {
                let _ = fs::remove_file(&tmp);
                FreewriteError::Storage {
                    key: key.to_string(),
                    source,
                }
            })?;

        debug!(key, bytes = value.len(), "wrote key");
        Ok(())
    }
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_missing_key_is_none() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::open(temp.path()).unwrap();
        assert_eq!(store.get("entries").unwrap(), None);
    }

    #[test]
    fn test_file_store_set_then_get() {
        let temp = TempDir::new().unwrap();
        let mut store = FileStore::open(temp.path()).unwrap();

        store.set("dark-mode", "true").unwrap();
        assert_eq!(store.get("dark-mode").unwrap().as_deref(), Some("true"));

        store.set("dark-mode", "false").unwrap();
        assert_eq!(store.get("dark-mode").unwrap().as_deref(), Some("false"));
    }

    #[test]
    fn test_file_store_creates_nested_dir() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("a").join("b");
        let mut store = FileStore::open(&nested).unwrap();
        store.set("rtl-mode", "true").unwrap();
        assert!(nested.join("rtl-mode").exists());
        assert!(!nested.join(".rtl-mode.tmp").exists());
    }

    #[test]
    fn test_file_store_write_failure_is_storage_error() {
        let temp = TempDir::new().unwrap();
        let mut store = FileStore::open(temp.path()).unwrap();

        // A directory where the value file should go makes the rename fail
        fs::create_dir(temp.path().join("entries")).unwrap();
        fs::write(temp.path().join("entries").join("keep"), "x").unwrap();

        let err = store.set("entries", "[]").unwrap_err();
        match err {
            FreewriteError::Storage { key, .. } => assert_eq!(key, "entries"),
            other => panic!("expected storage error, got {other:?}"),
        }
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("sidebar-visible").unwrap(), None);
        store.set("sidebar-visible", "true").unwrap();
        assert_eq!(
            store.get("sidebar-visible").unwrap(),
            Some("true".to_string())
        );
    }
}
