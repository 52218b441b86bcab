//! Key-value persistence port
//!
//! The rest of the crate persists small string values (the forecast payload,
//! its fetch timestamp, the selected place) through the `Store` trait, so the
//! backing medium can be swapped: the filesystem in the real binary, a
//! hashmap in tests.

use directories::ProjectDirs;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

/// String key-value persistence with best-effort durability
pub trait Store: Send + Sync {
    /// Returns the stored value for a key, if any
    fn get(&self, key: &str) -> Option<String>;

    /// Stores a value under a key, replacing any previous value
    fn set(&self, key: &str, value: &str) -> io::Result<()>;

    /// Removes a key; removing an absent key is not an error
    fn remove(&self, key: &str) -> io::Result<()>;
}

/// Filesystem-backed store: one JSON file per key in the project cache dir
///
/// Uses `~/.cache/skygaze/` on Linux, or the equivalent XDG path on other
/// platforms.
#[derive(Debug, Clone)]
pub struct FsStore {
    dir: PathBuf,
}

impl FsStore {
    /// Creates a store rooted at the platform cache directory
    ///
    /// Returns `None` if the directory cannot be determined (e.g., no home
    /// directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "skygaze")?;
        Some(Self {
            dir: project_dirs.cache_dir().to_path_buf(),
        })
    }

    /// Creates a store rooted at a custom directory
    ///
    /// Useful for testing or when a specific location is needed.
    pub fn with_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Returns the file path backing the given key
    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// Ensures the backing directory exists
    fn ensure_dir(&self) -> io::Result<()> {
        fs::create_dir_all(&self.dir)
    }
}

impl Store for FsStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.key_path(key)).ok()
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        self.ensure_dir()?;
        fs::write(self.key_path(key), value)
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        match fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err),
        }
    }
}

/// In-memory store for tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().ok()?;
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "store mutex poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "store mutex poisoned"))?;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (FsStore, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = FsStore::with_dir(temp_dir.path().to_path_buf());
        (store, temp_dir)
    }

    #[test]
    fn test_fs_store_set_creates_file() {
        let (store, temp_dir) = create_test_store();

        store.set("alpha", "{\"x\":1}").expect("Set should succeed");

        let expected_path = temp_dir.path().join("alpha.json");
        assert!(expected_path.exists(), "Backing file should exist");
        assert_eq!(
            fs::read_to_string(expected_path).expect("Should read file"),
            "{\"x\":1}"
        );
    }

    #[test]
    fn test_fs_store_get_returns_none_for_missing_key() {
        let (store, _temp_dir) = create_test_store();
        assert!(store.get("missing").is_none());
    }

    #[test]
    fn test_fs_store_set_then_get_roundtrip() {
        let (store, _temp_dir) = create_test_store();

        store.set("key", "value one").expect("Set should succeed");
        assert_eq!(store.get("key").as_deref(), Some("value one"));

        store.set("key", "value two").expect("Set should succeed");
        assert_eq!(
            store.get("key").as_deref(),
            Some("value two"),
            "Set should replace the previous value"
        );
    }

    #[test]
    fn test_fs_store_creates_directory_if_missing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let nested = temp_dir.path().join("nested").join("store");
        let store = FsStore::with_dir(nested.clone());

        store.set("key", "value").expect("Set should succeed");

        assert!(nested.exists(), "Nested directory should be created");
    }

    #[test]
    fn test_fs_store_remove_deletes_value() {
        let (store, _temp_dir) = create_test_store();

        store.set("key", "value").expect("Set should succeed");
        store.remove("key").expect("Remove should succeed");

        assert!(store.get("key").is_none());
    }

    #[test]
    fn test_fs_store_remove_missing_key_is_ok() {
        let (store, _temp_dir) = create_test_store();
        assert!(store.remove("never_set").is_ok());
    }

    #[test]
    fn test_fs_store_new_uses_project_path() {
        if let Some(store) = FsStore::new() {
            let path_str = store.dir.to_string_lossy();
            assert!(
                path_str.contains("skygaze"),
                "Store path should contain project name"
            );
        }
        // Test passes if new() returns None (e.g., no home directory in CI)
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::default();

        assert!(store.get("key").is_none());

        store.set("key", "value").expect("Set should succeed");
        assert_eq!(store.get("key").as_deref(), Some("value"));

        store.remove("key").expect("Remove should succeed");
        assert!(store.get("key").is_none());
    }

    #[test]
    fn test_memory_store_remove_missing_key_is_ok() {
        let store = MemoryStore::default();
        assert!(store.remove("never_set").is_ok());
    }
}
