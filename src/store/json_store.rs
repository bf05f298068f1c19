//! JSON file backed key-value store.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use anyhow::Context;
use log::{debug, info, warn};
use serde_json::Value;
use tokio::fs;

/// Key-value store persisted as a single JSON object.
///
/// Every call to [`JsonStore::set`] rewrites the whole document before
/// returning, so a successful `set` means the value is on disk.
#[derive(Debug)]
pub struct JsonStore {
    /// Path to the JSON document
    path: PathBuf,
    /// In-memory copy of the document
    entries: HashMap<String, Value>,
}

impl JsonStore {
    /// Loads the store from `path`.
    ///
    /// If the file does not exist an empty store is created and persisted
    /// right away, so the data directory is validated at startup.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be checked or read, does not contain
    /// a JSON object, or if the initial empty document cannot be written.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        let path = path.as_ref().to_path_buf();

        let exists = fs::try_exists(&path)
            .await
            .with_context(|| format!("failed to check store at {}", path.display()))?;

        if !exists {
            warn!(
                "no store found at {}, starting with an empty one",
                path.display()
            );
            let store = JsonStore {
                path,
                entries: HashMap::new(),
            };
            store.persist().await?;
            return Ok(store);
        }

        let serialized = fs::read_to_string(&path)
            .await
            .with_context(|| format!("failed to read store at {}", path.display()))?;
        let entries: HashMap<String, Value> = serde_json::from_str(&serialized)
            .with_context(|| format!("store at {} is not a JSON object", path.display()))?;

        info!("loaded store {}", serialized);

        Ok(JsonStore { path, entries })
    }

    /// Returns the raw value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Returns the integer stored under `key`, or `default` when the key is
    /// missing or does not hold an integer.
    pub fn get_i64(&self, key: &str, default: i64) -> i64 {
        self.get(key).and_then(Value::as_i64).unwrap_or(default)
    }

    /// Returns the string stored under `key`. `null` and non-string values read as `None`.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Stores `value` under `key` and persists the whole document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be written. The in-memory value
    /// is updated regardless, matching what the next successful write persists.
    pub async fn set(&mut self, key: &str, value: Value) -> Result<(), anyhow::Error> {
        debug!("set {} = {}", key, value);
        self.entries.insert(key.to_owned(), value);
        self.persist().await
    }

    /// Writes the document to a sibling temporary file and renames it over
    /// the target path.
    async fn persist(&self) -> Result<(), anyhow::Error> {
        let serialized = serde_json::to_string(&self.entries)?;

        let mut tmp_path = self.path.clone().into_os_string();
        tmp_path.push(".tmp");

        fs::write(&tmp_path, serialized)
            .await
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        fs::rename(&tmp_path, &self.path)
            .await
            .with_context(|| format!("failed to replace {}", self.path.display()))?;

        debug!("persisted store to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn store_path(dir: &TempDir) -> PathBuf {
        dir.path().join("tracker.json")
    }

    #[tokio::test]
    async fn test_load_missing_file_creates_empty_store() {
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);

        let store = JsonStore::load(&path).await.unwrap();

        assert!(store.get("momentum").is_none());
        let on_disk = fs::read_to_string(&path).await.unwrap();
        assert_eq!(on_disk, "{}");
    }

    #[tokio::test]
    async fn test_set_persists_immediately() {
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);
        let mut store = JsonStore::load(&path).await.unwrap();

        store.set("momentum", json!(4)).await.unwrap();
        store.set("scene", json!("Arrakeen")).await.unwrap();

        let reloaded = JsonStore::load(&path).await.unwrap();
        assert_eq!(reloaded.get_i64("momentum", 0), 4);
        assert_eq!(reloaded.get_str("scene"), Some("Arrakeen"));
    }

    #[tokio::test]
    async fn test_get_i64_defaults() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonStore::load(store_path(&dir)).await.unwrap();

        assert_eq!(store.get_i64("threat", 0), 0);

        store.set("threat", json!("not a number")).await.unwrap();
        assert_eq!(store.get_i64("threat", 7), 7);
    }

    #[tokio::test]
    async fn test_null_reads_as_no_string() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonStore::load(store_path(&dir)).await.unwrap();

        store.set("scene", Value::Null).await.unwrap();

        assert_eq!(store.get("scene"), Some(&Value::Null));
        assert_eq!(store.get_str("scene"), None);
    }

    #[tokio::test]
    async fn test_load_existing_document() {
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);
        fs::write(&path, r#"{"momentum": 2, "threat": 9, "scene": null}"#)
            .await
            .unwrap();

        let store = JsonStore::load(&path).await.unwrap();

        assert_eq!(store.get_i64("momentum", 0), 2);
        assert_eq!(store.get_i64("threat", 0), 9);
        assert_eq!(store.get_str("scene"), None);
    }

    #[tokio::test]
    async fn test_load_corrupted_file_fails() {
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);
        fs::write(&path, "{ this is not valid json ").await.unwrap();

        let result = JsonStore::load(&path).await;

        assert!(result.is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_load_unreadable_path_fails_without_overwriting() {
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);
        // A symlink to itself cannot be resolved
        fs::symlink(&path, &path).await.unwrap();

        let result = JsonStore::load(&path).await;

        assert!(result.is_err());
        let metadata = fs::symlink_metadata(&path).await.unwrap();
        assert!(metadata.file_type().is_symlink());
    }

    #[tokio::test]
    async fn test_set_leaves_no_temporary_file() {
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);
        let mut store = JsonStore::load(&path).await.unwrap();

        store.set("momentum", json!(1)).await.unwrap();

        assert!(!fs::try_exists(dir.path().join("tracker.json.tmp")).await.unwrap());
    }
}
