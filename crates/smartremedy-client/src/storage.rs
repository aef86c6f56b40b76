//! Key/value local storage.
//!
//! The dashboard persists exactly two values (auth token, theme) under fixed
//! keys. `FileStore` keeps them in one JSON object on disk; `MemoryStore` is
//! the same contract without persistence.

use std::collections::{BTreeMap, HashMap};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use smartremedy_common::{Result, SmartRemedyError};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}

// ── File-backed store ─────────────────────────────────────────────────────────

pub struct FileStore {
    path: PathBuf,
    /// Serialises read-modify-write cycles.
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), write_lock: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<BTreeMap<String, String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Entries to rewrite on `set`/`remove`. An unparsable file is replaced
    /// rather than left to fail every later write.
    /// The flag is set when the file was discarded and must be rewritten.
    async fn read_for_update(&self) -> Result<(BTreeMap<String, String>, bool)> {
        match self.read_all().await {
            Ok(entries) => Ok((entries, false)),
            Err(SmartRemedyError::Serialization(e)) => {
                warn!(path = %self.path.display(), error = %e, "discarding unreadable storage file");
                Ok((BTreeMap::new(), true))
            }
            Err(e) => Err(e),
        }
    }

    async fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(entries)?).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!(path = %self.path.display(), keys = entries.len(), "storage written");
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let (mut entries, _) = self.read_for_update().await?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let (mut entries, discarded) = self.read_for_update().await?;
        if entries.remove(key).is_some() || discarded {
            self.write_all(&entries).await?;
        }
        Ok(())
    }
}

// ── In-memory store ───────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let entries = entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        Self { entries: RwLock::new(entries) }
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.write().await.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn file_store_round_trips_and_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let store = FileStore::new(&path);
        assert_eq!(store.get("theme").await.unwrap(), None);
        store.set("theme", "light").await.unwrap();
        store.set("token", "abc").await.unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get("theme").await.unwrap().as_deref(), Some("light"));

        reopened.remove("token").await.unwrap();
        assert_eq!(store.get("token").await.unwrap(), None);
        assert_eq!(store.get("theme").await.unwrap().as_deref(), Some("light"));
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error_on_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        tokio::fs::write(&path, "{not json").await.unwrap();

        let store = FileStore::new(&path);
        assert!(store.get("token").await.is_err());
    }

    #[tokio::test]
    async fn set_replaces_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        tokio::fs::write(&path, "{not json").await.unwrap();

        let store = FileStore::new(&path);
        store.set("token", "abc").await.unwrap();
        assert_eq!(store.get("token").await.unwrap().as_deref(), Some("abc"));
        assert_eq!(store.get("theme").await.unwrap(), None);
    }

    #[tokio::test]
    async fn remove_clears_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        tokio::fs::write(&path, "{not json").await.unwrap();

        let store = FileStore::new(&path);
        store.remove("token").await.unwrap();
        assert_eq!(store.get("token").await.unwrap(), None);
    }

    #[tokio::test]
    async fn memory_store_seeded_entries() {
        let store = MemoryStore::with_entries([("k", "v")]);
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
        store.remove("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }
}
