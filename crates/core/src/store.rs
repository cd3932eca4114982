//! Durable key-value storage for the persisted session

use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Keys under which session fields are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StorageKey {
    BearerToken,
    RefreshToken,
    TokenExpiry,
    UserEmail,
}

impl StorageKey {
    /// Every session key, in the order they are written
    pub const ALL: [Self; 4] = [
        Self::BearerToken,
        Self::RefreshToken,
        Self::TokenExpiry,
        Self::UserEmail,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BearerToken => "bearerToken",
            Self::RefreshToken => "refreshToken",
            Self::TokenExpiry => "tokenExpiry",
            Self::UserEmail => "userEmail",
        }
    }
}

impl std::fmt::Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, key: StorageKey) -> Result<Option<String>>;
    async fn set(&self, key: StorageKey, value: &str) -> Result<()>;
    async fn remove(&self, key: StorageKey) -> Result<()>;

    /// Write several keys as one update
    async fn set_many(&self, entries: &[(StorageKey, String)]) -> Result<()> {
        for (key, value) in entries {
            self.set(*key, value).await?;
        }
        Ok(())
    }

    /// Remove several keys as one update
    async fn remove_many(&self, keys: &[StorageKey]) -> Result<()> {
        for key in keys {
            self.remove(*key).await?;
        }
        Ok(())
    }
}

/// Process-local store, lost when dropped
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<StorageKey, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<StorageKey, String>>> {
        self.entries
            .lock()
            .map_err(|_| Error::storage("memory store lock poisoned"))
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn get(&self, key: StorageKey) -> Result<Option<String>> {
        Ok(self.lock()?.get(&key).cloned())
    }

    async fn set(&self, key: StorageKey, value: &str) -> Result<()> {
        self.lock()?.insert(key, value.to_string());
        Ok(())
    }

    async fn remove(&self, key: StorageKey) -> Result<()> {
        self.lock()?.remove(&key);
        Ok(())
    }
}

/// Store backed by a JSON object on disk
///
/// A missing file reads as an empty store. Every mutation rewrites the whole
/// file through a uniquely named temporary sibling that is then renamed over
/// it.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: tokio::sync::Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_map(&self) -> Result<BTreeMap<String, String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_map(&self, map: &BTreeMap<String, String>) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        tokio::fs::create_dir_all(&dir).await?;

        let contents = serde_json::to_vec_pretty(map)?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || -> Result<()> {
            // Unique sibling so concurrent writers never share a temp file
            let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
            tmp.write_all(&contents)?;
            tmp.as_file().sync_all()?;
            tmp.persist(&path).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(|e| Error::storage(format!("session file write task failed: {e}")))??;

        tracing::trace!(path = %self.path.display(), keys = map.len(), "Session file written");
        Ok(())
    }

    async fn update<F>(&self, apply: F) -> Result<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>) + Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut map = self.read_map().await?;
        apply(&mut map);
        self.write_map(&map).await
    }
}

#[async_trait]
impl SessionStore for FileStore {
    async fn get(&self, key: StorageKey) -> Result<Option<String>> {
        Ok(self.read_map().await?.remove(key.as_str()))
    }

    async fn set(&self, key: StorageKey, value: &str) -> Result<()> {
        let value = value.to_string();
        self.update(move |map| {
            map.insert(key.as_str().to_string(), value);
        })
        .await
    }

    async fn remove(&self, key: StorageKey) -> Result<()> {
        self.update(move |map| {
            map.remove(key.as_str());
        })
        .await
    }

    async fn set_many(&self, entries: &[(StorageKey, String)]) -> Result<()> {
        let entries = entries.to_vec();
        self.update(move |map| {
            for (key, value) in entries {
                map.insert(key.as_str().to_string(), value);
            }
        })
        .await
    }

    async fn remove_many(&self, keys: &[StorageKey]) -> Result<()> {
        let keys = keys.to_vec();
        self.update(move |map| {
            for key in keys {
                map.remove(key.as_str());
            }
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_set_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get(StorageKey::BearerToken).await.unwrap(), None);

        store.set(StorageKey::BearerToken, "T1").await.unwrap();
        assert_eq!(
            store.get(StorageKey::BearerToken).await.unwrap().as_deref(),
            Some("T1")
        );

        store.remove(StorageKey::BearerToken).await.unwrap();
        assert_eq!(store.get(StorageKey::BearerToken).await.unwrap(), None);
    }

    #[tokio::test]
    async fn file_store_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested").join("session.json"));
        assert_eq!(store.get(StorageKey::UserEmail).await.unwrap(), None);
    }

    #[tokio::test]
    async fn file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = FileStore::new(&path);
        store
            .set_many(&[
                (StorageKey::BearerToken, "T1".to_string()),
                (StorageKey::UserEmail, "a@b.com".to_string()),
            ])
            .await
            .unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(
            reopened.get(StorageKey::UserEmail).await.unwrap().as_deref(),
            Some("a@b.com")
        );

        let raw: BTreeMap<String, String> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw.get("bearerToken").map(String::as_str), Some("T1"));
    }

    #[tokio::test]
    async fn file_store_remove_many_leaves_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("session.json"));
        store.set(StorageKey::RefreshToken, "R1").await.unwrap();
        store.set(StorageKey::UserEmail, "a@b.com").await.unwrap();

        store.remove_many(&[StorageKey::RefreshToken]).await.unwrap();

        assert_eq!(store.get(StorageKey::RefreshToken).await.unwrap(), None);
        assert!(store.get(StorageKey::UserEmail).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn file_store_concurrent_writers_leave_valid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let first = FileStore::new(&path);
        let second = FileStore::new(&path);

        let first_entries = [
            (StorageKey::BearerToken, "T1".to_string()),
            (StorageKey::UserEmail, "a@b.com".to_string()),
        ];
        let second_entries = [
            (StorageKey::BearerToken, "T2".to_string()),
            (StorageKey::UserEmail, "c@d.com".to_string()),
        ];
        let (a, b) = tokio::join!(
            first.set_many(&first_entries),
            second.set_many(&second_entries),
        );
        a.unwrap();
        b.unwrap();

        let bearer = first.get(StorageKey::BearerToken).await.unwrap();
        assert!(matches!(bearer.as_deref(), Some("T1" | "T2")));

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("session.json")]);
    }

    #[tokio::test]
    async fn file_store_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FileStore::new(&path);
        assert!(matches!(
            store.get(StorageKey::BearerToken).await,
            Err(Error::Serialization(_))
        ));
    }
}
