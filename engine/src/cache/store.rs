use crate::common::StoreError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Persistent string key/value storage backing the theme cache.
///
/// The engine stores three entries through this trait: the serialized
/// descriptor, the time it was fetched and the custom-color payload.
/// Implementations only need to be durable enough for their use: the
/// in-memory store suits tests and one-shot tools, the file store keeps the
/// cache across runs.
///
/// # Examples
///
/// ```no_run
/// use engine::cache::{KeyValueStore, MemoryStore};
///
/// # async fn example() -> Result<(), engine::StoreError> {
/// let store = MemoryStore::new();
/// store.set("greeting", "hello").await?;
/// assert_eq!(store.get("greeting").await?, Some("hello".to_string()));
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, `None` when there is none.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Deletes `key`. Deleting a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Process-local store. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

/// Store keeping one file per key inside a directory.
///
/// The directory is created on first write.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `<user cache dir>/wakfu-theme`, when the platform has a cache dir.
    pub fn default_dir() -> Option<PathBuf> {
        dirs::cache_dir().map(|dir| dir.join("wakfu-theme"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(StoreError::Io {
                key: key.to_string(),
                reason: "key is not a valid file name".to_string(),
            });
        }
        Ok(self.dir.join(format!("{key}.entry")))
    }
}

fn io_error(key: &str, error: std::io::Error) -> StoreError {
    StoreError::Io {
        key: key.to_string(),
        reason: error.to_string(),
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.entry_path(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(key, e)),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.entry_path(key)?;
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            StoreError::Unavailable(format!(
                "cannot create store directory '{}': {e}",
                self.dir.display()
            ))
        })?;

        // Write aside and rename so readers never see a half-written entry.
        let staging = path.with_extension("entry.tmp");
        tokio::fs::write(&staging, value)
            .await
            .map_err(|e| io_error(key, e))?;
        tokio::fs::rename(&staging, &path)
            .await
            .map_err(|e| io_error(key, e))
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.entry_path(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(key, e)),
        }
    }
}
