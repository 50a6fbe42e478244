use super::store::KeyValueStore;
use crate::common::StoreError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

/// Store key of the serialized theme descriptor.
pub const THEME_DATA_KEY: &str = "jsonThemeData";
/// Store key of the time the descriptor was fetched, in Unix milliseconds.
pub const THEME_FETCHED_AT_KEY: &str = "jsonThemeDataLastFetch";
/// Store key of the custom-color payload.
pub const CUSTOM_COLORS_KEY: &str = "customColors";

/// How long a fetched descriptor stays usable: 30 minutes.
pub const DEFAULT_TTL: Duration = Duration::from_millis(1_800_000);

/// A cached value and the time it was stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub key: String,
    pub value: String,
    /// Unix milliseconds.
    pub stored_at: i64,
}

impl CacheEntry {
    pub fn is_fresh(&self, now: i64, ttl: Duration) -> bool {
        is_fresh(self.stored_at, now, ttl)
    }

    /// Deserializes the value.
    ///
    /// A value that does not deserialize is a corrupt cache; it is logged and
    /// reported as a miss.
    pub fn parse<T: DeserializeOwned>(&self) -> Option<T> {
        match serde_json::from_str(&self.value) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("Cached '{}' is corrupt, treating as miss: {e}", self.key);
                None
            }
        }
    }
}

/// `true` while `now - stored_at` does not exceed `ttl`.
pub fn is_fresh(stored_at: i64, now: i64, ttl: Duration) -> bool {
    let ttl = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
    now.saturating_sub(stored_at) <= ttl
}

/// Timestamped cache on top of a [`KeyValueStore`].
///
/// Every entry is kept as two store keys: the value under its own key and
/// the store time under a companion key. Reads never fail: a missing,
/// unreadable or unparsable entry is simply a miss. The gateway knows
/// nothing about what the values contain.
#[derive(Clone)]
pub struct CacheGateway {
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for CacheGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheGateway").finish_non_exhaustive()
    }
}

impl CacheGateway {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    fn timestamp_key(key: &str) -> String {
        if key == THEME_DATA_KEY {
            THEME_FETCHED_AT_KEY.to_string()
        } else {
            format!("{key}LastFetch")
        }
    }

    async fn get_quietly(&self, key: &str) -> Option<String> {
        match self.store.get(key).await {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Cache store read failed, treating as miss: {e}");
                None
            }
        }
    }

    /// Reads the entry stored under `key`.
    pub async fn read(&self, key: &str) -> Option<CacheEntry> {
        let stored_at = self.get_quietly(&Self::timestamp_key(key)).await?;
        let Ok(stored_at) = stored_at.trim().parse::<i64>() else {
            log::warn!("Cache timestamp for '{key}' is not a number, treating as miss");
            return None;
        };
        let value = self.get_quietly(key).await?;

        Some(CacheEntry {
            key: key.to_string(),
            value,
            stored_at,
        })
    }

    /// Overwrites the entry under `key` with `value` stored at `timestamp`.
    ///
    /// The timestamp goes last, so a failed value write never makes the
    /// previous value look fresh.
    pub async fn write(&self, key: &str, value: &str, timestamp: i64) -> Result<(), StoreError> {
        self.store.set(key, value).await?;
        self.store
            .set(&Self::timestamp_key(key), &timestamp.to_string())
            .await
    }

    /// Reads an untimestamped JSON payload. Missing or corrupt payloads are
    /// `None`.
    pub async fn read_payload<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.get_quietly(key).await?;
        match serde_json::from_str(&value) {
            Ok(payload) => Some(payload),
            Err(e) => {
                log::warn!("Stored '{key}' is corrupt, ignoring it: {e}");
                None
            }
        }
    }

    /// Stores `payload` as JSON under `key`, without a timestamp.
    pub async fn write_payload<T: Serialize>(&self, key: &str, payload: &T) -> Result<(), StoreError> {
        let value = serde_json::to_string(payload).map_err(|e| StoreError::Io {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        self.store.set(key, &value).await
    }

    /// Deletes an untimestamped payload.
    pub async fn remove_payload(&self, key: &str) -> Result<(), StoreError> {
        self.store.remove(key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryStore;
    use async_trait::async_trait;
    use claims::{assert_err, assert_none, assert_ok, assert_some};
    use serde_json::Value;

    /// Refuses writes to one key.
    struct ReadOnlyKey {
        inner: MemoryStore,
        key: &'static str,
    }

    #[async_trait]
    impl KeyValueStore for ReadOnlyKey {
        async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
            if key == self.key {
                return Err(StoreError::Unavailable(format!("'{key}' is read-only")));
            }
            self.inner.set(key, value).await
        }

        async fn remove(&self, key: &str) -> Result<(), StoreError> {
            self.inner.remove(key).await
        }
    }

    fn gateway() -> (CacheGateway, MemoryStore) {
        let store = MemoryStore::new();
        (CacheGateway::new(Arc::new(store.clone())), store)
    }

    #[test]
    fn test_freshness_boundary() {
        let ttl = Duration::from_millis(1_800_000);
        assert!(is_fresh(1_000, 1_000, ttl));
        assert!(is_fresh(1_000, 1_000 + 1_800_000, ttl));
        assert!(!is_fresh(1_000, 1_000 + 1_800_001, ttl));
        assert!(is_fresh(1_000, 0, ttl));
        assert_eq!(DEFAULT_TTL, ttl);
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let (gateway, store) = gateway();
        assert_ok!(gateway.write(THEME_DATA_KEY, r#"{"a":1}"#, 42).await);

        assert_eq!(
            store.get(THEME_FETCHED_AT_KEY).await,
            Ok(Some("42".to_string()))
        );
        let entry = assert_some!(gateway.read(THEME_DATA_KEY).await);
        assert_eq!(entry.value, r#"{"a":1}"#);
        assert_eq!(entry.stored_at, 42);
        assert!(entry.is_fresh(42 + 1_000, DEFAULT_TTL));

        let json: Value = assert_some!(entry.parse());
        assert_eq!(json["a"], 1);
    }

    #[tokio::test]
    async fn test_missing_halves_are_misses() {
        let (gateway, store) = gateway();
        assert_none!(gateway.read(THEME_DATA_KEY).await);

        assert_ok!(store.set(THEME_DATA_KEY, "{}").await);
        assert_none!(gateway.read(THEME_DATA_KEY).await);

        store.clear().await;
        assert_ok!(store.set(THEME_FETCHED_AT_KEY, "42").await);
        assert_none!(gateway.read(THEME_DATA_KEY).await);
    }

    #[tokio::test]
    async fn test_corrupt_entries_are_misses() {
        let (gateway, store) = gateway();
        assert_ok!(store.set(THEME_FETCHED_AT_KEY, "yesterday").await);
        assert_ok!(store.set(THEME_DATA_KEY, "{}").await);
        assert_none!(gateway.read(THEME_DATA_KEY).await);

        assert_ok!(gateway.write(THEME_DATA_KEY, "{not json", 42).await);
        let entry = assert_some!(gateway.read(THEME_DATA_KEY).await);
        assert_none!(entry.parse::<Value>());
    }

    #[tokio::test]
    async fn test_payloads() {
        let (gateway, store) = gateway();
        assert_none!(gateway.read_payload::<Vec<u8>>(CUSTOM_COLORS_KEY).await);

        assert_ok!(gateway.write_payload(CUSTOM_COLORS_KEY, &vec![1u8, 2]).await);
        assert_eq!(
            gateway.read_payload::<Vec<u8>>(CUSTOM_COLORS_KEY).await,
            Some(vec![1, 2])
        );
        assert_none!(gateway.read(CUSTOM_COLORS_KEY).await);

        assert_ok!(store.set(CUSTOM_COLORS_KEY, "[1,").await);
        assert_none!(gateway.read_payload::<Vec<u8>>(CUSTOM_COLORS_KEY).await);

        assert_ok!(gateway.remove_payload(CUSTOM_COLORS_KEY).await);
        assert_none!(store.get(CUSTOM_COLORS_KEY).await.unwrap());
    }

    #[tokio::test]
    async fn test_failed_value_write_keeps_old_timestamp() {
        let store = MemoryStore::new();
        let gateway = CacheGateway::new(Arc::new(store.clone()));
        assert_ok!(gateway.write(THEME_DATA_KEY, "old", 1).await);

        let failing = CacheGateway::new(Arc::new(ReadOnlyKey {
            inner: store.clone(),
            key: THEME_DATA_KEY,
        }));
        assert_err!(failing.write(THEME_DATA_KEY, "new", 5_000_000).await);

        let entry = assert_some!(gateway.read(THEME_DATA_KEY).await);
        assert_eq!(entry.value, "old");
        assert_eq!(entry.stored_at, 1);
        assert!(!entry.is_fresh(5_000_000, DEFAULT_TTL));
    }

    #[tokio::test]
    async fn test_other_keys_get_their_own_timestamp() {
        let (gateway, store) = gateway();
        assert_ok!(gateway.write("palette", "[]", 7).await);
        assert_eq!(store.get("paletteLastFetch").await, Ok(Some("7".to_string())));
    }
}
