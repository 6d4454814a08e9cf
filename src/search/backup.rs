//! Last-info snapshot backup/restore
//!
//! The surrounding system keeps an in-memory "last observed" map (host ->
//! keyed payloads) that would otherwise need a cold index scan to rebuild
//! after a crash. This module serializes that map to a single compressed
//! blob under a fixed store key at shutdown/checkpoint time and restores
//! it once at process start.
//!
//! The payload type stays external: anything `Serialize`/`Deserialize`
//! round-trips through the blob untouched. Restore distinguishes "no
//! snapshot exists" (`Ok(None)`) from "snapshot exists but is corrupt or
//! schema-incompatible" (`Err(Decode)`) so the caller can log the two
//! cases differently and carry on with empty state either way.

use crate::search::error::{SearchError, SearchResult};
use crate::search::keys;
use crate::store::CatalogStore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// A two-level map of uid-scoped per-host payloads
pub type LastInfoMap<T> = HashMap<String, HashMap<String, T>>;

/// Snapshot store for the last-observed map
#[derive(Clone)]
pub struct LastInfoStore {
    store: Arc<dyn CatalogStore>,
}

impl LastInfoStore {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Serialize, compress, and write the map under the snapshot key
    pub async fn backup<T: Serialize>(&self, infos: &LastInfoMap<T>) -> SearchResult<()> {
        let key = keys::last_info();
        let serialized = serde_json::to_vec(infos)
            .map_err(|e| SearchError::decode(key.as_str(), format!("serialize failed: {e}")))?;
        let compressed = lz4_flex::compress_prepend_size(&serialized);
        self.store.set(&key, &compressed).await?;
        Ok(())
    }

    /// Read the snapshot back; `None` when no snapshot has been written
    pub async fn restore<T: DeserializeOwned>(&self) -> SearchResult<Option<LastInfoMap<T>>> {
        let key = keys::last_info();
        let compressed = match self.store.get(&key).await? {
            Some(bytes) => bytes,
            None => return Ok(None),
        };
        let serialized = lz4_flex::decompress_size_prepended(&compressed)
            .map_err(|e| SearchError::decode(key.as_str(), format!("decompress failed: {e}")))?;
        let infos = serde_json::from_slice(&serialized)
            .map_err(|e| SearchError::decode(key.as_str(), format!("deserialize failed: {e}")))?;
        Ok(Some(infos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct LastInfo {
        last_val: f64,
        timestamp: i64,
        unknown: bool,
    }

    fn sample() -> LastInfoMap<LastInfo> {
        let mut per_host = HashMap::new();
        per_host.insert(
            "web01".to_string(),
            LastInfo {
                last_val: 0.93,
                timestamp: 1700000000,
                unknown: false,
            },
        );
        per_host.insert(
            "web02".to_string(),
            LastInfo {
                last_val: -4.0,
                timestamp: 1700000060,
                unknown: true,
            },
        );
        let mut map = HashMap::new();
        map.insert("default".to_string(), per_host);
        map
    }

    #[tokio::test]
    async fn test_backup_restore_round_trip() {
        let store: Arc<dyn CatalogStore> = Arc::new(MemoryStore::new());
        let snapshots = LastInfoStore::new(store);

        let infos = sample();
        snapshots.backup(&infos).await.unwrap();

        let restored: LastInfoMap<LastInfo> = snapshots.restore().await.unwrap().unwrap();
        assert_eq!(restored, infos);
    }

    #[tokio::test]
    async fn test_restore_without_snapshot_is_none() {
        let store: Arc<dyn CatalogStore> = Arc::new(MemoryStore::new());
        let snapshots = LastInfoStore::new(store);

        let restored: Option<LastInfoMap<LastInfo>> = snapshots.restore().await.unwrap();
        assert!(restored.is_none());
    }

    #[tokio::test]
    async fn test_restore_corrupt_blob_is_decode_error() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(&keys::last_info(), b"definitely not lz4")
            .await
            .unwrap();

        let snapshots = LastInfoStore::new(store);
        let err = snapshots.restore::<LastInfo>().await.unwrap_err();
        assert!(matches!(err, SearchError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_backup_overwrites_previous_snapshot() {
        let store: Arc<dyn CatalogStore> = Arc::new(MemoryStore::new());
        let snapshots = LastInfoStore::new(store);

        snapshots.backup(&sample()).await.unwrap();
        let empty: LastInfoMap<LastInfo> = HashMap::new();
        snapshots.backup(&empty).await.unwrap();

        let restored: LastInfoMap<LastInfo> = snapshots.restore().await.unwrap().unwrap();
        assert!(restored.is_empty());
    }
}
