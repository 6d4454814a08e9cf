//! Fault-injecting store wrapper for tests
//!
//! Delegates to a [`MemoryStore`] but fails any write or delete whose key
//! contains a configured substring, and can serve scans that never report
//! completion. Lets tests exercise the best-effort maintenance paths and
//! the scan page bound.

use super::{CatalogStore, MemoryStore, ScanPage, StoreError, StoreResult};
use async_trait::async_trait;

pub struct FaultyStore {
    inner: MemoryStore,
    /// Writes/deletes touching keys containing this substring fail
    fail_key_substring: Option<String>,
    /// When set, every scan returns an in-progress cursor forever
    endless_scan: bool,
}

impl FaultyStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            fail_key_substring: None,
            endless_scan: false,
        }
    }

    pub fn fail_keys_containing(mut self, substring: &str) -> Self {
        self.fail_key_substring = Some(substring.to_string());
        self
    }

    pub fn with_endless_scan(mut self) -> Self {
        self.endless_scan = true;
        self
    }

    fn check(&self, key: &str) -> StoreResult<()> {
        if let Some(pat) = &self.fail_key_substring {
            if key.contains(pat.as_str()) {
                return Err(StoreError::command(key, "injected fault"));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogStore for FaultyStore {
    async fn hash_set(&self, key: &str, field: &str, value: &str) -> StoreResult<()> {
        self.check(key)?;
        self.inner.hash_set(key, field, value).await
    }

    async fn hash_set_many(&self, key: &str, entries: &[(String, String)]) -> StoreResult<()> {
        self.check(key)?;
        self.inner.hash_set_many(key, entries).await
    }

    async fn hash_get(&self, key: &str, field: &str) -> StoreResult<Option<String>> {
        self.inner.hash_get(key, field).await
    }

    async fn hash_get_all(&self, key: &str) -> StoreResult<Vec<(String, String)>> {
        self.inner.hash_get_all(key).await
    }

    async fn hash_delete(&self, key: &str, field: &str) -> StoreResult<()> {
        self.check(key)?;
        self.inner.hash_delete(key, field).await
    }

    async fn hash_scan(&self, key: &str, cursor: &str) -> StoreResult<ScanPage> {
        if self.endless_scan {
            return Ok(ScanPage {
                cursor: "after:forever".to_string(),
                entries: Vec::new(),
            });
        }
        self.inner.hash_scan(key, cursor).await
    }

    async fn set(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        self.check(key)?;
        self.inner.set(key, value).await
    }

    async fn set_with_ttl(&self, key: &str, value: &[u8], ttl_secs: u64) -> StoreResult<()> {
        self.check(key)?;
        self.inner.set_with_ttl(key, value, ttl_secs).await
    }

    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        self.inner.get(key).await
    }

    async fn expire(&self, key: &str, ttl_secs: u64) -> StoreResult<()> {
        self.check(key)?;
        self.inner.expire(key, ttl_secs).await
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        self.check(key)?;
        self.inner.delete(key).await
    }
}
