//! In-process catalog store
//!
//! A complete [`CatalogStore`] backed by in-memory maps. Used by the test
//! suite and by embedded deployments that do not need a networked store.
//!
//! # Design Notes
//! - One mutex around the whole state gives each command the per-command
//!   atomicity a real store guarantees; nothing is held across awaits.
//! - TTLs are checked lazily on access against a shiftable clock, so tests
//!   can simulate the passage of time with [`MemoryStore::advance_secs`].
//! - `hash_scan` pages are keyed by the last field returned, which keeps a
//!   scan restartable and duplicate-free even if the hash mutates between
//!   pages (fields sort in BTreeMap order).

use super::{CatalogStore, ScanPage, StoreError, StoreResult, TtlDialect, SCAN_CURSOR_START};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

const DEFAULT_SCAN_PAGE_SIZE: usize = 512;
const CURSOR_PREFIX: &str = "after:";

/// In-memory implementation of [`CatalogStore`]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    /// Seconds added to wall-clock time, for simulated-clock tests
    clock_offset_secs: AtomicI64,
    scan_page_size: usize,
    dialect: TtlDialect,
}

#[derive(Default)]
struct Inner {
    hashes: HashMap<String, BTreeMap<String, String>>,
    strings: HashMap<String, StringEntry>,
}

struct StringEntry {
    value: Vec<u8>,
    /// Unix seconds after which the key reads as absent; `None` = no TTL
    expires_at: Option<i64>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            clock_offset_secs: AtomicI64::new(0),
            scan_page_size: DEFAULT_SCAN_PAGE_SIZE,
            dialect: TtlDialect::default(),
        }
    }

    /// Builder: entries returned per `hash_scan` page
    pub fn with_scan_page_size(mut self, size: usize) -> Self {
        self.scan_page_size = size.max(1);
        self
    }

    /// Builder: which TTL wire form this adapter would use
    pub fn with_dialect(mut self, dialect: TtlDialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Shift the store's clock forward (or back) for TTL testing
    pub fn advance_secs(&self, secs: i64) {
        self.clock_offset_secs.fetch_add(secs, Ordering::SeqCst);
    }

    fn now(&self) -> i64 {
        Utc::now().timestamp() + self.clock_offset_secs.load(Ordering::SeqCst)
    }

    fn lock(&self) -> StoreResult<std::sync::MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|e| StoreError::Unavailable(format!("store mutex poisoned: {e}")))
    }
}

impl Inner {
    /// Drop the entry if its TTL has elapsed, then return what remains
    fn live_string(&mut self, key: &str, now: i64) -> Option<&mut StringEntry> {
        let expired = match self.strings.get(key) {
            Some(entry) => matches!(entry.expires_at, Some(at) if at <= now),
            None => return None,
        };
        if expired {
            self.strings.remove(key);
            return None;
        }
        self.strings.get_mut(key)
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn hash_set(&self, key: &str, field: &str, value: &str) -> StoreResult<()> {
        let mut inner = self.lock()?;
        inner
            .hashes
            .entry(key.to_string())
            .or_default()
            .insert(field.to_string(), value.to_string());
        Ok(())
    }

    async fn hash_set_many(&self, key: &str, entries: &[(String, String)]) -> StoreResult<()> {
        let mut inner = self.lock()?;
        let hash = inner.hashes.entry(key.to_string()).or_default();
        for (field, value) in entries {
            hash.insert(field.clone(), value.clone());
        }
        Ok(())
    }

    async fn hash_get(&self, key: &str, field: &str) -> StoreResult<Option<String>> {
        let inner = self.lock()?;
        Ok(inner
            .hashes
            .get(key)
            .and_then(|hash| hash.get(field).cloned()))
    }

    async fn hash_get_all(&self, key: &str) -> StoreResult<Vec<(String, String)>> {
        let inner = self.lock()?;
        Ok(inner
            .hashes
            .get(key)
            .map(|hash| {
                hash.iter()
                    .map(|(f, v)| (f.clone(), v.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn hash_delete(&self, key: &str, field: &str) -> StoreResult<()> {
        let mut inner = self.lock()?;
        let emptied = match inner.hashes.get_mut(key) {
            Some(hash) => {
                hash.remove(field);
                hash.is_empty()
            }
            None => false,
        };
        if emptied {
            // An empty hash and an absent key are indistinguishable in the
            // real store; mirror that here.
            inner.hashes.remove(key);
        }
        Ok(())
    }

    async fn hash_scan(&self, key: &str, cursor: &str) -> StoreResult<ScanPage> {
        let inner = self.lock()?;
        let hash = match inner.hashes.get(key) {
            Some(hash) => hash,
            None => {
                return Ok(ScanPage {
                    cursor: SCAN_CURSOR_START.to_string(),
                    entries: Vec::new(),
                })
            }
        };

        let start: Bound<String> = if cursor == SCAN_CURSOR_START || cursor.is_empty() {
            Bound::Unbounded
        } else if let Some(last) = cursor.strip_prefix(CURSOR_PREFIX) {
            Bound::Excluded(last.to_string())
        } else {
            return Err(StoreError::command(key, format!("bad scan cursor {cursor:?}")));
        };

        let mut entries: Vec<(String, String)> = hash
            .range((start, Bound::Unbounded))
            .take(self.scan_page_size + 1)
            .map(|(f, v)| (f.clone(), v.clone()))
            .collect();

        let next = if entries.len() > self.scan_page_size {
            entries.pop();
            let last = &entries[entries.len() - 1].0;
            format!("{CURSOR_PREFIX}{last}")
        } else {
            SCAN_CURSOR_START.to_string()
        };

        Ok(ScanPage {
            cursor: next,
            entries,
        })
    }

    async fn set(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        let mut inner = self.lock()?;
        inner.strings.insert(
            key.to_string(),
            StringEntry {
                value: value.to_vec(),
                expires_at: None,
            },
        );
        Ok(())
    }

    async fn set_with_ttl(&self, key: &str, value: &[u8], ttl_secs: u64) -> StoreResult<()> {
        let expires_at = Some(self.now() + ttl_secs as i64);
        let mut inner = self.lock()?;
        match self.dialect {
            TtlDialect::TtlOnWrite => {
                inner.strings.insert(
                    key.to_string(),
                    StringEntry {
                        value: value.to_vec(),
                        expires_at,
                    },
                );
            }
            TtlDialect::SeparateExpire => {
                // Two wire commands on a real adapter; same end state here.
                inner.strings.insert(
                    key.to_string(),
                    StringEntry {
                        value: value.to_vec(),
                        expires_at: None,
                    },
                );
                if let Some(entry) = inner.strings.get_mut(key) {
                    entry.expires_at = expires_at;
                }
            }
        }
        Ok(())
    }

    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let now = self.now();
        let mut inner = self.lock()?;
        Ok(inner.live_string(key, now).map(|entry| entry.value.clone()))
    }

    async fn expire(&self, key: &str, ttl_secs: u64) -> StoreResult<()> {
        let now = self.now();
        let mut inner = self.lock()?;
        if let Some(entry) = inner.live_string(key, now) {
            entry.expires_at = Some(now + ttl_secs as i64);
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        let mut inner = self.lock()?;
        inner.hashes.remove(key);
        inner.strings.remove(key);
        Ok(())
    }
}
