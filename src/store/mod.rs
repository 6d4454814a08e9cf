//! Catalog store seam
//!
//! The search index is a denormalized secondary index built over a flat
//! hash-table store. This module defines the small set of primitives the
//! index requires from that store, abstracted from any one store's wire
//! protocol:
//!
//! - hash field operations (`hash_set`, `hash_get_all`, `hash_delete`, ...)
//! - cursor-based hash scanning for hashes too large for one bulk read
//! - plain key operations with optional TTL (`set_with_ttl`, `expire`)
//!
//! Adapters own their connection pooling; a checked-out connection is an
//! implementation detail behind each async method. Components receive the
//! store as an `Arc<dyn CatalogStore>` at construction - there is no
//! process-global store handle.

mod error;
#[cfg(test)]
pub(crate) mod fault;
mod memory;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;

use async_trait::async_trait;

/// Initial cursor for a hash scan. A scan is complete when the store hands
/// this value back as the next cursor.
pub const SCAN_CURSOR_START: &str = "0";

/// One page of a cursor-based hash scan
#[derive(Debug, Clone)]
pub struct ScanPage {
    /// Opaque continuation token; equals [`SCAN_CURSOR_START`] when the
    /// scan has covered the whole hash
    pub cursor: String,
    /// Field/value pairs in this page
    pub entries: Vec<(String, String)>,
}

impl ScanPage {
    /// True when this page is the last one of the scan
    pub fn is_complete(&self) -> bool {
        self.cursor == SCAN_CURSOR_START || self.cursor.is_empty()
    }
}

/// How an adapter expresses "set this key with a TTL" on the wire.
///
/// One supported store dialect takes the TTL as an option on the write
/// command itself (`SET key value EX ttl`); the other needs a dedicated
/// command (`SETEX key ttl value`). The choice is made once when the
/// adapter is constructed; the index only ever calls
/// [`CatalogStore::set_with_ttl`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TtlDialect {
    /// TTL rides along on the write command
    TtlOnWrite,
    /// TTL requires a separate expiry command
    SeparateExpire,
}

impl Default for TtlDialect {
    fn default() -> Self {
        TtlDialect::TtlOnWrite
    }
}

/// Primitives the search index requires from its key-value backend.
///
/// Each method maps to a single store command and is individually atomic;
/// multi-key sequences built on top of these are explicitly best-effort.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Set one field of a hash
    async fn hash_set(&self, key: &str, field: &str, value: &str) -> StoreResult<()>;

    /// Set several fields of a hash in one batch write
    async fn hash_set_many(&self, key: &str, entries: &[(String, String)]) -> StoreResult<()>;

    /// Read one field of a hash, `None` if the field or hash is absent
    async fn hash_get(&self, key: &str, field: &str) -> StoreResult<Option<String>>;

    /// Read every field of a hash; an absent hash reads as empty
    async fn hash_get_all(&self, key: &str) -> StoreResult<Vec<(String, String)>>;

    /// Remove one field from a hash; removing a missing field is a no-op
    async fn hash_delete(&self, key: &str, field: &str) -> StoreResult<()>;

    /// Read one page of a hash, continuing from `cursor`
    /// ([`SCAN_CURSOR_START`] to begin)
    async fn hash_scan(&self, key: &str, cursor: &str) -> StoreResult<ScanPage>;

    /// Set a plain key
    async fn set(&self, key: &str, value: &[u8]) -> StoreResult<()>;

    /// Set a plain key with a TTL in seconds, using whichever wire form the
    /// adapter's [`TtlDialect`] calls for
    async fn set_with_ttl(&self, key: &str, value: &[u8], ttl_secs: u64) -> StoreResult<()>;

    /// Read a plain key, `None` if absent or expired
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Reset a key's TTL; a missing key is a no-op
    async fn expire(&self, key: &str, ttl_secs: u64) -> StoreResult<()>;

    /// Remove a key (plain or hash) entirely
    async fn delete(&self, key: &str) -> StoreResult<()>;
}
