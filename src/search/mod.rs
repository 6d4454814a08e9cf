//! Metadata search index
//!
//! A denormalized secondary index over the universe of metric names, tag
//! keys, tag values, full tag-sets, and host-to-tag-set associations
//! observed in an incoming time-series stream, built on a flat hash-table
//! store with no multi-key transactions.
//!
//! # Architecture
//!
//! ```text
//! ingestion ──> IndexWriter ──┐
//!                             ├──> CatalogStore (hash get/set/scan, TTL)
//! query API ──> IndexReader ──┘
//!
//! host prober ──> HostIndex  (forward hts + reverse hosts buckets,
//!                             read-then-write consistency protocol)
//! ```
//!
//! - Write path: one catalog upsert per observation, idempotent.
//! - Read path: bulk hash reads for small catalogs, a bounded cursor scan
//!   for the unbounded full-tag-set catalog.
//! - [`HostIndex`] is the one stateful protocol: it keeps the forward
//!   index (host -> tag-set) and the reverse index (tag pair -> hosts)
//!   mutually consistent and prunes reverse buckets that drop to zero
//!   members.

mod backup;
mod error;
mod hosts;
pub mod keys;
mod purge;
mod reader;
mod tagset;
mod tempconfig;
mod writer;

pub use backup::{LastInfoMap, LastInfoStore};
pub use error::{SearchError, SearchResult};
pub use hosts::{HostIndex, MaintenanceReport, PairOutcome};
pub use keys::ALL_METRICS;
pub use purge::{IndexAdmin, PurgeReport};
pub use reader::IndexReader;
pub use tagset::TagSet;
pub use tempconfig::{TempConfigStore, TEMP_CONFIG_TTL_SECS};
pub use writer::IndexWriter;

use crate::store::CatalogStore;
use std::sync::Arc;

/// Tuning knobs for the search index
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Hard bound on pages per cursor scan of a tag-set catalog
    pub scan_page_limit: u32,
    /// TTL for temp config blobs, in seconds
    pub temp_config_ttl_secs: u64,
    /// Serialize maintenance sequences per host to close the same-host
    /// update race
    pub serialize_host_updates: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            scan_page_limit: 1000,
            temp_config_ttl_secs: TEMP_CONFIG_TTL_SECS,
            serialize_host_updates: true,
        }
    }
}

/// Facade wiring every index component to one shared store handle
pub struct SearchIndex {
    writer: IndexWriter,
    reader: IndexReader,
    hosts: HostIndex,
    last_infos: LastInfoStore,
    temp_configs: TempConfigStore,
    admin: IndexAdmin,
}

impl SearchIndex {
    /// Create a search index over `store` with default tuning
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self::with_config(store, SearchConfig::default())
    }

    /// Create with custom tuning
    pub fn with_config(store: Arc<dyn CatalogStore>, config: SearchConfig) -> Self {
        Self {
            writer: IndexWriter::new(store.clone()),
            reader: IndexReader::new(store.clone(), config.scan_page_limit),
            hosts: HostIndex::new(store.clone(), config.serialize_host_updates),
            last_infos: LastInfoStore::new(store.clone()),
            temp_configs: TempConfigStore::new(store.clone(), config.temp_config_ttl_secs),
            admin: IndexAdmin::new(store),
        }
    }

    /// Ingestion write side
    pub fn writer(&self) -> &IndexWriter {
        &self.writer
    }

    /// Catalog query side
    pub fn reader(&self) -> &IndexReader {
        &self.reader
    }

    /// Host forward/reverse index maintenance and queries
    pub fn hosts(&self) -> &HostIndex {
        &self.hosts
    }

    /// Last-observed snapshot backup/restore
    pub fn last_infos(&self) -> &LastInfoStore {
        &self.last_infos
    }

    /// Content-addressed temp config storage
    pub fn temp_configs(&self) -> &TempConfigStore {
        &self.temp_configs
    }

    /// Administrative operations (purge)
    pub fn admin(&self) -> &IndexAdmin {
        &self.admin
    }
}
