//! # Atlas
//!
//! Metadata search index for a metrics monitoring platform. Atlas
//! discovers and answers queries over the universe of metric names, tag
//! keys, tag values, full tag-sets, and host-to-tag-set associations
//! observed in an incoming time-series stream.
//!
//! ## Features
//!
//! - **Catalog queries**: what metrics exist, what tag keys a metric has,
//!   what values a tag key takes, which tag-sets a metric was seen with
//! - **Host index**: bidirectionally consistent forward (host -> tag-set)
//!   and reverse (tag pair -> hosts) indices, self-pruning as hosts move
//! - **Bounded scans**: cursor-based paging over unbounded tag-set
//!   catalogs with a hard page limit
//! - **Snapshot bootstrap**: compressed backup/restore of last-observed
//!   state for crash recovery
//! - **Temp configs**: content-addressed, sliding-TTL blob storage for
//!   unsaved config round-trips
//!
//! ## Modules
//!
//! - [`store`]: the key-value store seam and an in-process implementation
//! - [`search`]: the index itself (writer, reader, host maintainer, ...)
//! - [`config`]: TOML configuration with env overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use atlas::{MemoryStore, SearchIndex, TagSet};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let index = SearchIndex::new(Arc::new(MemoryStore::new()));
//!
//!     // Ingestion records observations with caller-supplied timestamps.
//!     index.writer().record_metric("default", "os.cpu", 1700000000).await?;
//!     index.writer().record_tag_key("default", "os.cpu", "host", 1700000000).await?;
//!
//!     // A host announces its current tag-set.
//!     let tags = TagSet::new().tag("host", "web01").tag("dc", "east");
//!     index.hosts().set_host_tags("default", "web01", &tags).await?;
//!
//!     // The query side answers catalog questions.
//!     let metrics = index.reader().all_metrics("default").await?;
//!     println!("{} metrics known", metrics.len());
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod search;
pub mod store;

// Re-export top-level types for convenience
pub use store::{
    CatalogStore, MemoryStore, ScanPage, StoreError, StoreResult, TtlDialect, SCAN_CURSOR_START,
};

pub use search::{
    HostIndex, IndexAdmin, IndexReader, IndexWriter, LastInfoMap, LastInfoStore,
    MaintenanceReport, PairOutcome, PurgeReport, SearchConfig, SearchError, SearchIndex,
    SearchResult, TagSet, TempConfigStore, ALL_METRICS, TEMP_CONFIG_TTL_SECS,
};

pub use config::{
    Config, ConfigError, LoggingConfig, SearchConfig as ConfigSearchConfig, StoreConfig,
    init_logging,
};
