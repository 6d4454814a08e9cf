//! Query index reader
//!
//! Answers catalog queries over everything the ingestion writer has
//! recorded: all metrics, tag keys for a metric, tag values for a metric
//! and tag key, metrics carrying a tag pair, and full tag-sets for a
//! metric filtered by a partial tag-set.
//!
//! # Design Notes
//! - Catalog hashes map name -> last-seen Unix timestamp; small catalogs
//!   are read in one bulk `hash_get_all`.
//! - The full-tag-set catalog can grow without bound, so it is read with a
//!   cursor scan and filtered page by page. The store has no secondary
//!   index on tag-set contents; the scan trades read amplification for
//!   index simplicity.
//! - A scan that never reports completion within `scan_page_limit` pages
//!   is treated as a fault, not looped on forever.

use crate::search::error::{SearchError, SearchResult};
use crate::search::keys;
use crate::search::tagset::TagSet;
use crate::store::{CatalogStore, SCAN_CURSOR_START};
use std::collections::HashMap;
use std::sync::Arc;

/// Read side of the metadata search index
#[derive(Clone)]
pub struct IndexReader {
    store: Arc<dyn CatalogStore>,
    /// Hard bound on pages per cursor scan
    scan_page_limit: u32,
}

impl IndexReader {
    pub fn new(store: Arc<dyn CatalogStore>, scan_page_limit: u32) -> Self {
        Self {
            store,
            scan_page_limit: scan_page_limit.max(1),
        }
    }

    /// Every metric ever observed for the uid, with last-seen timestamps
    pub async fn all_metrics(&self, uid: &str) -> SearchResult<HashMap<String, i64>> {
        self.read_catalog(&keys::all_metrics(uid)).await
    }

    /// Tag keys observed for a metric
    pub async fn tag_keys_for_metric(
        &self,
        uid: &str,
        metric: &str,
    ) -> SearchResult<HashMap<String, i64>> {
        self.read_catalog(&keys::tag_keys(uid, metric)).await
    }

    /// Tag values observed for a metric and tag key
    pub async fn tag_values_for_metric(
        &self,
        uid: &str,
        metric: &str,
        tag_key: &str,
    ) -> SearchResult<HashMap<String, i64>> {
        self.read_catalog(&keys::tag_values(uid, metric, tag_key))
            .await
    }

    /// Tag values observed for a tag key across every metric, via the
    /// aggregate bucket. The host-liveness prober uses this with tag key
    /// `host` to enumerate all known hosts.
    pub async fn tag_values_by_tag_key(
        &self,
        uid: &str,
        tag_key: &str,
    ) -> SearchResult<HashMap<String, i64>> {
        self.tag_values_for_metric(uid, keys::ALL_METRICS, tag_key)
            .await
    }

    /// Metrics that have been observed with the tag pair, sorted by name
    pub async fn metrics_for_tag_pair(
        &self,
        uid: &str,
        tag_key: &str,
        tag_value: &str,
    ) -> SearchResult<Vec<String>> {
        let catalog = self
            .read_catalog(&keys::metrics_by_tag(uid, tag_key, tag_value))
            .await?;
        let mut metrics: Vec<String> = catalog.into_keys().collect();
        metrics.sort();
        Ok(metrics)
    }

    /// Full tag-sets recorded for the metric that contain every pair of
    /// `filter` (the empty filter matches everything). Pages through the
    /// tag-set hash with a cursor scan; iteration stops when the store
    /// hands the initial cursor back.
    pub async fn filtered_tag_sets(
        &self,
        uid: &str,
        metric: &str,
        filter: &TagSet,
    ) -> SearchResult<HashMap<String, i64>> {
        let key = keys::metric_tag_sets(uid, metric);
        let mut result = HashMap::new();
        let mut cursor = SCAN_CURSOR_START.to_string();

        for _ in 0..self.scan_page_limit {
            let page = self.store.hash_scan(&key, &cursor).await?;
            for (serialized, raw_ts) in &page.entries {
                let candidate = TagSet::parse(serialized)?;
                if candidate.contains(filter) {
                    result.insert(serialized.clone(), parse_timestamp(&key, raw_ts)?);
                }
            }
            if page.is_complete() {
                return Ok(result);
            }
            cursor = page.cursor;
        }

        Err(SearchError::ScanOverrun {
            key,
            pages: self.scan_page_limit,
        })
    }

    async fn read_catalog(&self, key: &str) -> SearchResult<HashMap<String, i64>> {
        let entries = self.store.hash_get_all(key).await?;
        let mut result = HashMap::with_capacity(entries.len());
        for (field, raw_ts) in entries {
            let ts = parse_timestamp(key, &raw_ts)?;
            result.insert(field, ts);
        }
        Ok(result)
    }
}

pub(crate) fn parse_timestamp(key: &str, raw: &str) -> SearchResult<i64> {
    raw.parse::<i64>()
        .map_err(|e| SearchError::decode(key, format!("bad timestamp {raw:?}: {e}")))
}
