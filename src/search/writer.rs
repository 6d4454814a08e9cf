//! Ingestion index writer
//!
//! Records observations from the incoming time-series stream: metric seen,
//! tag key seen for a metric, tag value seen for a metric and tag key, full
//! tag-set seen for a metric.
//!
//! Each operation is one upsert against a catalog hash - field is the
//! observed name, value is the caller-supplied Unix timestamp - so every
//! call is idempotent and independently retryable. Timestamps are supplied
//! by the caller rather than read from the wall clock, which lets batched
//! or backfilled ingestion assign historical times. Retry policy belongs to
//! the caller; the first store error propagates unchanged.

use crate::search::error::SearchResult;
use crate::search::keys;
use crate::store::CatalogStore;
use std::sync::Arc;

/// Write side of the metadata search index
#[derive(Clone)]
pub struct IndexWriter {
    store: Arc<dyn CatalogStore>,
}

impl IndexWriter {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Upsert the metric into the per-uid metric catalog
    pub async fn record_metric(&self, uid: &str, metric: &str, ts: i64) -> SearchResult<()> {
        self.store
            .hash_set(&keys::all_metrics(uid), metric, &ts.to_string())
            .await?;
        Ok(())
    }

    /// Upsert a tag key into the metric's tag-key catalog
    pub async fn record_tag_key(
        &self,
        uid: &str,
        metric: &str,
        tag_key: &str,
        ts: i64,
    ) -> SearchResult<()> {
        self.store
            .hash_set(&keys::tag_keys(uid, metric), tag_key, &ts.to_string())
            .await?;
        Ok(())
    }

    /// Upsert a tag value into the (metric, tag key) tag-value catalog.
    ///
    /// Pass [`keys::ALL_METRICS`] as the metric to feed the aggregate
    /// bucket that collects values for the tag key across every metric.
    pub async fn record_tag_value(
        &self,
        uid: &str,
        metric: &str,
        tag_key: &str,
        tag_value: &str,
        ts: i64,
    ) -> SearchResult<()> {
        self.store
            .hash_set(
                &keys::tag_values(uid, metric, tag_key),
                tag_value,
                &ts.to_string(),
            )
            .await?;
        Ok(())
    }

    /// Upsert a serialized full tag-set into the metric's tag-set catalog
    pub async fn record_tag_set(
        &self,
        uid: &str,
        metric: &str,
        tag_set: &str,
        ts: i64,
    ) -> SearchResult<()> {
        self.store
            .hash_set(&keys::metric_tag_sets(uid, metric), tag_set, &ts.to_string())
            .await?;
        Ok(())
    }

    /// Upsert the metric into the per-tag-pair metric catalog, the inverse
    /// lookup behind metrics-for-tag-pair queries
    pub async fn record_metric_for_tag(
        &self,
        uid: &str,
        tag_key: &str,
        tag_value: &str,
        metric: &str,
        ts: i64,
    ) -> SearchResult<()> {
        self.store
            .hash_set(
                &keys::metrics_by_tag(uid, tag_key, tag_value),
                metric,
                &ts.to_string(),
            )
            .await?;
        Ok(())
    }
}
