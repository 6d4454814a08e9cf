//! Administrative purge
//!
//! Removes every catalog entry for a retired metric: its field in the
//! per-uid metric catalog, its full-tag-set hash, its tag-key hash, and
//! every per-tag-key tag-value hash derived from the tag keys on record.
//! Dry-run mode computes and logs the same plan without executing it, so
//! the blast radius can be audited before a destructive purge.
//!
//! The host forward/reverse indices and the metrics-by-tag-pair catalog
//! are keyed by host and tag pair rather than by metric and follow a
//! separate lifecycle; purge does not touch them.

use crate::search::error::SearchResult;
use crate::search::keys;
use crate::store::CatalogStore;
use std::sync::Arc;
use tracing::info;

/// Administrative operations on the search index
#[derive(Clone)]
pub struct IndexAdmin {
    store: Arc<dyn CatalogStore>,
}

/// What a purge removed, or would remove in dry-run mode
#[derive(Debug, Clone)]
pub struct PurgeReport {
    pub metric: String,
    pub dry_run: bool,
    /// Hash keys deleted outright
    pub hashes: Vec<String>,
    /// The metric catalog the metric's field was removed from
    pub catalog: String,
}

impl IndexAdmin {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Remove (or plan the removal of) every index entry for `metric`.
    ///
    /// Real runs propagate the first store error; a partially applied
    /// purge is safe to retry since every step is idempotent.
    pub async fn purge_metric(
        &self,
        uid: &str,
        metric: &str,
        dry_run: bool,
    ) -> SearchResult<PurgeReport> {
        let tag_keys_hash = keys::tag_keys(uid, metric);
        let tag_keys = self.store.hash_get_all(&tag_keys_hash).await?;

        let mut hashes = vec![keys::metric_tag_sets(uid, metric), tag_keys_hash];
        for (tag_key, _) in &tag_keys {
            hashes.push(keys::tag_values(uid, metric, tag_key));
        }
        let catalog = keys::all_metrics(uid);

        info!(
            metric,
            dry_run,
            catalog = catalog.as_str(),
            "purge: remove metric catalog entry"
        );
        if !dry_run {
            self.store.hash_delete(&catalog, metric).await?;
        }

        for hash in &hashes {
            info!(metric, dry_run, key = hash.as_str(), "purge: delete hash");
            if !dry_run {
                self.store.delete(hash).await?;
            }
        }

        Ok(PurgeReport {
            metric: metric.to_string(),
            dry_run,
            hashes,
            catalog,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::reader::IndexReader;
    use crate::search::writer::IndexWriter;
    use crate::search::TagSet;

    struct Fixture {
        admin: IndexAdmin,
        reader: IndexReader,
    }

    async fn populate() -> Fixture {
        let store: Arc<dyn CatalogStore> = Arc::new(crate::store::MemoryStore::new());
        let writer = IndexWriter::new(store.clone());

        for metric in ["os.cpu", "os.mem"] {
            writer.record_metric("u", metric, 100).await.unwrap();
            writer.record_tag_key("u", metric, "host", 100).await.unwrap();
            writer.record_tag_key("u", metric, "dc", 100).await.unwrap();
            writer
                .record_tag_value("u", metric, "host", "web01", 100)
                .await
                .unwrap();
            writer
                .record_tag_value("u", metric, "dc", "east", 100)
                .await
                .unwrap();
            let ts = TagSet::new().tag("host", "web01").tag("dc", "east");
            writer
                .record_tag_set("u", metric, &ts.to_string(), 100)
                .await
                .unwrap();
        }

        Fixture {
            admin: IndexAdmin::new(store.clone()),
            reader: IndexReader::new(store, 1000),
        }
    }

    #[tokio::test]
    async fn test_dry_run_deletes_nothing() {
        let f = populate().await;

        let report = f.admin.purge_metric("u", "os.cpu", true).await.unwrap();
        assert!(report.dry_run);
        // mts + tagk + one tagv hash per tag key.
        assert_eq!(report.hashes.len(), 4);

        assert!(f.reader.all_metrics("u").await.unwrap().contains_key("os.cpu"));
        assert_eq!(
            f.reader.tag_keys_for_metric("u", "os.cpu").await.unwrap().len(),
            2
        );
        assert_eq!(
            f.reader
                .tag_values_for_metric("u", "os.cpu", "host")
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_purge_removes_all_catalogs_for_the_metric() {
        let f = populate().await;

        let report = f.admin.purge_metric("u", "os.cpu", false).await.unwrap();
        assert!(!report.dry_run);

        let metrics = f.reader.all_metrics("u").await.unwrap();
        assert!(!metrics.contains_key("os.cpu"));

        assert!(f
            .reader
            .tag_keys_for_metric("u", "os.cpu")
            .await
            .unwrap()
            .is_empty());
        assert!(f
            .reader
            .tag_values_for_metric("u", "os.cpu", "host")
            .await
            .unwrap()
            .is_empty());
        assert!(f
            .reader
            .filtered_tag_sets("u", "os.cpu", &TagSet::new())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_purge_spares_other_metrics() {
        let f = populate().await;
        f.admin.purge_metric("u", "os.cpu", false).await.unwrap();

        assert!(f.reader.all_metrics("u").await.unwrap().contains_key("os.mem"));
        assert_eq!(
            f.reader.tag_keys_for_metric("u", "os.mem").await.unwrap().len(),
            2
        );
        assert_eq!(
            f.reader
                .filtered_tag_sets("u", "os.mem", &TagSet::new())
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_purge_unknown_metric_is_harmless() {
        let f = populate().await;
        let report = f.admin.purge_metric("u", "nope", false).await.unwrap();
        // No tag keys on record, so only the fixed two hashes.
        assert_eq!(report.hashes.len(), 2);
        assert_eq!(f.reader.all_metrics("u").await.unwrap().len(), 2);
    }
}
