//! Host / tag-set consistency maintainer
//!
//! Keeps two denormalized views of host metadata mutually consistent as
//! hosts' tag-sets change over time:
//!
//! - forward index: one hash per host, tag key -> current tag value
//! - reverse index: one hash per (tag key, tag value), host -> last update
//!
//! The invariant is bidirectional: a host holding `k=v` appears in the
//! `(k,v)` reverse bucket, and a reverse bucket with zero members does not
//! exist in the store at all. The maintenance sequence is a series of
//! independent store commands, not a transaction; for a changed value the
//! host is removed from the old bucket before being added to the new one,
//! which keeps the inconsistency window to that single round trip.
//! Concurrent updates to the *same* host can still interleave; enabling
//! `serialize_updates` closes that race with a per-host async mutex.
//! Updates to different hosts touch disjoint forward keys and only share
//! reverse buckets through individually atomic field operations, so they
//! need no coordination.
//!
//! Per-pair errors do not abort the remaining pairs: partial application
//! is preferred over leaving a host unindexed. Every outcome lands in the
//! returned [`MaintenanceReport`] and failures are additionally logged.

use crate::search::error::SearchResult;
use crate::search::keys;
use crate::search::reader::parse_timestamp;
use crate::search::tagset::TagSet;
use crate::store::CatalogStore;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::warn;

/// Maintains the host forward/reverse indices
pub struct HostIndex {
    store: Arc<dyn CatalogStore>,
    serialize_updates: bool,
    /// Per-host serialization points, created on first use
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

/// Outcome of one (tag key, tag value) maintenance step
#[derive(Debug, Clone)]
pub struct PairOutcome {
    pub tag_key: String,
    pub tag_value: String,
    /// `None` when the step applied cleanly
    pub error: Option<String>,
}

/// Aggregated outcomes of one maintenance sequence.
///
/// Best-effort semantics: every pair is attempted even when an earlier one
/// failed, and the forward-index batch write runs regardless.
#[derive(Debug, Clone, Default)]
pub struct MaintenanceReport {
    pub pairs: Vec<PairOutcome>,
    /// Error from the final forward-index batch write, if any
    pub forward_error: Option<String>,
}

impl MaintenanceReport {
    /// True when every step applied without error
    pub fn is_clean(&self) -> bool {
        self.forward_error.is_none() && self.pairs.iter().all(|p| p.error.is_none())
    }

    /// The pairs that failed
    pub fn failures(&self) -> impl Iterator<Item = &PairOutcome> {
        self.pairs.iter().filter(|p| p.error.is_some())
    }

    fn record(&mut self, tag_key: &str, tag_value: &str, result: SearchResult<()>) {
        self.pairs.push(PairOutcome {
            tag_key: tag_key.to_string(),
            tag_value: tag_value.to_string(),
            error: result.err().map(|e| e.to_string()),
        });
    }
}

impl HostIndex {
    pub fn new(store: Arc<dyn CatalogStore>, serialize_updates: bool) -> Self {
        Self {
            store,
            serialize_updates,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Record `tags` as the host's current tag-set.
    ///
    /// For each pair whose value changed, the host is removed from the old
    /// reverse bucket (the bucket itself is dropped at zero members) and
    /// then added to the new one. The whole tag-set is finally upserted
    /// into the forward index in one batch write. Keys absent from `tags`
    /// are left untouched in the forward index.
    pub async fn set_host_tags(
        &self,
        uid: &str,
        host: &str,
        tags: &TagSet,
    ) -> SearchResult<MaintenanceReport> {
        let _guard = self.host_guard(host).await;
        let now = Utc::now().timestamp();
        let forward_key = keys::host_tags(uid, host);
        let mut report = MaintenanceReport::default();

        for (tag_key, tag_value) in tags.iter() {
            let result = self
                .apply_pair(uid, host, &forward_key, tag_key, tag_value, now)
                .await;
            if let Err(err) = &result {
                warn!(host, tag_key, tag_value, %err, "host tag pair update failed");
            }
            report.record(tag_key, tag_value, result);
        }

        let entries: Vec<(String, String)> = tags
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        if !entries.is_empty() {
            if let Err(err) = self.store.hash_set_many(&forward_key, &entries).await {
                warn!(host, %err, "host forward index write failed");
                report.forward_error = Some(err.to_string());
            }
        }

        Ok(report)
    }

    /// Remove-before-add for one pair: unlink the host from the bucket of
    /// its previous value, then index it under the new one.
    async fn apply_pair(
        &self,
        uid: &str,
        host: &str,
        forward_key: &str,
        tag_key: &str,
        tag_value: &str,
        now: i64,
    ) -> SearchResult<()> {
        let old_value = self.store.hash_get(forward_key, tag_key).await?;
        if let Some(old_value) = old_value {
            if old_value != tag_value {
                self.remove_from_bucket(uid, host, tag_key, &old_value)
                    .await?;
            }
        }
        self.store
            .hash_set(
                &keys::hosts_by_tag(uid, tag_key, tag_value),
                host,
                &now.to_string(),
            )
            .await?;
        Ok(())
    }

    /// Undo a previous [`set_host_tags`]: drop the pairs from the forward
    /// index and unlink the host from every reverse bucket they name.
    /// Used on host decommission.
    pub async fn clear_host_tags(
        &self,
        uid: &str,
        host: &str,
        tags: &TagSet,
    ) -> SearchResult<MaintenanceReport> {
        let _guard = self.host_guard(host).await;
        let forward_key = keys::host_tags(uid, host);
        let mut report = MaintenanceReport::default();

        for (tag_key, tag_value) in tags.iter() {
            let result = self
                .clear_pair(uid, host, &forward_key, tag_key, tag_value)
                .await;
            if let Err(err) = &result {
                warn!(host, tag_key, tag_value, %err, "host tag pair removal failed");
            }
            report.record(tag_key, tag_value, result);
        }

        Ok(report)
    }

    async fn clear_pair(
        &self,
        uid: &str,
        host: &str,
        forward_key: &str,
        tag_key: &str,
        tag_value: &str,
    ) -> SearchResult<()> {
        self.store.hash_delete(forward_key, tag_key).await?;
        self.remove_from_bucket(uid, host, tag_key, tag_value).await
    }

    /// The host's current tag-set from the forward index
    pub async fn host_tags(&self, uid: &str, host: &str) -> SearchResult<TagSet> {
        let entries = self.store.hash_get_all(&keys::host_tags(uid, host)).await?;
        Ok(entries.into_iter().collect())
    }

    /// Hosts currently holding the tag pair, with last-update timestamps
    pub async fn hosts_for_tag_pair(
        &self,
        uid: &str,
        tag_key: &str,
        tag_value: &str,
    ) -> SearchResult<HashMap<String, i64>> {
        let key = keys::hosts_by_tag(uid, tag_key, tag_value);
        let entries = self.store.hash_get_all(&key).await?;
        let mut result = HashMap::with_capacity(entries.len());
        for (host, raw_ts) in entries {
            result.insert(host, parse_timestamp(&key, &raw_ts)?);
        }
        Ok(result)
    }

    async fn remove_from_bucket(
        &self,
        uid: &str,
        host: &str,
        tag_key: &str,
        tag_value: &str,
    ) -> SearchResult<()> {
        let bucket = keys::hosts_by_tag(uid, tag_key, tag_value);
        self.store.hash_delete(&bucket, host).await?;
        // Self-pruning: a bucket with no members must not exist at all.
        if self.store.hash_get_all(&bucket).await?.is_empty() {
            self.store.delete(&bucket).await?;
        }
        Ok(())
    }

    async fn host_guard(&self, host: &str) -> Option<tokio::sync::OwnedMutexGuard<()>> {
        if !self.serialize_updates {
            return None;
        }
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            locks
                .entry(host.to_string())
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
                .clone()
        };
        Some(lock.lock_owned().await)
    }
}
