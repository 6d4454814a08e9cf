//! Key space
//!
//! Pure functions mapping (entity kind, identifying fields, uid) to store
//! key strings. Every catalog the index maintains lives under a distinct
//! prefix, so no two entity kinds can collapse to the same key, and the
//! formatting is deterministic across restarts.
//!
//! Layout in the store:
//!
//! ```text
//! search:allMetrics:{uid}          metric name -> last-seen timestamp
//! search:metrics:{uid}:{k}={v}     metric name -> timestamp, per tag pair
//! search:tagk:{uid}:{metric}       tag key -> timestamp
//! search:tagv:{uid}:{metric}:{k}   tag value -> timestamp
//! search:mts:{uid}:{metric}        serialized tag-set -> timestamp
//! search:hts:{uid}:{host}          tag key -> tag value (forward index)
//! search:hosts:{uid}:{k}={v}       host -> timestamp (reverse index)
//! search:last                      compressed last-info snapshot blob
//! tempConfig:{hash}                opaque config text, TTL-bound
//! ```

/// Reserved metric sentinel: the aggregate tag-value bucket that collects
/// every value seen for a tag key across all metrics
pub const ALL_METRICS: &str = "__all__";

pub fn all_metrics(uid: &str) -> String {
    format!("search:allMetrics:{uid}")
}

pub fn metrics_by_tag(uid: &str, tag_key: &str, tag_value: &str) -> String {
    format!("search:metrics:{uid}:{tag_key}={tag_value}")
}

pub fn tag_keys(uid: &str, metric: &str) -> String {
    format!("search:tagk:{uid}:{metric}")
}

pub fn tag_values(uid: &str, metric: &str, tag_key: &str) -> String {
    format!("search:tagv:{uid}:{metric}:{tag_key}")
}

pub fn metric_tag_sets(uid: &str, metric: &str) -> String {
    format!("search:mts:{uid}:{metric}")
}

pub fn host_tags(uid: &str, host: &str) -> String {
    format!("search:hts:{uid}:{host}")
}

pub fn hosts_by_tag(uid: &str, tag_key: &str, tag_value: &str) -> String {
    format!("search:hosts:{uid}:{tag_key}={tag_value}")
}

pub fn last_info() -> String {
    "search:last".to_string()
}

pub fn temp_config(hash: &str) -> String {
    format!("tempConfig:{hash}")
}
