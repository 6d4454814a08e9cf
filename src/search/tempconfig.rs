//! Temp config blob store
//!
//! Content-addressed, TTL-bound storage for opaque config text. The query
//! UI uses it to round-trip unsaved configuration through a short hash
//! instead of the full payload.
//!
//! The address is the first 8 bytes of the SHA-256 of the text, base64
//! encoded. Truncated-hash collisions are not detected - last write wins.
//! Every successful load refreshes the TTL, so a config that keeps being
//! viewed never expires (sliding window).

use crate::search::error::{SearchError, SearchResult};
use crate::search::keys;
use crate::store::CatalogStore;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Default lifetime: 14 days, in seconds
pub const TEMP_CONFIG_TTL_SECS: u64 = 14 * 24 * 60 * 60;

/// Content-addressed blob store for transient config text
#[derive(Clone)]
pub struct TempConfigStore {
    store: Arc<dyn CatalogStore>,
    ttl_secs: u64,
}

impl TempConfigStore {
    pub fn new(store: Arc<dyn CatalogStore>, ttl_secs: u64) -> Self {
        Self { store, ttl_secs }
    }

    /// Store `text` under its content hash for the configured TTL and
    /// return the hash
    pub async fn save(&self, text: &str) -> SearchResult<String> {
        let digest = Sha256::digest(text.as_bytes());
        let hash = BASE64.encode(&digest[..8]);
        self.store
            .set_with_ttl(&keys::temp_config(&hash), text.as_bytes(), self.ttl_secs)
            .await?;
        Ok(hash)
    }

    /// Fetch the text for `hash`, sliding its expiry forward on success
    pub async fn load(&self, hash: &str) -> SearchResult<String> {
        let key = keys::temp_config(hash);
        let bytes = self
            .store
            .get(&key)
            .await?
            .ok_or_else(|| SearchError::NotFound(format!("temp config {hash}")))?;
        let text = String::from_utf8(bytes)
            .map_err(|e| SearchError::decode(key.as_str(), format!("not utf-8: {e}")))?;
        self.store.expire(&key, self.ttl_secs).await?;
        Ok(text)
    }
}
