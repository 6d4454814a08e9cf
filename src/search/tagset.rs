//! Canonical tag-set type
//!
//! A tag-set is a finite mapping from tag key to tag value identifying one
//! time series instance of a metric. Its canonical text form is
//! `k1=v1,k2=v2` with keys in sorted order, which makes equal tag-sets
//! compare equal as strings and lets the full-tag-set catalog key on the
//! serialized form.

use crate::search::error::{SearchError, SearchResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// An ordered set of tag key/value pairs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagSet(BTreeMap<String, String>);

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the canonical `k1=v1,k2=v2` form.
    ///
    /// Rejects empty input segments, pairs without `=`, empty keys, and
    /// duplicate keys. The empty string parses to the empty tag-set.
    pub fn parse(s: &str) -> SearchResult<Self> {
        let mut tags = BTreeMap::new();
        if s.is_empty() {
            return Ok(Self(tags));
        }
        for pair in s.split(',') {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| SearchError::decode(s, format!("tag pair {pair:?} missing '='")))?;
            if key.is_empty() {
                return Err(SearchError::decode(s, format!("tag pair {pair:?} has empty key")));
            }
            if tags.insert(key.to_string(), value.to_string()).is_some() {
                return Err(SearchError::decode(s, format!("duplicate tag key {key:?}")));
            }
        }
        Ok(Self(tags))
    }

    /// Builder method: add a pair
    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(|v| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate pairs in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// True when every pair of `other` is present in `self` with an equal
    /// value - the superset predicate used by filtered tag-set queries
    pub fn contains(&self, other: &TagSet) -> bool {
        other
            .iter()
            .all(|(k, v)| self.get(k).is_some_and(|mine| mine == v))
    }
}

impl fmt::Display for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (k, v) in self.iter() {
            if !first {
                write!(f, ",")?;
            }
            write!(f, "{k}={v}")?;
            first = false;
        }
        Ok(())
    }
}

impl FromIterator<(String, String)> for TagSet {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
