//! Search index error types

use crate::store::StoreError;
use thiserror::Error;

/// Errors that can occur in the search index
#[derive(Error, Debug)]
pub enum SearchError {
    /// The underlying catalog store failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A stored value could not be parsed back into its semantic type
    /// (malformed tag-set string, non-numeric timestamp, corrupt blob)
    #[error("decode failed for {key}: {message}")]
    Decode { key: String, message: String },

    /// Temp-config lookup by an unknown or expired hash
    #[error("not found: {0}")]
    NotFound(String),

    /// A cursor scan did not report completion within the page bound
    #[error("scan of {key} exceeded {pages} pages without completing")]
    ScanOverrun { key: String, pages: u32 },
}

impl SearchError {
    /// Convenience constructor for decode failures
    pub fn decode(key: impl Into<String>, message: impl Into<String>) -> Self {
        SearchError::Decode {
            key: key.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for search index operations
pub type SearchResult<T> = Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SearchError::decode("search:mts:default:os.cpu", "missing '='");
        assert_eq!(
            err.to_string(),
            "decode failed for search:mts:default:os.cpu: missing '='"
        );

        let err = SearchError::ScanOverrun {
            key: "search:mts:default:os.cpu".to_string(),
            pages: 1000,
        };
        assert!(err.to_string().contains("1000 pages"));
    }

    #[test]
    fn test_store_error_conversion() {
        let store_err = StoreError::Unavailable("pool drained".to_string());
        let err: SearchError = store_err.into();
        assert!(matches!(err, SearchError::Store(_)));
    }
}
