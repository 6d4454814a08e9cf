//! Store layer error types
//!
//! Defines the errors a catalog store adapter can surface to the index.

use thiserror::Error;

/// Errors that can occur at the key-value store boundary
#[derive(Error, Debug)]
pub enum StoreError {
    /// Could not obtain or keep a connection (pool exhausted, store down)
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The store accepted the connection but the command itself failed
    #[error("store command failed on {key}: {message}")]
    Command { key: String, message: String },
}

impl StoreError {
    /// Convenience constructor for command failures
    pub fn command(key: impl Into<String>, message: impl Into<String>) -> Self {
        StoreError::Command {
            key: key.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::Unavailable("connection refused".to_string());
        assert_eq!(err.to_string(), "store unavailable: connection refused");

        let err = StoreError::command("search:allMetrics:default", "WRONGTYPE");
        assert_eq!(
            err.to_string(),
            "store command failed on search:allMetrics:default: WRONGTYPE"
        );
    }
}
