//! Errors reported by port implementations
//!
//! Adapters convert their infrastructure errors (AWS SDK, Elasticsearch
//! transport, ...) into these variants so the domain never sees vendor types.

use thiserror::Error;

/// Failure of a backing store call
#[derive(Error, Debug)]
pub enum StoreError {
    /// The media store could not persist or publish an object
    #[error("Media store operation failed: {0}")]
    Media(String),

    /// The search index rejected or could not serve a request
    #[error("Search index operation failed: {0}")]
    Index(String),

    /// The audit store could not record a post
    #[error("Audit store operation failed: {0}")]
    Audit(String),
}

impl StoreError {
    /// Create a media store error with a message
    pub fn media(msg: impl Into<String>) -> Self {
        Self::Media(msg.into())
    }

    /// Create a search index error with a message
    pub fn index(msg: impl Into<String>) -> Self {
        Self::Index(msg.into())
    }

    /// Create an audit store error with a message
    pub fn audit(msg: impl Into<String>) -> Self {
        Self::Audit(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_error_message() {
        let err = StoreError::media("bucket missing");
        assert!(matches!(err, StoreError::Media(_)));
        assert_eq!(err.to_string(), "Media store operation failed: bucket missing");
    }

    #[test]
    fn test_index_error_message() {
        let err = StoreError::index("connection refused");
        assert!(err.to_string().contains("Search index"));
        assert!(err.to_string().contains("connection refused"));
    }
}
