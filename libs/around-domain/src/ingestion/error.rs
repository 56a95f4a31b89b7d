//! Domain errors for ingestion operations
//!
//! This module defines all possible errors that can occur during ingestion.
//! These are domain-level errors that abstract away infrastructure details.

use thiserror::Error;

use crate::deadline::DeadlineExceeded;
use crate::ports::StoreError;

/// Errors that can occur during post ingestion
///
/// Every variant aborts the request. Variants raised before the upload
/// guarantee that nothing was written; an `Index` failure may leave an
/// orphaned media object behind.
#[derive(Error, Debug)]
pub enum IngestionError {
    /// The request carried no media attachment
    #[error("A media attachment is required")]
    MissingMedia,

    /// The media attachment has no content
    #[error("Cannot ingest an empty media attachment")]
    EmptyMedia,

    /// The media attachment is too large to be ingested
    #[error("Media size ({size} bytes) exceeds maximum allowed ({max} bytes)")]
    MediaTooLarge { size: usize, max: usize },

    /// Failed to upload the attachment to the media store
    #[error("Media upload failed: {0}")]
    Upload(#[source] StoreError),

    /// Failed to write the post to the search index
    #[error("Indexing failed: {0}")]
    Index(#[source] StoreError),

    /// A backing store did not answer in time
    #[error(transparent)]
    Deadline(#[from] DeadlineExceeded),
}

impl IngestionError {
    /// Create a media too large error
    pub fn media_too_large(size: usize, max: usize) -> Self {
        Self::MediaTooLarge { size, max }
    }
}

/// Result type alias for ingestion operations
pub type Result<T> = std::result::Result<T, IngestionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_error() {
        let err = IngestionError::Upload(StoreError::media("S3 connection failed"));
        assert!(matches!(err, IngestionError::Upload(_)));
        assert_eq!(
            err.to_string(),
            "Media upload failed: Media store operation failed: S3 connection failed"
        );
    }

    #[test]
    fn test_media_too_large_error() {
        let err = IngestionError::media_too_large(1024, 512);
        assert!(matches!(err, IngestionError::MediaTooLarge { .. }));
        assert!(err.to_string().contains("1024"));
        assert!(err.to_string().contains("512"));
    }

    #[test]
    fn test_missing_media_error() {
        let err = IngestionError::MissingMedia;
        assert_eq!(err.to_string(), "A media attachment is required");
    }
}
