//! Domain errors for search operations

use thiserror::Error;

use crate::deadline::DeadlineExceeded;
use crate::ports::StoreError;

/// A hit whose source could not be decoded into a Post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitDecodeFailure {
    /// Document id of the offending hit
    pub id: String,
    pub reason: String,
}

/// Errors that can occur while searching for nearby posts
///
/// Every variant is a hard fault: no partial result set is ever returned.
#[derive(Error, Debug)]
pub enum SearchError {
    /// The query parameters cannot be turned into a valid geo query
    #[error("Malformed query: {0}")]
    MalformedQuery(String),

    /// The search index failed to answer
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The search index did not answer in time
    #[error(transparent)]
    Deadline(#[from] DeadlineExceeded),

    /// One or more hits did not match the Post shape
    #[error("{} of {total} hits could not be decoded (first: {})", .failures.len(), first_failure(.failures))]
    Decode {
        failures: Vec<HitDecodeFailure>,
        total: usize,
    },
}

impl SearchError {
    /// Create a malformed query error with a message
    pub fn malformed_query(msg: impl Into<String>) -> Self {
        Self::MalformedQuery(msg.into())
    }
}

fn first_failure(failures: &[HitDecodeFailure]) -> String {
    failures
        .first()
        .map(|failure| format!("{}: {}", failure.id, failure.reason))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_message() {
        let err = SearchError::Decode {
            failures: vec![HitDecodeFailure {
                id: "abc".to_string(),
                reason: "missing field `url`".to_string(),
            }],
            total: 4,
        };

        assert_eq!(
            err.to_string(),
            "1 of 4 hits could not be decoded (first: abc: missing field `url`)"
        );
    }

    #[test]
    fn test_store_error_is_transparent() {
        let err = SearchError::from(StoreError::index("connection refused"));
        assert_eq!(
            err.to_string(),
            "Search index operation failed: connection refused"
        );
    }
}
