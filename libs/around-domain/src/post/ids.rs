use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a Post
///
/// PostId is a wrapper around UUID v7. The same value is used as the media
/// object key and as the search index document id, so the two stores can be
/// correlated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PostId(Uuid);

impl PostId {
    /// Generate a new random PostId
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for PostId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_id_generation() {
        let id1 = PostId::new();
        let id2 = PostId::new();

        assert_ne!(id1, id2, "Each PostId should be unique");
    }

    #[test]
    fn test_post_id_display() {
        let id = PostId::new();

        // Hyphenated UUID form, usable as an object key
        assert_eq!(id.to_string().len(), 36);
    }
}
