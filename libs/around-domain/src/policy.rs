//! Content policy applied on the read path
//!
//! Posts are never rejected on write; blocked messages are excluded from
//! search results instead.

/// Terms blocked by [`ContentPolicy::default`]
pub const DEFAULT_DENYLIST: [&str; 3] = ["fuck", "shit", "bitch"];

/// Denylist-based text classifier
///
/// Matching is a plain, case-sensitive substring test: no case folding, no
/// Unicode normalization, no word boundaries. `"Bitch"` is therefore allowed
/// by the default list while `"bitchy"` is blocked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentPolicy {
    denylist: Vec<String>,
}

impl ContentPolicy {
    /// Create a policy blocking any text that contains one of `terms`
    ///
    /// Empty terms are ignored, since they would match every message.
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            denylist: terms
                .into_iter()
                .map(Into::into)
                .filter(|term: &String| !term.is_empty())
                .collect(),
        }
    }

    /// Check whether `text` contains a denylisted term
    pub fn is_blocked(&self, text: &str) -> bool {
        self.denylist.iter().any(|term| text.contains(term.as_str()))
    }

    pub fn denylist(&self) -> &[String] {
        &self.denylist
    }
}

impl Default for ContentPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_DENYLIST)
    }
}
