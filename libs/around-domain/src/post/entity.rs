//! Domain entities for geo-tagged posts
//!
//! A Post is the unit of content indexed for search: who wrote it, what it
//! says, where it was written and where its media can be fetched from.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A geographic coordinate in decimal degrees
///
/// No range validation is applied: latitude is expected in `[-90, 90]` and
/// longitude in `[-180, 180]`, but out-of-range values are passed through to
/// the search index as-is.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Build a location from raw request values
    ///
    /// Missing, unparseable or non-finite values (`NaN`, `inf`, overflow)
    /// silently become `0.0` instead of failing the request. This lossy behaviour is kept as-is: it is unclear whether
    /// it is intended graceful degradation or a latent bug, so callers relying
    /// on it should not be broken by a quiet "fix".
    pub fn parse_lossy(lat: Option<&str>, lon: Option<&str>) -> Self {
        Self {
            lat: parse_degrees_lossy(lat),
            lon: parse_degrees_lossy(lon),
        }
    }
}

fn parse_degrees_lossy(raw: Option<&str>) -> f64 {
    raw.and_then(|value| value.parse::<f64>().ok())
        .filter(|degrees| degrees.is_finite())
        .unwrap_or(0.0)
}

/// Validated identity of the caller, produced by the authentication gate
///
/// The ingestion pipeline only accepts a Principal, never a raw string pulled
/// from request input, so the author of a post always comes from a verified
/// credential.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Principal(String);

impl Principal {
    /// Wrap an identifier; returns `None` for an empty identifier
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        if id.is_empty() {
            None
        } else {
            Some(Self(id))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A binary attachment submitted with a post
#[derive(Debug, Clone)]
pub struct MediaUpload {
    bytes: Bytes,
    content_type: Option<String>,
}

impl MediaUpload {
    pub fn new(bytes: impl Into<Bytes>, content_type: Option<String>) -> Self {
        Self {
            bytes: bytes.into(),
            content_type,
        }
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A user-submitted post
///
/// Posts are:
/// - **Written once**: indexed a single time and never updated or deleted
/// - **Strictly shaped**: decoding rejects unknown and missing fields, so a
///   malformed index document is reported instead of half-read
///
/// # Example
///
/// ```rust
/// use around_domain::post::{Location, Post, Principal};
///
/// let user = Principal::new("john").unwrap();
/// let post = Post::new(&user, "hello", Location::new(37.0, -120.0), "https://cdn/abc");
/// assert_eq!(post.user(), "john");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Post {
    user: String,
    message: String,
    location: Location,
    url: String,
}

impl Post {
    /// Create a post authored by the given principal
    pub fn new(
        user: &Principal,
        message: impl Into<String>,
        location: Location,
        url: impl Into<String>,
    ) -> Self {
        Self {
            user: user.as_str().to_string(),
            message: message.into(),
            location,
            url: url.into(),
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Public URL of the attached media
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_lossy_valid_values() {
        let location = Location::parse_lossy(Some("37.5"), Some("-120.25"));
        assert_eq!(location, Location::new(37.5, -120.25));
    }

    #[test]
    fn test_parse_lossy_defaults_to_zero() {
        assert_eq!(Location::parse_lossy(None, None), Location::default());
        assert_eq!(
            Location::parse_lossy(Some("north"), Some("")),
            Location::new(0.0, 0.0)
        );
        assert_eq!(
            Location::parse_lossy(Some("12"), Some("east")),
            Location::new(12.0, 0.0)
        );
    }

    #[test]
    fn test_parse_lossy_drops_non_finite_values() {
        assert_eq!(
            Location::parse_lossy(Some("NaN"), Some("inf")),
            Location::new(0.0, 0.0)
        );
        assert_eq!(
            Location::parse_lossy(Some("-inf"), Some("1e400")),
            Location::new(0.0, 0.0)
        );
    }

    #[test]
    fn test_principal_rejects_empty() {
        assert!(Principal::new("").is_none());
        assert_eq!(Principal::new("alice").unwrap().as_str(), "alice");
    }

    #[test]
    fn test_post_wire_shape() {
        let user = Principal::new("john").unwrap();
        let post = Post::new(&user, "test", Location::new(37.0, -120.0), "https://m/1");

        let value = serde_json::to_value(&post).unwrap();
        assert_eq!(
            value,
            json!({
                "user": "john",
                "message": "test",
                "location": { "lat": 37.0, "lon": -120.0 },
                "url": "https://m/1"
            })
        );
    }

    #[test]
    fn test_post_rejects_unknown_fields() {
        let value = json!({
            "user": "john",
            "message": "test",
            "location": { "lat": 1.0, "lon": 2.0 },
            "url": "",
            "likes": 3
        });
        assert!(serde_json::from_value::<Post>(value).is_err());
    }

    #[test]
    fn test_post_rejects_missing_fields() {
        let value = json!({
            "user": "john",
            "location": { "lat": 1.0, "lon": 2.0 },
            "url": ""
        });
        assert!(serde_json::from_value::<Post>(value).is_err());
    }

    #[test]
    fn test_media_upload_accessors() {
        let media = MediaUpload::new(vec![1, 2, 3], Some("image/png".to_string()));
        assert_eq!(media.len(), 3);
        assert!(!media.is_empty());
        assert_eq!(media.content_type(), Some("image/png"));
    }
}
