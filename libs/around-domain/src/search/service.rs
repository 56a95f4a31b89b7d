//! Proximity search service - Query, decode and filter nearby posts

use std::time::Duration;

use tracing::{debug, info, warn};

use super::{GeoRadiusQuery, HitDecodeFailure, Radius, SearchError, SearchRequest};
use crate::deadline::within;
use crate::policy::ContentPolicy;
use crate::ports::{IndexedHit, SearchIndex};
use crate::post::Post;

/// Configuration for the search service
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Radius used when the request carries none (default: 200km)
    pub default_radius: Radius,
    /// Maximum number of hits requested from the index (default: 100)
    pub max_results: usize,
    /// Upper bound on the index query, unbounded when `None`
    pub index_timeout: Option<Duration>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_radius: Radius::DEFAULT,
            max_results: 100,
            index_timeout: None,
        }
    }
}

/// Service answering "which posts are near this point" queries
///
/// The pipeline is:
/// 1. Build a geo-radius query around the requested center
/// 2. Run it against the search index (native index order is kept)
/// 3. Decode every hit into a Post, collecting decode failures
/// 4. Drop posts whose message is blocked by the content policy
///
/// Any failure along the way fails the whole search.
pub struct ProximitySearchService<I> {
    index: I,
    policy: ContentPolicy,
    config: SearchConfig,
}

impl<I> ProximitySearchService<I>
where
    I: SearchIndex,
{
    pub fn new(index: I, policy: ContentPolicy, config: SearchConfig) -> Self {
        Self {
            index,
            policy,
            config,
        }
    }

    /// Create a service with the default policy and configuration
    pub fn with_index(index: I) -> Self {
        Self::new(index, ContentPolicy::default(), SearchConfig::default())
    }

    /// Find the posts within the requested radius that pass the content policy
    ///
    /// # Errors
    ///
    /// - `SearchError::Store` if the index query fails
    /// - `SearchError::Deadline` if the index query exceeds the configured timeout
    /// - `SearchError::Decode` if any hit does not match the Post shape
    pub async fn search(&self, request: SearchRequest) -> Result<Vec<Post>, SearchError> {
        let query = GeoRadiusQuery::new(
            request.center,
            request.radius.unwrap_or(self.config.default_radius),
            self.config.max_results,
        );

        debug!(
            lat = query.center.lat,
            lon = query.center.lon,
            radius = %query.radius,
            "Querying search index"
        );

        let hits = within(
            self.config.index_timeout,
            "search index query",
            self.index.query(&query),
        )
        .await??;

        let total = hits.len();
        let mut posts = Vec::with_capacity(total);
        let mut failures = Vec::new();

        for hit in hits {
            match decode_hit(hit) {
                Ok(post) if self.policy.is_blocked(post.message()) => {
                    debug!(user = %post.user(), "Post withheld by content policy");
                }
                Ok(post) => posts.push(post),
                Err(failure) => failures.push(failure),
            }
        }

        if !failures.is_empty() {
            warn!(
                failed = failures.len(),
                total, "Search hits did not match the post shape"
            );
            return Err(SearchError::Decode { failures, total });
        }

        info!(hits = total, returned = posts.len(), "Search completed");
        Ok(posts)
    }

}

fn decode_hit(hit: IndexedHit) -> Result<Post, HitDecodeFailure> {
    let IndexedHit { id, source } = hit;
    serde_json::from_value(source).map_err(|err| HitDecodeFailure {
        id,
        reason: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{SearchIndex, StoreError};
    use crate::post::{Location, PostId, Principal};
    use crate::testing::InMemorySearchIndex;
    use serde_json::json;
    use std::future::Future;

    fn post(user: &str, message: &str, lat: f64, lon: f64) -> Post {
        let user = Principal::new(user).unwrap();
        Post::new(&user, message, Location::new(lat, lon), "https://media/x")
    }

    async fn seeded(posts: &[Post]) -> InMemorySearchIndex {
        let index = InMemorySearchIndex::new();
        for p in posts {
            index.put(&PostId::new(), p).await.unwrap();
        }
        index
    }

    fn request(lat: f64, lon: f64, km: f64) -> SearchRequest {
        SearchRequest::new(Location::new(lat, lon), Some(Radius::from_km(km).unwrap()))
    }

    #[tokio::test]
    async fn test_search_empty_index_returns_empty() {
        let service = ProximitySearchService::with_index(InMemorySearchIndex::new());

        let posts = service.search(request(0.0, 0.0, 10.0)).await.unwrap();
        assert!(posts.is_empty());
    }

    #[tokio::test]
    async fn test_search_finds_nearby_and_skips_distant() {
        let index = seeded(&[
            post("john", "hello", 37.0, -120.0),
            post("jane", "far away", 10.0, 10.0),
        ])
        .await;
        let service = ProximitySearchService::with_index(index);

        let posts = service.search(request(37.0, -120.0, 1.0)).await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].message(), "hello");
    }

    #[tokio::test]
    async fn test_search_filters_blocked_messages() {
        let index = seeded(&[
            post("john", "you bitch", 10.0, 10.0),
            post("jane", "nice view", 10.0, 10.0),
        ])
        .await;
        let service = ProximitySearchService::with_index(index);

        let posts = service.search(request(10.0, 10.0, 1.0)).await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].message(), "nice view");
    }

    #[tokio::test]
    async fn test_search_policy_is_case_sensitive() {
        let index = seeded(&[post("john", "you BITCH", 10.0, 10.0)]).await;
        let service = ProximitySearchService::with_index(index);

        let posts = service.search(request(10.0, 10.0, 1.0)).await.unwrap();
        assert_eq!(posts.len(), 1);
    }

    #[tokio::test]
    async fn test_search_uses_injected_policy() {
        let index = seeded(&[post("john", "buy spam", 10.0, 10.0)]).await;
        let service = ProximitySearchService::new(
            index,
            ContentPolicy::new(["spam"]),
            SearchConfig::default(),
        );

        assert!(service.search(request(10.0, 10.0, 1.0)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_default_radius_applies() {
        // ~111km north of the center: inside 200km, outside 100km
        let index = seeded(&[post("john", "hello", 1.0, 0.0)]).await;
        let service = ProximitySearchService::with_index(index);

        let default = SearchRequest::new(Location::new(0.0, 0.0), None);
        assert_eq!(service.search(default).await.unwrap().len(), 1);
        assert!(service
            .search(request(0.0, 0.0, 100.0))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_search_is_stable_across_repeats() {
        let index = seeded(&[
            post("a", "one", 5.0, 5.0),
            post("b", "two", 5.01, 5.0),
            post("c", "three", 5.0, 5.01),
        ])
        .await;
        let service = ProximitySearchService::with_index(index);

        let first = service.search(request(5.0, 5.0, 50.0)).await.unwrap();
        let second = service.search(request(5.0, 5.0, 50.0)).await.unwrap();
        assert_eq!(first.len(), 3);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_search_reports_every_bad_hit() {
        let index = seeded(&[post("john", "hello", 1.0, 1.0)]).await;
        index.insert_raw("bad-1", json!({ "user": "x", "location": { "lat": 1.0, "lon": 1.0 } }));
        index.insert_raw("bad-2", json!({ "unexpected": true, "location": { "lat": 1.0, "lon": 1.0 } }));
        let service = ProximitySearchService::with_index(index);

        let err = service.search(request(1.0, 1.0, 5.0)).await.unwrap_err();
        match err {
            SearchError::Decode { failures, total } => {
                assert_eq!(total, 3);
                let ids: Vec<_> = failures.iter().map(|f| f.id.as_str()).collect();
                assert_eq!(ids, vec!["bad-1", "bad-2"]);
            }
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    struct FailingIndex;

    impl SearchIndex for FailingIndex {
        fn put(
            &self,
            _id: &PostId,
            _post: &Post,
        ) -> impl Future<Output = Result<(), StoreError>> + Send {
            async { Err(StoreError::index("unreachable")) }
        }

        fn query(
            &self,
            _query: &GeoRadiusQuery,
        ) -> impl Future<Output = Result<Vec<IndexedHit>, StoreError>> + Send {
            async { Err(StoreError::index("unreachable")) }
        }
    }

    #[tokio::test]
    async fn test_search_propagates_index_failure() {
        let service = ProximitySearchService::with_index(FailingIndex);

        let err = service.search(request(0.0, 0.0, 1.0)).await.unwrap_err();
        assert!(matches!(err, SearchError::Store(StoreError::Index(_))));
    }
}
