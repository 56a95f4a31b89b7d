//! Elasticsearch Search Index Implementation
//!
//! Posts are stored as documents keyed by post id. Writes use `refresh=true`
//! so a post is searchable as soon as its ingestion request returns.

use around_domain::{
    ports::{IndexedHit, SearchIndex, StoreError},
    post::{Post, PostId},
    search::GeoRadiusQuery,
};
use elasticsearch::{
    http::transport::{BuildError, SingleNodeConnectionPool, TransportBuilder},
    indices::{IndicesCreateParts, IndicesExistsParts},
    params::Refresh,
    Elasticsearch, IndexParts, SearchParts,
};
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, error, info, instrument, Instrument, Span};
use url::Url;

/// Errors raised while setting up the index client
#[derive(Debug, Error)]
pub enum ElasticError {
    #[error("invalid Elasticsearch URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("failed to build transport: {0}")]
    TransportBuild(#[from] BuildError),
    #[error("transport error: {0}")]
    Transport(#[from] elasticsearch::Error),
}

/// Elasticsearch-based implementation of the SearchIndex port
#[derive(Clone)]
pub struct ElasticSearchIndex {
    client: Elasticsearch,
    index: String,
}

impl ElasticSearchIndex {
    /// Connect to a single Elasticsearch node
    ///
    /// No request is sent; use [`ensure_index`](Self::ensure_index) to verify
    /// connectivity and provision the index.
    pub fn connect(url: &str, index: &str) -> Result<Self, ElasticError> {
        let parsed = Url::parse(url)?;
        let pool = SingleNodeConnectionPool::new(parsed);
        let transport = TransportBuilder::new(pool).build()?;
        info!(url = %url, index = %index, "Initializing ElasticSearchIndex");

        Ok(Self {
            client: Elasticsearch::new(transport),
            index: index.to_string(),
        })
    }

    /// Create the index with a `geo_point` mapping on `location` if it does not exist
    ///
    /// Returns `true` when the index was created by this call.
    pub async fn ensure_index(&self) -> Result<bool, ElasticError> {
        let exists_response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[self.index.as_str()]))
            .send()
            .await?;

        if exists_response.status_code().is_success() {
            debug!(index = %self.index, "Search index already exists");
            return Ok(false);
        }

        self.client
            .indices()
            .create(IndicesCreateParts::Index(&self.index))
            .body(index_mapping())
            .send()
            .await?
            .error_for_status_code()?;

        info!(index = %self.index, "Created search index");
        Ok(true)
    }
}

fn index_mapping() -> Value {
    json!({
        "mappings": {
            "properties": {
                "user": { "type": "keyword" },
                "message": { "type": "text" },
                "location": { "type": "geo_point" },
                "url": { "type": "keyword", "index": false }
            }
        }
    })
}

/// Request body selecting every document within the query radius
fn geo_distance_body(query: &GeoRadiusQuery) -> Value {
    json!({
        "size": query.limit,
        "query": {
            "geo_distance": {
                "distance": query.radius.to_string(),
                "location": {
                    "lat": query.center.lat,
                    "lon": query.center.lon
                }
            }
        }
    })
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: InnerHits,
}

#[derive(Debug, Deserialize)]
struct InnerHits {
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_source")]
    source: Option<Value>,
}

fn into_indexed_hits(response: SearchResponse) -> Vec<IndexedHit> {
    response
        .hits
        .hits
        .into_iter()
        .map(|hit| IndexedHit {
            id: hit.id,
            source: hit.source.unwrap_or(Value::Null),
        })
        .collect()
}

impl SearchIndex for ElasticSearchIndex {
    #[instrument(skip(self, post), fields(post_id = %id, index = %self.index))]
    fn put(
        &self,
        id: &PostId,
        post: &Post,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send {
        let client = self.client.clone();
        let index = self.index.clone();
        let id = id.to_string();
        let body = serde_json::to_value(post);

        async move {
            let body = body.map_err(|err| {
                StoreError::index(format!("failed to serialize post '{}': {}", id, err))
            })?;

            debug!(id = %id, "Indexing post");

            let result = client
                .index(IndexParts::IndexId(&index, &id))
                .refresh(Refresh::True)
                .body(body)
                .send()
                .await
                .and_then(|response| response.error_for_status_code());

            match result {
                Ok(_) => {
                    info!(id = %id, "Successfully indexed post");
                    Ok(())
                }
                Err(err) => {
                    error!(id = %id, error = ?err, "Failed to index post");
                    Err(StoreError::index(format!(
                        "index request failed for document '{}': {}",
                        id, err
                    )))
                }
            }
        }
        .instrument(Span::current())
    }

    #[instrument(skip(self, query), fields(radius = %query.radius, index = %self.index))]
    fn query(
        &self,
        query: &GeoRadiusQuery,
    ) -> impl std::future::Future<Output = Result<Vec<IndexedHit>, StoreError>> + Send {
        let client = self.client.clone();
        let index = self.index.clone();
        let body = geo_distance_body(query);

        async move {
            let response = client
                .search(SearchParts::Index(&[index.as_str()]))
                .body(body)
                .send()
                .await
                .and_then(|response| response.error_for_status_code())
                .map_err(|err| {
                    error!(error = ?err, "Geo distance query failed");
                    StoreError::index(format!("search request failed: {}", err))
                })?;

            let parsed: SearchResponse = response.json().await.map_err(|err| {
                error!(error = ?err, "Unreadable search response");
                StoreError::index(format!("unreadable search response: {}", err))
            })?;

            let hits = into_indexed_hits(parsed);
            debug!(hits = hits.len(), "Geo distance query returned");
            Ok(hits)
        }
        .instrument(Span::current())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use around_domain::{post::Location, search::Radius};
    use std::sync::{Arc, Mutex};
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::{
        layer::{Context, SubscriberExt},
        registry::LookupSpan,
        util::SubscriberInitExt,
        Layer,
    };

    /// Records the enclosing span name of every ERROR event raised by this crate
    #[derive(Clone, Default)]
    struct ErrorSpans(Arc<Mutex<Vec<Option<String>>>>);

    impl<S> Layer<S> for ErrorSpans
    where
        S: Subscriber + for<'a> LookupSpan<'a>,
    {
        fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
            let metadata = event.metadata();
            if *metadata.level() == Level::ERROR && metadata.target().starts_with("around_elastic") {
                let span = ctx.event_span(event).map(|span| span.name().to_string());
                self.0.lock().unwrap().push(span);
            }
        }
    }

    #[test]
    fn test_geo_distance_body() {
        let query = GeoRadiusQuery::new(
            Location::new(37.0, -120.0),
            Radius::parse_range("1").unwrap(),
            100,
        );

        assert_eq!(
            geo_distance_body(&query),
            json!({
                "size": 100,
                "query": {
                    "geo_distance": {
                        "distance": "1km",
                        "location": { "lat": 37.0, "lon": -120.0 }
                    }
                }
            })
        );
    }

    #[test]
    fn test_mapping_declares_geo_point() {
        let mapping = index_mapping();
        assert_eq!(
            mapping["mappings"]["properties"]["location"]["type"],
            "geo_point"
        );
    }

    #[test]
    fn test_hits_keep_order_and_missing_sources() {
        let response: SearchResponse = serde_json::from_value(json!({
            "took": 3,
            "hits": {
                "total": { "value": 2, "relation": "eq" },
                "hits": [
                    { "_index": "around", "_id": "b", "_score": 1.0, "_source": { "message": "hi" } },
                    { "_index": "around", "_id": "a", "_score": 1.0 }
                ]
            }
        }))
        .unwrap();

        let hits = into_indexed_hits(response);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, "b");
        assert_eq!(hits[0].source, json!({ "message": "hi" }));
        assert_eq!(hits[1].id, "a");
        assert_eq!(hits[1].source, Value::Null);
    }

    #[test]
    fn test_connect_rejects_bad_url() {
        assert!(matches!(
            ElasticSearchIndex::connect("not a url", "around"),
            Err(ElasticError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_query_failure_is_logged_inside_query_span() {
        let spans = ErrorSpans::default();
        let _guard = tracing_subscriber::registry()
            .with(spans.clone())
            .set_default();

        // Nothing listens on port 1
        let index = ElasticSearchIndex::connect("http://127.0.0.1:1", "around").unwrap();
        let query = GeoRadiusQuery::new(Location::new(1.0, 1.0), Radius::DEFAULT, 10);

        assert!(index.query(&query).await.is_err());

        let recorded = spans.0.lock().unwrap().clone();
        assert!(!recorded.is_empty());
        assert!(recorded.iter().all(|span| span.as_deref() == Some("query")));
    }
}
