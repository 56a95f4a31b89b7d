//! In-memory port implementations for tests
//!
//! Available to this crate's unit tests and, through the `test-util` feature,
//! to downstream crates that need a working pipeline without S3 or
//! Elasticsearch.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;

use crate::ports::{IndexedHit, MediaStore, SearchIndex, StoreError};
use crate::post::{MediaUpload, Post, PostId};
use crate::search::GeoRadiusQuery;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Media store keeping uploads in memory and serving them from `base_url`
#[derive(Clone)]
pub struct InMemoryMediaStore {
    base_url: String,
    objects: Arc<Mutex<Vec<(String, MediaUpload)>>>,
    fail_with: Option<String>,
}

impl InMemoryMediaStore {
    pub fn new() -> Self {
        Self {
            base_url: "https://media.test".to_string(),
            objects: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    /// A store whose every upload fails with `reason`
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            fail_with: Some(reason.into()),
            ..Self::new()
        }
    }

    /// URL returned for an object stored under `key`
    pub fn url_for(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, key)
    }

    /// Keys of all stored objects, in upload order
    pub fn keys(&self) -> Vec<String> {
        lock(&self.objects).iter().map(|(key, _)| key.clone()).collect()
    }

    pub fn object(&self, key: &str) -> Option<MediaUpload> {
        lock(&self.objects)
            .iter()
            .find(|(stored, _)| stored == key)
            .map(|(_, media)| media.clone())
    }
}

impl Default for InMemoryMediaStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaStore for InMemoryMediaStore {
    fn put(
        &self,
        key: &PostId,
        media: MediaUpload,
    ) -> impl Future<Output = Result<String, StoreError>> + Send {
        let key = key.to_string();
        let url = self.url_for(&key);
        let objects = self.objects.clone();
        let fail_with = self.fail_with.clone();

        async move {
            if let Some(reason) = fail_with {
                return Err(StoreError::media(reason));
            }
            lock(&objects).push((key, media));
            Ok(url)
        }
    }
}

/// Search index keeping documents in insertion order
///
/// Geo matching uses [`GeoRadiusQuery::matches`], so boundary behaviour is
/// inclusive like Elasticsearch's `geo_distance`.
#[derive(Clone, Default)]
pub struct InMemorySearchIndex {
    documents: Arc<Mutex<Vec<(String, Value)>>>,
    fail_with: Option<String>,
}

impl InMemorySearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// An index whose every call fails with `reason`
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            fail_with: Some(reason.into()),
            ..Self::default()
        }
    }

    /// Store an arbitrary document, bypassing the Post shape
    pub fn insert_raw(&self, id: impl Into<String>, source: Value) {
        upsert(&mut lock(&self.documents), id.into(), source);
    }

    pub fn len(&self) -> usize {
        lock(&self.documents).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Decode the document stored under `id`
    pub fn get(&self, id: &str) -> Option<Post> {
        lock(&self.documents)
            .iter()
            .find(|(stored, _)| stored == id)
            .and_then(|(_, source)| serde_json::from_value(source.clone()).ok())
    }
}

fn upsert(documents: &mut Vec<(String, Value)>, id: String, source: Value) {
    match documents.iter_mut().find(|(stored, _)| *stored == id) {
        Some(entry) => entry.1 = source,
        None => documents.push((id, source)),
    }
}

fn location_of(source: &Value) -> Option<crate::post::Location> {
    serde_json::from_value(source.get("location")?.clone()).ok()
}

impl SearchIndex for InMemorySearchIndex {
    fn put(&self, id: &PostId, post: &Post) -> impl Future<Output = Result<(), StoreError>> + Send {
        let id = id.to_string();
        let source = serde_json::to_value(post).map_err(|err| StoreError::index(err.to_string()));
        let documents = self.documents.clone();
        let fail_with = self.fail_with.clone();

        async move {
            if let Some(reason) = fail_with {
                return Err(StoreError::index(reason));
            }
            upsert(&mut lock(&documents), id, source?);
            Ok(())
        }
    }

    fn query(
        &self,
        query: &GeoRadiusQuery,
    ) -> impl Future<Output = Result<Vec<IndexedHit>, StoreError>> + Send {
        let query = query.clone();
        let documents = self.documents.clone();
        let fail_with = self.fail_with.clone();

        async move {
            if let Some(reason) = fail_with {
                return Err(StoreError::index(reason));
            }
            let hits = lock(&documents)
                .iter()
                .filter(|(_, source)| location_of(source).is_some_and(|loc| query.matches(&loc)))
                .take(query.limit)
                .map(|(id, source)| IndexedHit {
                    id: id.clone(),
                    source: source.clone(),
                })
                .collect();
            Ok(hits)
        }
    }
}
