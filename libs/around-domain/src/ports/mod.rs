//! Ports (trait definitions) for external dependencies
//!
//! This module defines the contracts (ports) that external adapters must implement.
//! Following hexagonal architecture, the domain defines what it needs, and the
//! infrastructure provides implementations.
//!
//! ## Static Dispatch
//!
//! The media store and search index use native Rust async traits with
//! `impl Future` return types instead of `async_trait` to ensure zero-cost
//! abstractions and static dispatch. The audit store is optional and held as
//! a trait object, so it goes through `async_trait` instead.

mod error;

use std::future::Future;

use async_trait::async_trait;
use serde_json::Value;

pub use error::StoreError;

use crate::audit::AuditRecord;
use crate::post::{MediaUpload, Post, PostId};
use crate::search::GeoRadiusQuery;

/// Port for media storage operations
///
/// This trait abstracts away the object storage backend (S3, GCS, filesystem, ...).
/// Implementations must:
/// - Store the attachment under the given post id
/// - Return a URL that is publicly readable as soon as the call succeeds
/// - Convert any infrastructure errors to `StoreError::Media`
pub trait MediaStore: Send + Sync {
    /// Upload an attachment and return its public URL
    ///
    /// # Arguments
    ///
    /// * `key` - The post id, used verbatim as the object key
    /// * `media` - The attachment bytes and content type
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Media` if the upload fails
    fn put(
        &self,
        key: &PostId,
        media: MediaUpload,
    ) -> impl Future<Output = Result<String, StoreError>> + Send;
}

/// A raw document returned by a geo query, before it is decoded into a Post
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedHit {
    /// Document id in the index
    pub id: String,
    /// Untyped document source; `Value::Null` when the index returned none
    pub source: Value,
}

/// Port for search index operations
///
/// Implementations must support a geo-radius predicate over the `location`
/// field and make writes visible to the next query (no eventual visibility).
pub trait SearchIndex: Send + Sync {
    /// Index a post under the given id, visible to searches once this returns
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Index` if the write fails
    fn put(
        &self,
        id: &PostId,
        post: &Post,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Return all documents whose location lies within the query radius
    ///
    /// Hits are returned in the index's native order; no extra sort is applied.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Index` if the index is unreachable or the query is rejected
    fn query(
        &self,
        query: &GeoRadiusQuery,
    ) -> impl Future<Output = Result<Vec<IndexedHit>, StoreError>> + Send;
}

/// Port for the optional, best-effort audit trail
///
/// Writes are fire-and-forget: a failure is logged by the caller and never
/// changes the outcome of an ingestion request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Record an ingested post
    async fn record(&self, record: &AuditRecord) -> Result<(), StoreError>;
}
