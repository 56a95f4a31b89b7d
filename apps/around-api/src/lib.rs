//! Around API - Geo-tagged post service
//!
//! HTTP shell around the domain pipelines: authenticated users submit posts
//! with a media attachment and search for posts near a coordinate.

pub mod audit;
pub mod auth;
pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;

use std::sync::Arc;

use around_domain::{PostIngestionService, ProximitySearchService};
use axum::extract::FromRef;

use crate::auth::JwtVerifier;

/// Application state shared across handlers
///
/// Generic over the media store and search index so the same router runs on
/// S3/Elasticsearch in production and in-memory adapters in tests.
pub struct AppState<M, I> {
    pub ingestion_service: Arc<PostIngestionService<M, I>>,
    pub search_service: Arc<ProximitySearchService<I>>,
    pub verifier: Arc<JwtVerifier>,
}

impl<M, I> AppState<M, I> {
    pub fn new(
        ingestion_service: PostIngestionService<M, I>,
        search_service: ProximitySearchService<I>,
        verifier: JwtVerifier,
    ) -> Self {
        Self {
            ingestion_service: Arc::new(ingestion_service),
            search_service: Arc::new(search_service),
            verifier: Arc::new(verifier),
        }
    }
}

impl<M, I> Clone for AppState<M, I> {
    fn clone(&self) -> Self {
        Self {
            ingestion_service: self.ingestion_service.clone(),
            search_service: self.search_service.clone(),
            verifier: self.verifier.clone(),
        }
    }
}

impl<M, I> FromRef<AppState<M, I>> for Arc<JwtVerifier> {
    fn from_ref(state: &AppState<M, I>) -> Self {
        state.verifier.clone()
    }
}
