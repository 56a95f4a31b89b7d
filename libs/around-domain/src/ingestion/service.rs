//! Post ingestion service - Business logic orchestration
//!
//! This module contains the core business logic for post ingestion.
//! The service coordinates between the domain entities, the media store and
//! the search index.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use super::IngestionError;
use crate::audit::{self, AuditRecord};
use crate::deadline::within;
use crate::ports::{AuditStore, MediaStore, SearchIndex};
use crate::post::{Location, MediaUpload, Post, PostId, Principal};

/// Configuration for the ingestion service
#[derive(Debug, Clone)]
pub struct IngestionConfig {
    /// Maximum allowed attachment size in bytes (default: 32MB)
    pub max_media_size: usize,
    /// Upper bound on each backing store call, unbounded when `None`
    pub adapter_timeout: Option<Duration>,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            max_media_size: 32 * 1024 * 1024, // 32MB
            adapter_timeout: None,
        }
    }
}

/// Untrusted text fields submitted with a post
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PostForm {
    pub message: String,
    pub location: Location,
}

impl PostForm {
    /// Build the form from raw multipart values
    ///
    /// A missing message becomes the empty string and coordinates are parsed
    /// lossily (see [`Location::parse_lossy`]).
    pub fn from_fields(message: Option<String>, lat: Option<&str>, lon: Option<&str>) -> Self {
        Self {
            message: message.unwrap_or_default(),
            location: Location::parse_lossy(lat, lon),
        }
    }
}

/// Service for ingesting posts into the Around platform
///
/// This service encapsulates the business rules for post ingestion:
/// - Requires a non-empty media attachment within the size limit
/// - Generates the post id shared by the media store and the search index
/// - Uploads the media before anything is indexed
/// - Indexes the post with force-visible semantics
/// - Hands the post to the optional audit store without waiting on it
///
/// Steps run strictly in sequence and nothing is retried.
///
/// ## Static Dispatch
///
/// The service is generic over the `MediaStore` and `SearchIndex` implementations.
/// The compiler will generate specialized versions for each concrete pair,
/// resulting in zero-cost abstractions.
pub struct PostIngestionService<M, I> {
    media_store: M,
    index: I,
    audit: Option<Arc<dyn AuditStore>>,
    config: IngestionConfig,
}

impl<M, I> PostIngestionService<M, I>
where
    M: MediaStore,
    I: SearchIndex,
{
    /// Create a new PostIngestionService with the given stores and configuration
    pub fn new(media_store: M, index: I, config: IngestionConfig) -> Self {
        Self {
            media_store,
            index,
            audit: None,
            config,
        }
    }

    /// Create a new PostIngestionService with default configuration
    pub fn with_stores(media_store: M, index: I) -> Self {
        Self::new(media_store, index, IngestionConfig::default())
    }

    /// Record every ingested post in `audit`, best-effort
    pub fn with_audit(mut self, audit: Arc<dyn AuditStore>) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Ingest a post and return its id
    ///
    /// # Arguments
    ///
    /// * `principal` - The authenticated author
    /// * `form` - Message and location submitted with the post
    /// * `media` - The attachment; `None` when the request carried no file
    ///
    /// # Errors
    ///
    /// - `IngestionError::MissingMedia` / `EmptyMedia` / `MediaTooLarge` before any write
    /// - `IngestionError::Upload` if the media store fails (nothing is indexed)
    /// - `IngestionError::Index` if the index write fails
    /// - `IngestionError::Deadline` if a store call exceeds the configured timeout
    #[instrument(skip(self, form, media), fields(user = %principal))]
    pub async fn ingest(
        &self,
        principal: Principal,
        form: PostForm,
        media: Option<MediaUpload>,
    ) -> Result<PostId, IngestionError> {
        // Business rule: there is no text-only post
        let media = media.ok_or(IngestionError::MissingMedia)?;

        if media.is_empty() {
            return Err(IngestionError::EmptyMedia);
        }

        if media.len() > self.config.max_media_size {
            return Err(IngestionError::media_too_large(
                media.len(),
                self.config.max_media_size,
            ));
        }

        let post_id = PostId::new();
        debug!(post_id = %post_id, size = media.len(), "Uploading post media");

        let url = within(
            self.config.adapter_timeout,
            "media upload",
            self.media_store.put(&post_id, media),
        )
        .await?
        .map_err(IngestionError::Upload)?;

        let post = Post::new(&principal, form.message, form.location, url);

        within(
            self.config.adapter_timeout,
            "index write",
            self.index.put(&post_id, &post),
        )
        .await?
        .map_err(|e| {
            // The uploaded object stays in the media store with no post pointing at it
            warn!(post_id = %post_id, url = %post.url(), error = %e, "Index write failed after upload");
            IngestionError::Index(e)
        })?;

        info!(post_id = %post_id, url = %post.url(), "Post indexed");

        if let Some(store) = &self.audit {
            audit::dispatch(store.clone(), AuditRecord::from_post(post_id, &post));
        }

        Ok(post_id)
    }

    /// Get the service configuration
    pub fn config(&self) -> &IngestionConfig {
        &self.config
    }
}
