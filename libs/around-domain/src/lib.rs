//! # Around Domain Layer
//!
//! This crate contains the pure business logic and domain models for the Around
//! geo-tagged post service. It follows hexagonal architecture principles:
//!
//! - **Entities**: Core domain models (Post, Location, Principal)
//! - **Ports**: Trait definitions for external dependencies (MediaStore, SearchIndex, AuditStore)
//! - **Services**: The post ingestion and proximity search pipelines
//!
//! ## Architecture
//!
//! This layer has NO dependencies on infrastructure concerns (AWS, Elasticsearch, HTTP, etc.).
//! All external dependencies are expressed as traits (ports) that will be implemented
//! by adapter layers.
//!
//! ## Example
//!
//! ```rust
//! use around_domain::ingestion::{PostForm, PostIngestionService};
//! use around_domain::post::{MediaUpload, Principal};
//! use around_domain::ports::{MediaStore, SearchIndex};
//!
//! async fn example<M: MediaStore, I: SearchIndex>(service: PostIngestionService<M, I>) {
//!     let principal = Principal::new("john").unwrap();
//!     let form = PostForm::from_fields(Some("hello".into()), Some("37.0"), Some("-120.0"));
//!     let media = MediaUpload::new(vec![0xFF, 0xD8], Some("image/jpeg".into()));
//!     let post_id = service.ingest(principal, form, Some(media)).await.unwrap();
//!     println!("Ingested post: {}", post_id);
//! }
//! ```

pub mod audit;
mod deadline;
pub mod ingestion;
pub mod policy;
pub mod ports;
pub mod post;
pub mod search;
#[cfg(any(test, feature = "test-util"))]
pub mod testing;

// Re-export commonly used types
pub use deadline::DeadlineExceeded;
pub use ingestion::{IngestionError, PostIngestionService};
pub use policy::ContentPolicy;
pub use ports::{AuditStore, MediaStore, SearchIndex, StoreError};
pub use post::{Location, Post, PostId, Principal};
pub use search::{ProximitySearchService, SearchError};
