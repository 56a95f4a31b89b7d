//! Ingestion domain module
//!
//! This module contains the business logic for post ingestion: how a
//! submitted form and attachment become a stored, searchable post.

mod error;
mod service;

pub use error::{IngestionError, Result};
pub use service::{IngestionConfig, PostForm, PostIngestionService};
