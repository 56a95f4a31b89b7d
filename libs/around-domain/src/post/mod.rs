//! Post domain module
//!
//! Entities shared by the ingestion and search pipelines.

mod entity;
mod ids;

pub use entity::{Location, MediaUpload, Post, Principal};
pub use ids::PostId;
