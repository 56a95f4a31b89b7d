//! Best-effort audit trail for ingested posts
//!
//! Audit writes run on a detached task after the post has been indexed. Their
//! outcome is reported through tracing only and never joins back into the
//! ingestion result.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::ports::AuditStore;
use crate::post::{Location, Post, PostId};

/// The fields of an ingested post, keyed by its id
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditRecord {
    pub post_id: PostId,
    pub user: String,
    pub message: String,
    pub location: Location,
    pub url: String,
    pub recorded_at: DateTime<Utc>,
}

impl AuditRecord {
    pub fn from_post(post_id: PostId, post: &Post) -> Self {
        Self {
            post_id,
            user: post.user().to_string(),
            message: post.message().to_string(),
            location: *post.location(),
            url: post.url().to_string(),
            recorded_at: Utc::now(),
        }
    }
}

/// Spawn the audit write on the current runtime and return immediately
///
/// The returned handle is only useful to tests; production callers drop it.
pub fn dispatch(store: Arc<dyn AuditStore>, record: AuditRecord) -> JoinHandle<()> {
    tokio::spawn(async move {
        match store.record(&record).await {
            Ok(()) => debug!(post_id = %record.post_id, "Audit record written"),
            Err(err) => {
                warn!(post_id = %record.post_id, error = %err, "Audit record dropped")
            }
        }
    })
}
