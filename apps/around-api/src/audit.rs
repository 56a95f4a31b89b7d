//! Audit trail written to the tracing pipeline
//!
//! Each ingested post is emitted as one JSON event under the `around::audit`
//! target, so a log shipper can route it to a wide-column store.

use around_domain::{audit::AuditRecord, AuditStore, StoreError};
use async_trait::async_trait;
use tracing::info;

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditStore;

#[async_trait]
impl AuditStore for TracingAuditStore {
    async fn record(&self, record: &AuditRecord) -> Result<(), StoreError> {
        let payload = serde_json::to_string(record)
            .map_err(|err| StoreError::audit(format!("unserializable record: {}", err)))?;

        info!(target: "around::audit", post_id = %record.post_id, %payload, "Post recorded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use around_domain::post::{Location, Post, PostId, Principal};

    #[tokio::test]
    async fn test_record_succeeds() {
        let user = Principal::new("john").unwrap();
        let post = Post::new(&user, "hello", Location::new(1.0, 2.0), "https://m/1");
        let record = AuditRecord::from_post(PostId::new(), &post);

        assert!(TracingAuditStore.record(&record).await.is_ok());
    }
}
