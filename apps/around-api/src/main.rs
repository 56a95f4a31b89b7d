//! Around API - Geo-tagged post service
//!
//! Stores post media in S3 and indexes posts in Elasticsearch for
//! geo-radius search.

use std::sync::Arc;

use anyhow::{Context, Result};
use around_api::{
    audit::TracingAuditStore, auth::JwtVerifier, config::ApiConfig, routes, AppState,
};
use around_domain::{ContentPolicy, PostIngestionService, ProximitySearchService};
use around_elastic::infrastructure::ElasticSearchIndex;
use around_s3::infrastructure::S3MediaStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "around_api=info,around_domain=info,around_s3=info,around_elastic=info,\
            around::audit=info,tower_http=debug"
                .into()
        }))
        .init();

    info!("Starting Around API service");

    let config = ApiConfig::from_env()?;

    // Initialize AWS S3 client with MinIO-compatible configuration
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;

    // Configure S3 client with path-style addressing for MinIO compatibility
    let s3_config = aws_sdk_s3::config::Builder::from(&aws_config)
        .force_path_style(true) // Required for MinIO
        .build();

    let s3_client = aws_sdk_s3::Client::from_conf(s3_config);

    let media_base_url = config
        .media_base_url
        .clone()
        .unwrap_or_else(|| S3MediaStore::default_public_base_url(&config.bucket));

    let mut media_store = S3MediaStore::new(s3_client, config.bucket.clone(), media_base_url);
    if !config.public_read_acl {
        media_store = media_store.without_public_read_acl();
    }

    // Connect to the search index and make sure the geo_point mapping exists
    let index = ElasticSearchIndex::connect(&config.es_url, &config.index)
        .context("Failed to configure Elasticsearch client")?;
    index
        .ensure_index()
        .await
        .context("Failed to provision search index")?;

    let mut ingestion_service =
        PostIngestionService::new(media_store, index.clone(), config.ingestion_config());
    if config.audit_enabled {
        info!("Audit trail enabled");
        ingestion_service = ingestion_service.with_audit(Arc::new(TracingAuditStore));
    }

    let search_service =
        ProximitySearchService::new(index, ContentPolicy::default(), config.search_config()?);

    // Create shared application state
    let state = AppState::new(
        ingestion_service,
        search_service,
        JwtVerifier::hs256(config.jwt_secret.as_bytes()),
    );

    // Build HTTP router
    let app = routes::create_router(state);

    let addr = config.bind_address();
    info!(addr = %addr, "Starting HTTP server");

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
