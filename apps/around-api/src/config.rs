//! Service configuration read from the environment
//!
//! Every setting except the token secret has a default, logged when used.

use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use around_domain::{
    ingestion::IngestionConfig,
    search::{Radius, SearchConfig},
};
use tracing::info;

/// Elasticsearch's default `index.max_result_window`; larger result sizes are rejected
const MAX_RESULT_WINDOW: usize = 10_000;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub bucket: String,
    /// Base URL uploaded media is served from; derived from the bucket when unset
    pub media_base_url: Option<String>,
    pub public_read_acl: bool,
    pub es_url: String,
    pub index: String,
    pub jwt_secret: String,
    pub default_range_km: f64,
    pub max_results: usize,
    pub max_media_bytes: usize,
    pub adapter_timeout: Option<Duration>,
    pub audit_enabled: bool,
}

impl ApiConfig {
    /// Read the configuration from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup("AROUND_JWT_SECRET")
            .filter(|secret| !secret.is_empty())
            .ok_or_else(|| anyhow!("AROUND_JWT_SECRET must be set"))?;

        let timeout_secs: u64 = parsed(&lookup, "AROUND_ADAPTER_TIMEOUT_SECS", 0)?;

        Ok(Self {
            host: parsed(&lookup, "AROUND_HOST", "0.0.0.0".to_string())?,
            port: parsed(&lookup, "AROUND_PORT", 8080)?,
            bucket: parsed(&lookup, "AROUND_BUCKET", "post-images".to_string())?,
            media_base_url: lookup("AROUND_MEDIA_BASE_URL").filter(|url| !url.is_empty()),
            public_read_acl: parsed(&lookup, "AROUND_PUBLIC_READ_ACL", true)?,
            es_url: parsed(&lookup, "AROUND_ES_URL", "http://localhost:9200".to_string())?,
            index: parsed(&lookup, "AROUND_INDEX", "around".to_string())?,
            jwt_secret,
            default_range_km: parsed(&lookup, "AROUND_DEFAULT_RANGE_KM", Radius::DEFAULT.km())?,
            max_results: parsed(&lookup, "AROUND_MAX_RESULTS", 100)?,
            max_media_bytes: parsed(&lookup, "AROUND_MAX_MEDIA_BYTES", 32 * 1024 * 1024)?,
            // 0 disables the deadline
            adapter_timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
            audit_enabled: parsed(&lookup, "AROUND_AUDIT_ENABLED", false)?,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn ingestion_config(&self) -> IngestionConfig {
        IngestionConfig {
            max_media_size: self.max_media_bytes,
            adapter_timeout: self.adapter_timeout,
        }
    }

    pub fn search_config(&self) -> Result<SearchConfig> {
        let default_radius = Radius::from_km(self.default_range_km)
            .context("AROUND_DEFAULT_RANGE_KM is not a valid radius")?;

        if !(1..=MAX_RESULT_WINDOW).contains(&self.max_results) {
            return Err(anyhow!(
                "AROUND_MAX_RESULTS must be between 1 and {}, got {}",
                MAX_RESULT_WINDOW,
                self.max_results
            ));
        }

        Ok(SearchConfig {
            default_radius,
            max_results: self.max_results,
            index_timeout: self.adapter_timeout,
        })
    }
}

fn parsed<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + std::fmt::Debug,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("{} has an invalid value: '{}'", key, raw)),
        None => {
            info!(key, default = ?default, "Setting not provided, using default");
            Ok(default)
        }
    }
}
