//! S3 Media Store Implementation
//!
//! This module implements the `MediaStore` trait using AWS S3 (or any
//! S3-compatible service such as MinIO) as the backend. It handles the upload
//! and converts AWS errors to domain errors.

use aws_sdk_s3::{primitives::ByteStream, types::ObjectCannedAcl, Client};
use around_domain::{
    ports::{MediaStore, StoreError},
    post::{MediaUpload, PostId},
};
use tracing::{debug, error, info, instrument, Instrument, Span};

/// S3-based implementation of the MediaStore port
///
/// Objects are stored flat at the root of the bucket, named after the post id.
/// The URL handed back to the domain is `<public base url>/<post id>`, which
/// must resolve publicly once the upload has succeeded.
///
/// ## Configuration
///
/// The store requires:
/// - An S3 bucket name
/// - The public base URL objects are served from (bucket website, CDN, MinIO endpoint...)
/// - An AWS SDK S3 Client (configured with region, credentials, endpoint)
///
/// ## Error Handling
///
/// All AWS SDK errors are converted to `StoreError::Media` with
/// descriptive error messages for debugging.
#[derive(Clone)]
pub struct S3MediaStore {
    client: Client,
    bucket: String,
    public_base_url: String,
    public_read_acl: bool,
}

impl S3MediaStore {
    /// Create a new S3 media store
    ///
    /// # Arguments
    ///
    /// * `client` - Configured AWS S3 client
    /// * `bucket` - Name of the S3 bucket to use
    /// * `public_base_url` - Base URL objects are publicly served from
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use aws_sdk_s3::Client;
    /// use around_s3::infrastructure::S3MediaStore;
    ///
    /// # async fn example() {
    /// let config = aws_config::load_from_env().await;
    /// let s3_client = Client::new(&config);
    /// let store = S3MediaStore::new(
    ///     s3_client,
    ///     "post-images".to_string(),
    ///     S3MediaStore::default_public_base_url("post-images"),
    /// );
    /// # }
    /// ```
    pub fn new(client: Client, bucket: String, public_base_url: String) -> Self {
        let public_base_url = public_base_url.trim_end_matches('/').to_string();
        info!(bucket = %bucket, public_base_url = %public_base_url, "Initializing S3MediaStore");
        Self {
            client,
            bucket,
            public_base_url,
            public_read_acl: true,
        }
    }

    /// Skip the `public-read` canned ACL on uploads
    ///
    /// Needed for buckets with ACLs disabled, where public access is granted by
    /// bucket policy instead.
    pub fn without_public_read_acl(mut self) -> Self {
        self.public_read_acl = false;
        self
    }

    /// Virtual-hosted AWS URL for a bucket
    pub fn default_public_base_url(bucket: &str) -> String {
        format!("https://{}.s3.amazonaws.com", bucket)
    }

    /// Generate the S3 key for a post's media
    ///
    /// Follows the flat storage pattern: just the post UUID
    fn generate_key(post_id: &PostId) -> String {
        post_id.to_string()
    }

    fn public_url(&self, key: &str) -> String {
        object_url(&self.public_base_url, key)
    }
}

fn object_url(base: &str, key: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), key)
}

impl MediaStore for S3MediaStore {
    #[instrument(skip(self, media), fields(post_id = %key, data_size = media.len()))]
    fn put(
        &self,
        key: &PostId,
        media: MediaUpload,
    ) -> impl std::future::Future<Output = Result<String, StoreError>> + Send {
        let client = self.client.clone();
        let bucket = self.bucket.clone();
        let key = Self::generate_key(key);
        let url = self.public_url(&key);
        let acl = self.public_read_acl.then_some(ObjectCannedAcl::PublicRead);

        async move {
            debug!(key = %key, bucket = %bucket, "Uploading media to S3");

            let body = ByteStream::from(media.bytes().clone());

            match client
                .put_object()
                .bucket(&bucket)
                .key(&key)
                .set_content_type(media.content_type().map(str::to_string))
                .set_acl(acl)
                .body(body)
                .send()
                .await
            {
                Ok(_) => {
                    info!(key = %key, url = %url, "Successfully uploaded media to S3");
                    Ok(url)
                }
                Err(err) => {
                    error!(key = %key, error = ?err, "Failed to upload media to S3");
                    Err(StoreError::media(format!(
                        "S3 put_object failed for key '{}': {}",
                        key, err
                    )))
                }
            }
        }
        .instrument(Span::current())
    }
}
