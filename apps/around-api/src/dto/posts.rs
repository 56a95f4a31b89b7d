//! DTOs for post endpoints

use around_domain::Post;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Multipart form accepted by `POST /post`
#[derive(Debug, ToSchema)]
pub struct CreatePostForm {
    /// Free text; may be empty
    #[schema(example = "hello")]
    pub message: Option<String>,
    /// Latitude in decimal degrees; unparseable values become 0
    #[schema(example = "37.0")]
    pub lat: Option<String>,
    /// Longitude in decimal degrees; unparseable values become 0
    #[schema(example = "-120.0")]
    pub lon: Option<String>,
    /// The attached media file (required)
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
}

/// Query parameters accepted by `GET /search`
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Latitude of the center; unparseable values become 0
    #[param(example = "37.0")]
    pub lat: Option<String>,
    /// Longitude of the center; unparseable values become 0
    #[param(example = "-120.0")]
    pub lon: Option<String>,
    /// Radius in kilometers, without unit (default: 200)
    #[param(example = "1")]
    pub range: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct LocationResponse {
    #[schema(example = 37.0)]
    pub lat: f64,
    #[schema(example = json!(-120.0))]
    pub lon: f64,
}

/// A post returned by a search
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PostResponse {
    #[schema(example = "john")]
    pub user: String,
    #[schema(example = "hello")]
    pub message: String,
    pub location: LocationResponse,
    /// Public URL of the attached media
    #[schema(example = "https://post-images.s3.amazonaws.com/0190f0c4-6b1e-7c3a-9d55-2f4a1e8b7c21")]
    pub url: String,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        let location = *post.location();
        Self {
            user: post.user().to_string(),
            message: post.message().to_string(),
            location: LocationResponse {
                lat: location.lat,
                lon: location.lon,
            },
            url: post.url().to_string(),
        }
    }
}
