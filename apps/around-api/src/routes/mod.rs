//! API routes

pub mod posts;

use around_domain::ports::{MediaStore, SearchIndex};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue},
    Router,
};
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    dto::posts::{CreatePostForm, LocationResponse, PostResponse},
    handlers, AppState,
};

/// Room left in the request body limit for form fields and multipart framing
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::posts::create_post_handler,
        handlers::search::search_handler,
        health_handler
    ),
    components(
        schemas(CreatePostForm, PostResponse, LocationResponse)
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "posts", description = "Post ingestion and proximity search endpoints"),
        (name = "health", description = "Health check endpoints")
    ),
    info(
        title = "Around API",
        version = "0.1.0",
        description = "Geo-tagged post service: submit posts with media, search posts nearby",
        contact(
            name = "Around Team"
        )
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the main application router
pub fn create_router<M, I>(state: AppState<M, I>) -> Router
where
    M: MediaStore + 'static,
    I: SearchIndex + 'static,
{
    let body_limit = state.ingestion_service.config().max_media_size + FORM_OVERHEAD_BYTES;

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(posts::routes())
        .route("/health", axum::routing::get(health_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type,Authorization"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = String)
    ),
    tag = "health"
)]
async fn health_handler() -> &'static str {
    "OK"
}
