//! Proximity search handler

use around_domain::{
    ports::{MediaStore, SearchIndex},
    search::SearchRequest,
};
use axum::{
    extract::{Query, State},
    Json,
};
use tracing::info;

use crate::{
    auth::AuthenticatedUser,
    dto::posts::{PostResponse, SearchParams},
    error::ApiError,
    AppState,
};

/// Handle searches for posts around a point
#[utoipa::path(
    get,
    path = "/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Posts within range, possibly empty", body = [PostResponse]),
        (status = 401, description = "Missing or invalid bearer token", body = String),
        (status = 500, description = "Malformed query or search index failure", body = String)
    ),
    security(("bearer" = [])),
    tag = "posts"
)]
pub async fn search_handler<M, I>(
    State(state): State<AppState<M, I>>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<PostResponse>>, ApiError>
where
    M: MediaStore + 'static,
    I: SearchIndex + 'static,
{
    let request = SearchRequest::from_params(
        params.lat.as_deref(),
        params.lon.as_deref(),
        params.range.as_deref(),
    )?;

    info!(
        user = %principal,
        lat = request.center.lat,
        lon = request.center.lon,
        range = ?params.range,
        "Received search request"
    );

    let posts = state.search_service.search(request).await?;

    Ok(Json(posts.into_iter().map(PostResponse::from).collect()))
}
