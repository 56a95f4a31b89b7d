//! Post ingestion handler

use around_domain::{
    ingestion::PostForm,
    post::MediaUpload,
    ports::{MediaStore, SearchIndex},
};
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::{header, StatusCode},
    response::IntoResponse,
};
use tracing::{debug, info};

use crate::{auth::AuthenticatedUser, dto::posts::CreatePostForm, error::ApiError, AppState};

/// Handle post submissions
#[utoipa::path(
    post,
    path = "/post",
    request_body(content = CreatePostForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Post stored and indexed"),
        (status = 401, description = "Missing or invalid bearer token", body = String),
        (status = 500, description = "Missing media or backing store failure", body = String)
    ),
    security(("bearer" = [])),
    tag = "posts"
)]
pub async fn create_post_handler<M, I>(
    State(state): State<AppState<M, I>>,
    AuthenticatedUser(principal): AuthenticatedUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    M: MediaStore + 'static,
    I: SearchIndex + 'static,
{
    let mut multipart = multipart?;
    let (form, media) = read_post_form(&mut multipart).await?;

    info!(
        user = %principal,
        message = %form.message,
        has_media = media.is_some(),
        "Received post request"
    );

    let post_id = state
        .ingestion_service
        .ingest(principal, form, media)
        .await?;

    info!(post_id = %post_id, "Successfully ingested post");

    Ok((StatusCode::OK, [(header::CONTENT_TYPE, "application/json")]))
}

/// Collect the text fields and the `image` attachment from the multipart body
///
/// Unknown fields are skipped. When `image` is sent more than once, the last
/// occurrence wins.
async fn read_post_form(
    multipart: &mut Multipart,
) -> Result<(PostForm, Option<MediaUpload>), ApiError> {
    let mut message = None;
    let mut lat = None;
    let mut lon = None;
    let mut media = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);

        match name.as_deref() {
            Some("message") => message = Some(field.text().await?),
            Some("lat") => lat = Some(field.text().await?),
            Some("lon") => lon = Some(field.text().await?),
            Some("image") => {
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;
                media = Some(MediaUpload::new(bytes, content_type));
            }
            other => debug!(field = ?other, "Ignoring unexpected form field"),
        }
    }

    let form = PostForm::from_fields(message, lat.as_deref(), lon.as_deref());
    Ok((form, media))
}
