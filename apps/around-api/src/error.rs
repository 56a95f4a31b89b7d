//! HTTP error mapping
//!
//! Authentication problems answer `401`; every other failure is a server
//! fault answered with `500` and the error text as a plain-text body.

use around_domain::{IngestionError, SearchError};
use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::typed_header::TypedHeaderRejection;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authorization header was missing or invalid: {0}")]
    InvalidAuthorizationHeader(#[from] TypedHeaderRejection),
    #[error("Provided token was invalid: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
    #[error("Provided token does not name a user")]
    MissingPrincipal,
    #[error("Request body is not a multipart form: {0}")]
    MultipartRejected(#[from] MultipartRejection),
    #[error("Multipart body could not be read: {0}")]
    Multipart(#[from] MultipartError),
    #[error(transparent)]
    Ingestion(#[from] IngestionError),
    #[error(transparent)]
    Search(#[from] SearchError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidAuthorizationHeader(_)
            | ApiError::InvalidToken(_)
            | ApiError::MissingPrincipal => StatusCode::UNAUTHORIZED,
            ApiError::MultipartRejected(_)
            | ApiError::Multipart(_)
            | ApiError::Ingestion(_)
            | ApiError::Search(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            error!(error = %self, %status, "Replying with error");
        } else {
            warn!(error = %self, %status, "Rejecting request");
        }

        (status, self.to_string()).into_response()
    }
}
