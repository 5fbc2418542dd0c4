//! Error types for the HTTP server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use quill_pipeline::{MediaError, PublishError};
use serde_json::json;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ServerError {
    /// Error from the publish pipeline.
    #[error(transparent)]
    Publish(#[from] PublishError),

    /// Error from the media store.
    #[error(transparent)]
    Media(#[from] MediaError),

    /// Multipart upload could not be read.
    #[error("Invalid upload: {0}")]
    Upload(String),

    /// Offloaded pipeline task did not complete.
    #[error("Task join error: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::Publish(PublishError::Forbidden { name })
            | Self::Media(MediaError::Forbidden { name }) => (
                StatusCode::FORBIDDEN,
                json!({"error": "not allowed", "name": name}),
            ),
            Self::Publish(PublishError::UnsupportedType { name }) => (
                StatusCode::BAD_REQUEST,
                json!({"error": "file type not supported", "name": name}),
            ),
            Self::Publish(PublishError::RenderFailed(e)) => (
                StatusCode::BAD_REQUEST,
                json!({"error": "error in source", "detail": e.to_string()}),
            ),
            Self::Publish(PublishError::NotFound { name })
            | Self::Media(MediaError::NotFound { name }) => (
                StatusCode::NOT_FOUND,
                json!({"error": "not found", "name": name}),
            ),
            Self::Publish(PublishError::Io(e)) | Self::Media(MediaError::Io(e)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"error": e.to_string()}),
            ),
            Self::Upload(message) => (StatusCode::BAD_REQUEST, json!({"error": message})),
            Self::Join(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"error": e.to_string()}),
            ),
        };

        (status, axum::Json(body)).into_response()
    }
}
