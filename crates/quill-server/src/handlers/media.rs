//! Media API endpoints.
//!
//! Uploaded files land in the media directory inside the published site,
//! so the static fallback serves them without further routing.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;

use crate::error::ServerError;
use crate::state::AppState;

/// Handle GET /api/media.
pub(crate) async fn list_media(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<String>>, ServerError> {
    let names = tokio::task::spawn_blocking(move || state.media.list()).await??;
    Ok(Json(names))
}

/// Handle PUT /api/media.
///
/// Accepts any number of files in one multipart request; each is stored
/// under its client-supplied file name. The request fails on the first
/// invalid entry, keeping files already stored.
pub(crate) async fn upload_media(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<Vec<String>>, ServerError> {
    let mut stored = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::Upload(e.to_string()))?
    {
        let Some(file_name) = field.file_name().map(ToOwned::to_owned) else {
            tracing::debug!("Skipping multipart field without file name");
            continue;
        };
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ServerError::Upload(e.to_string()))?;

        let media = Arc::clone(&state.media);
        let name = file_name.clone();
        tokio::task::spawn_blocking(move || media.store(&name, &bytes)).await??;
        stored.push(file_name);
    }
    Ok(Json(stored))
}

/// Handle DELETE /api/media/{name}.
pub(crate) async fn delete_media(
    Path(name): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<StatusCode, ServerError> {
    tokio::task::spawn_blocking(move || state.media.remove(&name)).await??;
    Ok(StatusCode::OK)
}
