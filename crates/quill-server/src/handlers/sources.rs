//! Markup source API endpoints.
//!
//! Sources are edited through this API and served back as rendered HTML
//! by the static site fallback.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::error::ServerError;
use crate::state::AppState;

/// Request body for PUT /api/markup/{name}.
#[derive(Debug, Deserialize)]
pub(crate) struct SourceData {
    /// Markup source text.
    pub(crate) data: String,
}

/// Response for PUT /api/markup/{name}.
#[derive(Debug, Serialize)]
pub(crate) struct PublishedResponse {
    /// Final document name, after plugin rewrites.
    name: String,
    /// How the document was processed ("markup" or "passthrough").
    kind: &'static str,
    /// Whether the previous version was rotated to a backup.
    backup: bool,
}

/// Handle GET /api/markup.
pub(crate) async fn list_sources(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<String>>, ServerError> {
    let names = tokio::task::spawn_blocking(move || state.publisher.list()).await??;
    Ok(Json(names))
}

/// Handle GET /api/markup/{name}.
pub(crate) async fn get_source(
    Path(name): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<String>, ServerError> {
    let bytes =
        tokio::task::spawn_blocking(move || state.publisher.read_source(&name)).await??;
    Ok(Json(String::from_utf8_lossy(&bytes).into_owned()))
}

/// Handle PUT /api/markup/{name}.
pub(crate) async fn put_source(
    Path(name): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(source): Json<SourceData>,
) -> Result<Json<PublishedResponse>, ServerError> {
    let verbose = state.verbose;
    let published = tokio::task::spawn_blocking(move || {
        state.publisher.publish(&name, source.data.into_bytes())
    })
    .await??;

    if verbose && let Some(backup) = &published.backup {
        tracing::info!(name = %published.name, backup = %backup.display(), "Rotated backup");
    }

    Ok(Json(PublishedResponse {
        name: published.name,
        kind: published.kind.as_str(),
        backup: published.backup.is_some(),
    }))
}

/// Handle DELETE /api/markup/{name}.
pub(crate) async fn delete_source(
    Path(name): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<StatusCode, ServerError> {
    tokio::task::spawn_blocking(move || state.publisher.delete(&name)).await??;
    Ok(StatusCode::OK)
}
