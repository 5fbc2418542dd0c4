//! Router construction.
//!
//! Builds the axum router with the markup and media APIs plus the static
//! site fallback.

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get};

use crate::handlers;
use crate::state::AppState;
use crate::static_files;

/// Create the application router.
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route("/api/markup", get(handlers::sources::list_sources))
        .route(
            "/api/markup/{name}",
            get(handlers::sources::get_source)
                .put(handlers::sources::put_source)
                .delete(handlers::sources::delete_source),
        )
        .route(
            "/api/media",
            get(handlers::media::list_media).put(handlers::media::upload_media),
        )
        .route("/api/media/{name}", delete(handlers::media::delete_media));

    Router::new()
        .merge(api_routes)
        .fallback_service(static_files::site_service(state.publisher.publish_root()))
        .with_state(state)
}
