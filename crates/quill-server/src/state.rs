//! Application state.
//!
//! Shared state for all request handlers.

use std::sync::Arc;

use quill_pipeline::{MediaStore, Publisher};

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Publish pipeline for source documents.
    pub(crate) publisher: Arc<Publisher>,
    /// Store for uploaded media files.
    pub(crate) media: Arc<MediaStore>,
    /// Enable verbose output (log backup rotations per request).
    pub(crate) verbose: bool,
}
