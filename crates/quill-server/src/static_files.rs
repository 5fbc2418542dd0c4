//! Static site serving.
//!
//! The published site (rendered pages, stylesheets, media) is served as
//! the router fallback, with `index.html` directory defaulting.

use std::path::Path;

use tower_http::services::ServeDir;

/// File service over the publish root.
pub(crate) fn site_service(publish_root: &Path) -> ServeDir {
    ServeDir::new(publish_root).append_index_html_on_directories(true)
}
