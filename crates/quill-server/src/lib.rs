//! HTTP server for the wiki publish pipeline.
//!
//! Exposes the REST API for markup sources and media files and serves the
//! published site as static content:
//!
//! ```text
//! PUT /api/markup/{name} ---> Publisher ---> source dir
//!                                |
//!                                v renderer
//!                            publish dir <--- PUT /api/media (multipart)
//!                                |
//!                                v
//!                        GET /* (static fallback)
//! ```
//!
//! The server owns process wiring only. All path and content rules live in
//! `quill_pipeline`.

mod app;
mod error;
mod handlers;
mod state;
mod static_files;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use quill_pipeline::{CommandRenderer, MediaStore, Publisher, PublisherConfig, Renderer};
use quill_plugins::load_plugins;

use crate::state::AppState;

/// Runtime settings for the wiki server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Directory holding the markup sources
    pub source_dir: PathBuf,
    /// Directory the rendered site is published to
    pub publish_dir: PathBuf,
    /// Directory media uploads are stored in
    pub media_dir: PathBuf,
    /// Page stem the API refuses to touch
    pub reserved_name: String,
    /// Renderer executable invoked for markup sources
    pub renderer_command: String,
    /// Plugins to enable, in execution order
    pub plugins: Vec<String>,
    /// Enable verbose request logging
    pub verbose: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8081,
            source_dir: PathBuf::from("markup"),
            publish_dir: PathBuf::from("www"),
            media_dir: PathBuf::from("www/media"),
            reserved_name: "manage".to_owned(),
            renderer_command: "pandoc".to_owned(),
            plugins: Vec::new(),
            verbose: false,
        }
    }
}

/// Build a [`ServerConfig`] from a loaded quill configuration.
#[must_use]
pub fn server_config_from_config(config: &quill_config::Config, verbose: bool) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        source_dir: config.site_resolved.source_dir.clone(),
        publish_dir: config.site_resolved.publish_dir.clone(),
        media_dir: config.site_resolved.media_dir(),
        reserved_name: config.site_resolved.reserved_name.clone(),
        renderer_command: config.renderer.command.clone(),
        plugins: config.plugins.enabled.clone(),
        verbose,
    }
}

/// Start the wiki server and block until shutdown.
///
/// Creates the source, publish and media directories if they are missing,
/// then serves the API and the published site until Ctrl+C.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(&config.source_dir)?;
    std::fs::create_dir_all(&config.publish_dir)?;
    std::fs::create_dir_all(&config.media_dir)?;

    let renderer: Arc<dyn Renderer> =
        Arc::new(CommandRenderer::new(config.renderer_command.clone(), "html5"));
    let plugins = Arc::new(load_plugins(&config.plugins));
    let publisher = Arc::new(Publisher::new(
        PublisherConfig {
            source_root: config.source_dir.clone(),
            publish_root: config.publish_dir.clone(),
            reserved_name: Some(config.reserved_name.clone()),
        },
        renderer,
        plugins,
    ));
    let media = Arc::new(MediaStore::new(config.media_dir.clone()));
    let state = Arc::new(AppState {
        publisher,
        media,
        verbose: config.verbose,
    });

    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, site = %config.publish_dir.display(), "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}
