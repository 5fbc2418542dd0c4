//! `quill serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use quill_config::{CliSettings, Config};
use quill_server::{run_server, server_config_from_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover quill.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Markup source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Publish directory for the rendered site (overrides config).
    #[arg(long)]
    publish_dir: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Renderer executable (overrides config).
    #[arg(long)]
    renderer: Option<String>,

    /// Enable verbose output (show request and backup logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        // Build CLI settings from args
        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            source_dir: self.source_dir,
            publish_dir: self.publish_dir,
            renderer_command: self.renderer,
        };

        // Load config
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        // Print startup info
        match &config.config_path {
            Some(path) => output.info(&format!("Configuration: {}", path.display())),
            None => output.warning("No quill.toml found, using defaults"),
        }
        output.info(&format!(
            "Starting server on {}:{}",
            config.server.host, config.server.port
        ));
        output.info(&format!(
            "Source directory: {}",
            config.site_resolved.source_dir.display()
        ));
        output.info(&format!(
            "Publish directory: {}",
            config.site_resolved.publish_dir.display()
        ));
        if config.plugins.enabled.is_empty() {
            output.info("Plugins: none");
        } else {
            output.info(&format!("Plugins: {}", config.plugins.enabled.join(", ")));
        }

        // Build server config and run
        let server_config = server_config_from_config(&config, self.verbose);
        run_server(server_config)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }
}
