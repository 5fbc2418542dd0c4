//! External renderer invocation.

use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

/// Renderer failure.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Renderer binary could not be started.
    #[error("Failed to start renderer `{command}`: {source}")]
    Spawn {
        /// Command that failed to spawn.
        command: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Renderer exited non-zero (code -1 when killed by a signal).
    #[error("Renderer exited with code {code}: {stderr}")]
    Failed {
        /// Process exit code.
        code: i32,
        /// Captured standard error.
        stderr: String,
    },

    /// Renderer produced output that is not valid UTF-8.
    #[error("Renderer produced invalid UTF-8 output")]
    InvalidUtf8,
}

/// Converts a stored source document into servable HTML.
///
/// Implementations must be safe to share across threads; the publisher
/// invokes them while holding a per-name lock.
pub trait Renderer: Send + Sync {
    /// Render `source` with the given stylesheet references.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] if the renderer cannot be started, exits
    /// non-zero, or produces non-UTF8 output.
    fn render(&self, source: &Path, style_refs: &[String]) -> Result<String, RenderError>;
}

/// Renderer that shells out to an external converter.
///
/// Invokes `<command> --standalone --to <format> [--css <ref>]... <source>`
/// and captures stdout as the rendered document. Stylesheet references are
/// passed through in the order given.
pub struct CommandRenderer {
    command: String,
    format: String,
}

impl CommandRenderer {
    /// Create a renderer invoking `command` targeting `format`.
    #[must_use]
    pub fn new(command: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            format: format.into(),
        }
    }

    /// Argument list for one render call.
    fn build_args(&self, source: &Path, style_refs: &[String]) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            OsString::from("--standalone"),
            OsString::from("--to"),
            OsString::from(&self.format),
        ];
        for style in style_refs {
            args.push(OsString::from("--css"));
            args.push(OsString::from(style));
        }
        args.push(source.as_os_str().to_owned());
        args
    }
}

impl Default for CommandRenderer {
    /// Pandoc targeting standalone HTML5.
    fn default() -> Self {
        Self::new("pandoc", "html5")
    }
}

impl Renderer for CommandRenderer {
    fn render(&self, source: &Path, style_refs: &[String]) -> Result<String, RenderError> {
        let args = self.build_args(source, style_refs);
        tracing::debug!(command = %self.command, source = %source.display(), "Invoking renderer");

        let output = Command::new(&self.command)
            .args(args)
            .output()
            .map_err(|e| RenderError::Spawn {
                command: self.command.clone(),
                source: e,
            })?;

        if !output.status.success() {
            return Err(RenderError::Failed {
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        String::from_utf8(output.stdout).map_err(|_| RenderError::InvalidUtf8)
    }
}
