//! Plugin chain for the Quill wiki engine.
//!
//! A plugin is a capability object with two optional hook points in the
//! publish pipeline:
//!
//! - [`Plugin::pre_publish`] may rewrite the document name and content
//!   before anything is written.
//! - [`Plugin::post_publish`] observes the stored source and the written
//!   artifact after a successful publish.
//!
//! Hooks run in a fixed order through a [`PluginChain`]. A failing hook
//! aborts the remaining hooks of the same stage and is logged; it never
//! fails the publish call itself.
//!
//! # Example
//!
//! ```ignore
//! use quill_plugins::load_plugins;
//!
//! let chain = load_plugins(&["autolink".to_owned()]);
//! let (name, content) = chain.run_pre("note.md".to_owned(), b"hello".to_vec());
//! ```

pub mod builtin;
mod chain;
mod registry;

pub use chain::PluginChain;
pub use registry::load_plugins;

use std::path::Path;

/// Reason a plugin hook gave up.
///
/// Never propagated past the chain; the dispatch loop logs it and moves on.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct PluginError(String);

impl PluginError {
    /// Create a plugin error from a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// A publish pipeline extension.
///
/// Both hooks default to no-ops so a plugin implements only the stage it
/// cares about.
pub trait Plugin: Send + Sync {
    /// Identifier used for configuration and logging.
    fn name(&self) -> &'static str;

    /// Rewrite the document before it is stored.
    ///
    /// Receives the output of the previous plugin in the chain. Returning
    /// an error aborts this and the remaining pre hooks; the pipeline
    /// continues with the last successful rewrite.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError`] when the rewrite cannot be applied.
    fn pre_publish(
        &self,
        name: String,
        content: Vec<u8>,
    ) -> Result<(String, Vec<u8>), PluginError> {
        Ok((name, content))
    }

    /// Observe the stored source and the written artifact.
    ///
    /// Returning an error aborts the remaining post hooks; the publish call
    /// still succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError`] when the observation fails.
    fn post_publish(&self, source_path: &Path, artifact_path: &Path) -> Result<(), PluginError> {
        let _ = (source_path, artifact_path);
        Ok(())
    }
}
