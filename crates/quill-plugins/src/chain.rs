//! Ordered plugin dispatch.

use std::path::Path;

use crate::Plugin;

/// Ordered list of plugins sharing the two pipeline hook points.
///
/// Built once at startup and fixed afterwards. Dispatch is fail-open: a
/// failing hook is logged and aborts the remaining hooks of that stage,
/// never the publish call.
#[derive(Default)]
pub struct PluginChain {
    plugins: Vec<Box<dyn Plugin>>,
}

impl PluginChain {
    /// Create an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a plugin to the end of the chain.
    #[must_use]
    pub fn with(mut self, plugin: Box<dyn Plugin>) -> Self {
        self.plugins.push(plugin);
        self
    }

    /// Number of registered plugins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// True when no plugins are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Registered plugin names in dispatch order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    /// Run the pre-publish hooks.
    ///
    /// Each plugin receives the previous plugin's output. The first failure
    /// aborts the remaining hooks and the accumulated rewrite up to that
    /// point is returned.
    #[must_use]
    pub fn run_pre(&self, name: String, content: Vec<u8>) -> (String, Vec<u8>) {
        let mut current = (name, content);
        for plugin in &self.plugins {
            match plugin.pre_publish(current.0.clone(), current.1.clone()) {
                Ok(next) => current = next,
                Err(error) => {
                    tracing::warn!(
                        plugin = plugin.name(),
                        %error,
                        "Pre-publish hook failed, keeping last successful rewrite"
                    );
                    break;
                }
            }
        }
        current
    }

    /// Run the post-publish hooks.
    ///
    /// The first failure aborts the remaining hooks.
    pub fn run_post(&self, source_path: &Path, artifact_path: &Path) {
        for plugin in &self.plugins {
            if let Err(error) = plugin.post_publish(source_path, artifact_path) {
                tracing::warn!(
                    plugin = plugin.name(),
                    %error,
                    "Post-publish hook failed, skipping remaining hooks"
                );
                break;
            }
        }
    }
}
