//! Plugin selection and construction.

use crate::builtin;
use crate::chain::PluginChain;

/// Build the plugin chain for the configured plugin names.
///
/// Names are deduplicated and sorted bytewise so the dispatch order is
/// deterministic no matter how the configuration lists them. Unknown names
/// are logged and skipped.
#[must_use]
pub fn load_plugins(names: &[String]) -> PluginChain {
    let mut sorted: Vec<&str> = names.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    sorted.dedup();

    let mut chain = PluginChain::new();
    for name in sorted {
        match builtin::create(name) {
            Some(plugin) => {
                tracing::debug!(plugin = name, "Plugin registered");
                chain = chain.with(plugin);
            }
            None => tracing::warn!(plugin = name, "Unknown plugin, skipping"),
        }
    }
    chain
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_known_plugin() {
        let chain = load_plugins(&["autolink".to_owned()]);

        assert_eq!(chain.names(), vec!["autolink"]);
    }

    #[test]
    fn test_unknown_plugins_are_skipped() {
        let chain = load_plugins(&["nonexistent".to_owned(), "autolink".to_owned()]);

        assert_eq!(chain.names(), vec!["autolink"]);
    }

    #[test]
    fn test_duplicates_register_once() {
        let chain = load_plugins(&["autolink".to_owned(), "autolink".to_owned()]);

        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn test_empty_selection_yields_empty_chain() {
        let chain = load_plugins(&[]);

        assert!(chain.is_empty());
    }
}
