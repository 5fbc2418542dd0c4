//! Built-in plugins.
//!
//! Compiled into the binary and selected by name through the `[plugins]`
//! configuration section.

mod autolink;

pub use autolink::AutolinkPlugin;

use crate::Plugin;

/// Construct a built-in plugin by name.
///
/// Returns `None` for names that do not match any built-in.
#[must_use]
pub fn create(name: &str) -> Option<Box<dyn Plugin>> {
    match name {
        autolink::NAME => Some(Box::new(AutolinkPlugin::new())),
        _ => None,
    }
}
