//! Publish pipeline for the Quill wiki engine.
//!
//! Takes an incoming (name, content) pair and turns it into a servable
//! artifact:
//!
//! ```text
//! publish(name, content)
//!     │
//!     ├─► plugin pre hooks (may rewrite name and content)
//!     ├─► PathGuard (traversal, reserved name, backup namespace)
//!     ├─► per-name lock ──────────────────────────────┐
//!     ├─► backup rotation of the previous version     │ exclusive
//!     ├─► source write                                │ section
//!     ├─► render (markup) or byte copy (passthrough)  │
//!     ├─► artifact write ─────────────────────────────┘
//!     └─► plugin post hooks (observe)
//! ```
//!
//! The crate provides:
//! - [`Publisher`] orchestrating publish and delete with per-name locking
//! - [`PathGuard`] for lexical path confinement
//! - [`Renderer`] trait with the external-converter [`CommandRenderer`]
//! - [`MockRenderer`] for testing (behind the `mock` feature)
//! - [`MediaStore`] for unstructured uploads outside the render pipeline

mod backup;
mod error;
mod guard;
mod kind;
mod locks;
mod media;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
mod publish;
mod render;

pub use backup::{backup_file_name, is_backup_name, rotate_if_exists};
pub use error::PublishError;
pub use guard::PathGuard;
pub use kind::{ContentKind, artifact_name};
pub use media::{MediaError, MediaStore, StoredMedia};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockRenderer;
pub use publish::{Published, Publisher, PublisherConfig};
pub use render::{CommandRenderer, RenderError, Renderer};
