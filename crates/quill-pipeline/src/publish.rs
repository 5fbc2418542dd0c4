//! Publish pipeline orchestration.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use quill_plugins::PluginChain;

use crate::backup::{is_backup_name, rotate_if_exists};
use crate::error::PublishError;
use crate::guard::PathGuard;
use crate::kind::{ContentKind, artifact_name};
use crate::locks::NameLocks;
use crate::render::Renderer;

/// Outcome of one successful publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    /// Final document name, after plugin rewrites.
    pub name: String,
    /// Stored source file.
    pub source_path: PathBuf,
    /// Servable artifact file.
    pub artifact_path: PathBuf,
    /// How the document was processed.
    pub kind: ContentKind,
    /// Backup taken of the previous source, if one existed.
    pub backup: Option<PathBuf>,
}

/// Publisher construction parameters.
#[derive(Debug, Clone)]
pub struct PublisherConfig {
    /// Directory holding editable source documents.
    pub source_root: PathBuf,
    /// Directory holding servable artifacts.
    pub publish_root: PathBuf,
    /// File stem that may never be written or deleted.
    pub reserved_name: Option<String>,
}

/// Publish pipeline: validates names, stores sources, rotates backups,
/// renders artifacts, and notifies plugins.
///
/// All operations on the same document are serialized through a per-path
/// lock; operations on distinct documents proceed concurrently. The
/// publisher is shared behind an [`Arc`] by server handlers.
pub struct Publisher {
    publish_root: PathBuf,
    guard: PathGuard,
    renderer: Arc<dyn Renderer>,
    plugins: Arc<PluginChain>,
    locks: NameLocks,
}

impl Publisher {
    /// Create a publisher over the configured roots.
    #[must_use]
    pub fn new(
        config: PublisherConfig,
        renderer: Arc<dyn Renderer>,
        plugins: Arc<PluginChain>,
    ) -> Self {
        let guard = match config.reserved_name.as_deref() {
            Some(stem) => PathGuard::new(config.source_root).with_reserved(stem),
            None => PathGuard::new(config.source_root),
        };
        Self {
            publish_root: config.publish_root,
            guard,
            renderer,
            plugins,
            locks: NameLocks::default(),
        }
    }

    /// Directory the rendered site is served from.
    #[must_use]
    pub fn publish_root(&self) -> &Path {
        &self.publish_root
    }

    /// Store `content` under `name` and regenerate its artifact.
    ///
    /// Pre-publish plugins run first and may rewrite both name and
    /// content; validation applies to the rewritten name. An existing
    /// source is rotated to a backup before the new content lands.
    /// Markup documents are rendered to HTML, passthrough documents are
    /// copied verbatim. A render failure leaves the already written
    /// source (and its backup) in place.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::Forbidden`] for names that escape the
    /// source root, are reserved, or address the backup namespace;
    /// [`PublishError::UnsupportedType`] for unknown extensions;
    /// [`PublishError::RenderFailed`] when the renderer fails; and
    /// [`PublishError::Io`] for filesystem errors.
    pub fn publish(&self, name: &str, content: Vec<u8>) -> Result<Published, PublishError> {
        let (name, content) = self.plugins.run_pre(name.to_owned(), content);

        let source_path = self.guard.resolve(&name)?;
        let Some(kind) = ContentKind::classify(&name) else {
            return Err(PublishError::UnsupportedType { name });
        };
        let artifact_path = self.publish_root.join(artifact_name(&name, kind));

        let lock = self.locks.entry(&source_path);
        let _guard = lock.lock().unwrap();

        let backup = rotate_if_exists(&source_path)?;
        if let Some(parent) = source_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&source_path, &content)?;
        tracing::debug!(name = %name, bytes = content.len(), "Stored source document");

        match kind {
            ContentKind::Markup => {
                let style_refs = self.style_refs()?;
                let html = self
                    .renderer
                    .render(&source_path, &style_refs)
                    .map_err(|error| {
                        tracing::warn!(name = %name, %error, "Render failed, keeping stored source");
                        error
                    })?;
                self.write_artifact(&artifact_path, html.as_bytes())?;
            }
            ContentKind::Passthrough => {
                self.write_artifact(&artifact_path, &content)?;
            }
        }
        tracing::info!(name = %name, kind = kind.as_str(), "Published document");

        self.plugins.run_post(&source_path, &artifact_path);

        Ok(Published {
            name,
            source_path,
            artifact_path,
            kind,
            backup,
        })
    }

    /// Remove a document's artifact and source.
    ///
    /// The artifact is removed first and may already be absent, e.g.
    /// after a failed render. Backups are left in place.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::Forbidden`] for invalid names,
    /// [`PublishError::NotFound`] when no source exists, and
    /// [`PublishError::Io`] for other filesystem errors.
    pub fn delete(&self, name: &str) -> Result<(), PublishError> {
        let source_path = self.guard.resolve(name)?;

        let lock = self.locks.entry(&source_path);
        let _guard = lock.lock().unwrap();

        let artifact_path = match ContentKind::classify(name) {
            Some(kind) => self.publish_root.join(artifact_name(name, kind)),
            None => self.publish_root.join(name),
        };
        match fs::remove_file(&artifact_path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        match fs::remove_file(&source_path) {
            Ok(()) => {
                tracing::info!(name = %name, "Deleted document");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(PublishError::NotFound {
                name: name.to_owned(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Names of all publishable documents in the source root, sorted.
    ///
    /// Backups, directories, and files with unsupported extensions are
    /// skipped. A missing source root lists as empty.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::Io`] when the directory cannot be read.
    pub fn list(&self) -> Result<Vec<String>, PublishError> {
        let entries = match fs::read_dir(self.guard.root()) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if is_backup_name(&name) || ContentKind::classify(&name).is_none() {
                continue;
            }
            names.push(name);
        }
        names.sort_unstable();
        Ok(names)
    }

    /// Raw source bytes for `name`.
    ///
    /// Reads resolve reserved and backup names too so stored documents
    /// stay inspectable.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::Forbidden`] for names that escape the
    /// source root, [`PublishError::NotFound`] for missing documents,
    /// and [`PublishError::Io`] for other filesystem errors.
    pub fn read_source(&self, name: &str) -> Result<Vec<u8>, PublishError> {
        let path = self.guard.resolve_read(name)?;

        let lock = self.locks.entry(&path);
        let _guard = lock.lock().unwrap();

        match fs::read(&path) {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(PublishError::NotFound {
                name: name.to_owned(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Stylesheet file names in the source root, sorted.
    ///
    /// Passthrough publishing keeps a copy of every stylesheet in the
    /// publish root under the same name, so the references resolve when
    /// the rendered page is served.
    fn style_refs(&self) -> io::Result<Vec<String>> {
        let entries = match fs::read_dir(self.guard.root()) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut refs = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if Path::new(&name).extension().is_some_and(|ext| ext == "css") {
                refs.push(name);
            }
        }
        refs.sort_unstable();
        Ok(refs)
    }

    fn write_artifact(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, bytes)
    }
}
