//! Unstructured media storage.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::backup::{is_backup_name, rotate_if_exists};
use crate::guard::PathGuard;
use crate::locks::NameLocks;

/// Media storage failure.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    /// Name escapes the media root or addresses the backup namespace.
    #[error("Name not allowed: {name}")]
    Forbidden {
        /// Offending name.
        name: String,
    },

    /// No media file stored under this name.
    #[error("Not found: {name}")]
    NotFound {
        /// Requested name.
        name: String,
    },

    /// Underlying filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Outcome of one successful media store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMedia {
    /// Stored name.
    pub name: String,
    /// Stored file.
    pub path: PathBuf,
    /// Backup taken of the previous content, if one existed.
    pub backup: Option<PathBuf>,
}

/// Byte store for uploaded files, outside the render pipeline.
///
/// Shares the naming rules, backup rotation, and per-path locking of the
/// publish pipeline, but performs no classification and no rendering.
/// There is no reserved name for media.
pub struct MediaStore {
    guard: PathGuard,
    locks: NameLocks,
}

impl MediaStore {
    /// Create a store rooted at `root`.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self {
            guard: PathGuard::new(root),
            locks: NameLocks::default(),
        }
    }

    /// Directory media files are stored in.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.guard.root()
    }

    fn resolve(&self, name: &str) -> Result<PathBuf, MediaError> {
        self.guard.resolve(name).map_err(|_| MediaError::Forbidden {
            name: name.to_owned(),
        })
    }

    /// Store `content` under `name`, rotating any existing file to a
    /// backup first.
    ///
    /// # Errors
    ///
    /// Returns [`MediaError::Forbidden`] for invalid names and
    /// [`MediaError::Io`] for filesystem errors.
    pub fn store(&self, name: &str, content: &[u8]) -> Result<StoredMedia, MediaError> {
        let path = self.resolve(name)?;

        let lock = self.locks.entry(&path);
        let _guard = lock.lock().unwrap();

        let backup = rotate_if_exists(&path)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        tracing::info!(name = %name, bytes = content.len(), "Stored media file");

        Ok(StoredMedia {
            name: name.to_owned(),
            path,
            backup,
        })
    }

    /// Names of all media files, sorted. Backups and directories are
    /// skipped; a missing root lists as empty.
    ///
    /// # Errors
    ///
    /// Returns [`MediaError::Io`] when the directory cannot be read.
    pub fn list(&self) -> Result<Vec<String>, MediaError> {
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
            if is_backup_name(&name) {
                continue;
            }
            names.push(name);
        }
        names.sort_unstable();
        Ok(names)
    }

    /// Remove the media file stored under `name`. Backups stay in place.
    ///
    /// # Errors
    ///
    /// Returns [`MediaError::Forbidden`] for invalid names,
    /// [`MediaError::NotFound`] when nothing is stored under `name`, and
    /// [`MediaError::Io`] for other filesystem errors.
    pub fn remove(&self, name: &str) -> Result<(), MediaError> {
        let path = self.resolve(name)?;

        let lock = self.locks.entry(&path);
        let _guard = lock.lock().unwrap();

        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::info!(name = %name, "Removed media file");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(MediaError::NotFound {
                name: name.to_owned(),
            }),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn store_in(dir: &Path) -> MediaStore {
        MediaStore::new(dir.join("media"))
    }

    #[test]
    fn test_store_writes_bytes_under_root() {
        let dir = tempfile::tempdir().unwrap();
        let media = store_in(dir.path());

        let stored = media.store("logo.png", b"\x89PNG").unwrap();

        assert_eq!(stored.name, "logo.png");
        assert_eq!(stored.path, dir.path().join("media/logo.png"));
        assert_eq!(stored.backup, None);
        assert_eq!(fs::read(&stored.path).unwrap(), b"\x89PNG");
    }

    #[test]
    fn test_overwrite_rotates_backup() {
        let dir = tempfile::tempdir().unwrap();
        let media = store_in(dir.path());
        media.store("logo.png", b"v1").unwrap();

        let stored = media.store("logo.png", b"v2").unwrap();

        let backup = stored.backup.expect("overwrite rotates a backup");
        let backup_name = backup.file_name().unwrap().to_str().unwrap();
        assert!(backup_name.starts_with("~logo.png_"));
        assert!(backup_name.ends_with(".bak"));
        assert_eq!(fs::read(&backup).unwrap(), b"v1");
        assert_eq!(fs::read(&stored.path).unwrap(), b"v2");
    }

    #[test]
    fn test_traversal_is_forbidden() {
        let dir = tempfile::tempdir().unwrap();
        let media = store_in(dir.path());

        let err = media.store("../escape.png", b"x").unwrap_err();

        assert!(matches!(err, MediaError::Forbidden { .. }));
        assert!(!dir.path().join("escape.png").exists());
    }

    #[test]
    fn test_backup_namespace_is_forbidden() {
        let dir = tempfile::tempdir().unwrap();
        let media = store_in(dir.path());

        let err = media.store("~logo.png_x.bak", b"x").unwrap_err();

        assert!(matches!(err, MediaError::Forbidden { .. }));
    }

    #[test]
    fn test_media_has_no_reserved_names() {
        let dir = tempfile::tempdir().unwrap();
        let media = store_in(dir.path());

        media.store("management.png", b"x").unwrap();

        assert_eq!(media.list().unwrap(), vec!["management.png".to_owned()]);
    }

    #[test]
    fn test_list_skips_backups_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        let media = store_in(dir.path());
        media.store("b.png", b"1").unwrap();
        media.store("a.svg", b"2").unwrap();
        media.store("b.png", b"3").unwrap();

        let names = media.list().unwrap();

        assert_eq!(names, vec!["a.svg".to_owned(), "b.png".to_owned()]);
    }

    #[test]
    fn test_list_on_missing_root_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let media = store_in(dir.path());

        assert_eq!(media.list().unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_remove_deletes_file() {
        let dir = tempfile::tempdir().unwrap();
        let media = store_in(dir.path());
        let stored = media.store("logo.png", b"x").unwrap();

        media.remove("logo.png").unwrap();

        assert!(!stored.path.exists());
    }

    #[test]
    fn test_remove_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let media = store_in(dir.path());

        let err = media.remove("ghost.png").unwrap_err();

        assert!(matches!(err, MediaError::NotFound { .. }));
    }
}
