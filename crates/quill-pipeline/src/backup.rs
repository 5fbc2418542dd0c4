//! Timestamped backup rotation for overwritten files.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

/// Backup file name for `file_name` at `timestamp`.
///
/// The scheme is `~<name>_<ISO-8601 UTC seconds>.bak`, e.g.
/// `~page.md_2026-08-22T14:03:11.bak`. The leading tilde keeps backups
/// visually apart and lets the rest of the pipeline treat the namespace as
/// unpublishable.
#[must_use]
pub fn backup_file_name(file_name: &str, timestamp: &DateTime<Utc>) -> String {
    format!("~{file_name}_{}.bak", timestamp.format("%Y-%m-%dT%H:%M:%S"))
}

/// True when `file_name` belongs to the backup namespace.
#[must_use]
pub fn is_backup_name(file_name: &str) -> bool {
    file_name.starts_with('~') && file_name.ends_with(".bak")
}

/// Move `path` aside to a timestamped backup in the same directory.
///
/// Returns the backup path, or `None` when `path` does not exist (the
/// common first-publish case). Two rotations of the same file within one
/// second produce the same backup name and the second rename replaces the
/// first; callers that need finer retention must wait out the second.
///
/// # Errors
///
/// Returns the underlying I/O error for anything other than a missing
/// original.
pub fn rotate_if_exists(path: &Path) -> io::Result<Option<PathBuf>> {
    let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
        return Ok(None);
    };

    let backup = path.with_file_name(backup_file_name(file_name, &Utc::now()));
    match fs::rename(path, &backup) {
        Ok(()) => {
            tracing::debug!(
                original = %path.display(),
                backup = %backup.display(),
                "Rotated previous version"
            );
            Ok(Some(backup))
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}
