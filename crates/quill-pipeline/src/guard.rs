//! Path confinement for user-supplied document names.

use std::path::{Component, Path, PathBuf};

use crate::backup::is_backup_name;
use crate::error::PublishError;

/// Validates user-supplied names against a storage root.
///
/// Purely lexical: traversal components are rejected instead of
/// canonicalized, so resolution never touches the filesystem. Symlinks
/// placed inside the root are the operator's responsibility.
#[derive(Debug, Clone)]
pub struct PathGuard {
    root: PathBuf,
    reserved: Option<String>,
}

impl PathGuard {
    /// Create a guard for `root` with no reserved name.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            reserved: None,
        }
    }

    /// Reserve a name stem that can never be published or deleted.
    ///
    /// Matches the stem of the final segment, so reserving `manage` blocks
    /// `manage.md`, `manage.html` and `notes/manage.css` alike.
    #[must_use]
    pub fn with_reserved(mut self, stem: impl Into<String>) -> Self {
        self.reserved = Some(stem.into());
        self
    }

    /// The confined root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a name for reading. Applies only the confinement rules:
    /// empty names, NUL bytes, absolute paths and upward traversal are
    /// rejected.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::Forbidden`] when the name violates
    /// confinement.
    pub fn resolve_read(&self, name: &str) -> Result<PathBuf, PublishError> {
        if name.is_empty() || name.contains('\0') {
            return Err(forbidden(name));
        }

        let relative = Path::new(name);

        // Path::join replaces the base entirely for absolute arguments, so
        // any rooted or prefixed component must be rejected before joining.
        let escapes = relative.components().any(|component| {
            matches!(
                component,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
        if escapes {
            return Err(forbidden(name));
        }

        // Names like "." resolve to the root itself, not a file.
        if relative.file_name().is_none() {
            return Err(forbidden(name));
        }

        Ok(self.root.join(relative))
    }

    /// Resolve a name for mutation. Confinement plus the reserved stem and
    /// the backup namespace.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::Forbidden`] when the name violates any rule.
    pub fn resolve(&self, name: &str) -> Result<PathBuf, PublishError> {
        let path = self.resolve_read(name)?;

        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            return Err(forbidden(name));
        };

        if let Some(reserved) = &self.reserved {
            let stem = Path::new(file_name)
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or(file_name);
            if stem == reserved {
                return Err(forbidden(name));
            }
        }

        if is_backup_name(file_name) {
            return Err(forbidden(name));
        }

        Ok(path)
    }
}

fn forbidden(name: &str) -> PublishError {
    PublishError::Forbidden {
        name: name.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guard() -> PathGuard {
        PathGuard::new(PathBuf::from("/srv/markup")).with_reserved("manage")
    }

    #[test]
    fn test_resolve_simple_name() {
        let path = guard().resolve("page.md").unwrap();

        assert_eq!(path, PathBuf::from("/srv/markup/page.md"));
    }

    #[test]
    fn test_resolve_nested_name() {
        let path = guard().resolve("notes/page.md").unwrap();

        assert_eq!(path, PathBuf::from("/srv/markup/notes/page.md"));
    }

    #[test]
    fn test_rejects_parent_traversal() {
        assert!(matches!(
            guard().resolve("../evil.md"),
            Err(PublishError::Forbidden { .. })
        ));
        assert!(matches!(
            guard().resolve("notes/../../evil.md"),
            Err(PublishError::Forbidden { .. })
        ));
    }

    #[test]
    fn test_rejects_absolute_name() {
        assert!(guard().resolve("/etc/passwd").is_err());
    }

    #[test]
    fn test_rejects_empty_and_nul() {
        assert!(guard().resolve("").is_err());
        assert!(guard().resolve("pa\0ge.md").is_err());
    }

    #[test]
    fn test_rejects_bare_dot() {
        assert!(guard().resolve(".").is_err());
    }

    #[test]
    fn test_rejects_reserved_stem_any_extension() {
        assert!(guard().resolve("manage.md").is_err());
        assert!(guard().resolve("manage.html").is_err());
        assert!(guard().resolve("notes/manage.css").is_err());
    }

    #[test]
    fn test_reserved_match_is_exact() {
        // Longer stems sharing the prefix are fine.
        assert!(guard().resolve("management.md").is_ok());
        // Case-sensitive.
        assert!(guard().resolve("Manage.md").is_ok());
    }

    #[test]
    fn test_rejects_backup_names() {
        assert!(guard().resolve("~page.md_2026-01-02T03:04:05.bak").is_err());
    }

    #[test]
    fn test_tilde_without_bak_suffix_is_allowed() {
        assert!(guard().resolve("~scratch.md").is_ok());
    }

    #[test]
    fn test_resolve_read_skips_reserved_and_backup_rules() {
        let g = guard();

        assert!(g.resolve_read("manage.md").is_ok());
        assert!(g.resolve_read("~page.md_2026-01-02T03:04:05.bak").is_ok());
        // Confinement still applies.
        assert!(g.resolve_read("../evil.md").is_err());
        assert!(g.resolve_read("").is_err());
    }

    #[test]
    fn test_guard_without_reserved_allows_any_stem() {
        let g = PathGuard::new(PathBuf::from("/srv/media"));

        assert!(g.resolve("manage.png").is_ok());
    }
}
