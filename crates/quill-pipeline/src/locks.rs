//! Per-path exclusive locks.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Lock table keyed by resolved source path.
///
/// Each path maps to one shared mutex; holding its guard serializes all
/// pipeline operations on that document while leaving other documents
/// untouched. Entries are never removed, the table only grows with the
/// set of documents ever touched.
#[derive(Debug, Default)]
pub(crate) struct NameLocks {
    entries: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl NameLocks {
    /// Lock handle for `path`, created on first use.
    ///
    /// The caller binds the returned `Arc` and locks it; the registry
    /// lock is only held while looking up the entry.
    pub(crate) fn entry(&self, path: &Path) -> Arc<Mutex<()>> {
        let mut entries = self.entries.lock().unwrap();
        Arc::clone(entries.entry(path.to_path_buf()).or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_path_shares_one_lock() {
        let locks = NameLocks::default();

        let first = locks.entry(Path::new("a/page.md"));
        let second = locks.entry(Path::new("a/page.md"));

        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_different_paths_get_distinct_locks() {
        let locks = NameLocks::default();

        let first = locks.entry(Path::new("a.md"));
        let second = locks.entry(Path::new("b.md"));

        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_lock_can_be_retaken_after_release() {
        let locks = NameLocks::default();
        let handle = locks.entry(Path::new("a.md"));

        drop(handle.lock().unwrap());
        let guard = handle.lock().unwrap();

        drop(guard);
    }
}
