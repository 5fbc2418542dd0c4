//! Error type for publish and delete.

use crate::render::RenderError;

/// Publish pipeline error.
///
/// The set is closed on purpose: HTTP and CLI layers map these variants to
/// user-facing responses without inspecting inner details.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// Name escapes the root, is reserved, or addresses the backup
    /// namespace.
    #[error("Name not allowed: {name}")]
    Forbidden {
        /// Offending document name.
        name: String,
    },

    /// Extension is not in the supported set.
    #[error("File type not supported: {name}")]
    UnsupportedType {
        /// Offending document name.
        name: String,
    },

    /// The external renderer failed; the source write is kept.
    #[error("Render failed: {0}")]
    RenderFailed(#[from] RenderError),

    /// No stored source under the name.
    #[error("Not found: {name}")]
    NotFound {
        /// Missing document name.
        name: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_forbidden() {
        let err = PublishError::Forbidden {
            name: "../etc/passwd".to_owned(),
        };

        assert_eq!(err.to_string(), "Name not allowed: ../etc/passwd");
    }

    #[test]
    fn test_display_unsupported() {
        let err = PublishError::UnsupportedType {
            name: "a.exe".to_owned(),
        };

        assert_eq!(err.to_string(), "File type not supported: a.exe");
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = PublishError::from(io);

        assert!(matches!(err, PublishError::Io(_)));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PublishError>();
    }
}
