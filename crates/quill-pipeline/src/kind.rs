//! Content-kind classification by file extension.

use std::path::{Path, PathBuf};

/// Extensions converted to HTML by the external renderer.
const MARKUP_EXTENSIONS: [&str; 4] = ["md", "rst", "txt", "html"];

/// Extensions copied verbatim into the publish root.
const PASSTHROUGH_EXTENSIONS: [&str; 1] = ["css"];

/// How a source document becomes a published artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// Rendered to HTML by the external renderer.
    Markup,
    /// Copied byte-for-byte under its original name.
    Passthrough,
}

impl ContentKind {
    /// Classify a document name by extension, `None` when unsupported.
    ///
    /// Extensions are matched case-sensitively; `PAGE.MD` is not a markup
    /// document.
    #[must_use]
    pub fn classify(name: &str) -> Option<Self> {
        let ext = Path::new(name).extension()?.to_str()?;
        if MARKUP_EXTENSIONS.contains(&ext) {
            Some(Self::Markup)
        } else if PASSTHROUGH_EXTENSIONS.contains(&ext) {
            Some(Self::Passthrough)
        } else {
            None
        }
    }

    /// Lowercase label for logs and responses.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Markup => "markup",
            Self::Passthrough => "passthrough",
        }
    }
}

/// Relative artifact name for a source name.
///
/// Markup kinds publish under `.html`; passthrough kinds keep their name.
#[must_use]
pub fn artifact_name(name: &str, kind: ContentKind) -> PathBuf {
    match kind {
        ContentKind::Markup => Path::new(name).with_extension("html"),
        ContentKind::Passthrough => PathBuf::from(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_markup_extensions() {
        for name in ["a.md", "a.rst", "a.txt", "a.html"] {
            assert_eq!(ContentKind::classify(name), Some(ContentKind::Markup));
        }
    }

    #[test]
    fn test_classify_passthrough() {
        assert_eq!(ContentKind::classify("style.css"), Some(ContentKind::Passthrough));
    }

    #[test]
    fn test_classify_unsupported() {
        assert_eq!(ContentKind::classify("image.png"), None);
        assert_eq!(ContentKind::classify("script.exe"), None);
        assert_eq!(ContentKind::classify("no_extension"), None);
    }

    #[test]
    fn test_classify_is_case_sensitive() {
        assert_eq!(ContentKind::classify("PAGE.MD"), None);
    }

    #[test]
    fn test_artifact_name_markup_becomes_html() {
        assert_eq!(
            artifact_name("page.md", ContentKind::Markup),
            PathBuf::from("page.html")
        );
        assert_eq!(
            artifact_name("notes/page.rst", ContentKind::Markup),
            PathBuf::from("notes/page.html")
        );
    }

    #[test]
    fn test_artifact_name_keeps_last_extension_only() {
        assert_eq!(
            artifact_name("a.b.md", ContentKind::Markup),
            PathBuf::from("a.b.html")
        );
    }

    #[test]
    fn test_artifact_name_passthrough_unchanged() {
        assert_eq!(
            artifact_name("style.css", ContentKind::Passthrough),
            PathBuf::from("style.css")
        );
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(ContentKind::Markup.as_str(), "markup");
        assert_eq!(ContentKind::Passthrough.as_str(), "passthrough");
    }
}
