//! Scripted renderer for tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use crate::render::{RenderError, Renderer};

/// One recorded render invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderCall {
    /// Source path passed to the renderer.
    pub source: PathBuf,
    /// Stylesheet references, in call order.
    pub style_refs: Vec<String>,
}

/// In-process renderer that wraps the source content in a marker element
/// instead of shelling out.
///
/// Records every call, can inject failures, and can delay each render to
/// widen race windows in concurrency tests.
#[derive(Debug, Default)]
pub struct MockRenderer {
    fail: bool,
    delay: Option<Duration>,
    calls: Mutex<Vec<RenderCall>>,
}

impl MockRenderer {
    /// Renderer that succeeds on every call.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Renderer that fails every call with a non-zero exit.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Renderer that sleeps for `delay` inside every call.
    #[must_use]
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    /// Calls recorded so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn calls(&self) -> Vec<RenderCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Output this renderer produces for `content` and `style_refs`.
    #[must_use]
    pub fn expected_output(content: &str, style_refs: &[String]) -> String {
        format!("<html styles=\"{}\">{content}</html>", style_refs.join(","))
    }
}

impl Renderer for MockRenderer {
    fn render(&self, source: &Path, style_refs: &[String]) -> Result<String, RenderError> {
        self.calls.lock().unwrap().push(RenderCall {
            source: source.to_path_buf(),
            style_refs: style_refs.to_vec(),
        });

        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }

        if self.fail {
            return Err(RenderError::Failed {
                code: 1,
                stderr: "mock failure".to_owned(),
            });
        }

        let content = fs::read_to_string(source).map_err(|e| RenderError::Spawn {
            command: "mock".to_owned(),
            source: e,
        })?;
        Ok(Self::expected_output(&content, style_refs))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_render_wraps_source_content() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("page.md");
        fs::write(&source, "hello").unwrap();
        let renderer = MockRenderer::new();
        let styles = vec!["site.css".to_owned()];

        let html = renderer.render(&source, &styles).unwrap();

        assert_eq!(html, "<html styles=\"site.css\">hello</html>");
    }

    #[test]
    fn test_calls_are_recorded_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a.md");
        let second = dir.path().join("b.md");
        fs::write(&first, "a").unwrap();
        fs::write(&second, "b").unwrap();
        let renderer = MockRenderer::new();

        renderer.render(&first, &[]).unwrap();
        renderer.render(&second, &["s.css".to_owned()]).unwrap();

        let calls = renderer.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].source, first);
        assert!(calls[0].style_refs.is_empty());
        assert_eq!(calls[1].source, second);
        assert_eq!(calls[1].style_refs, vec!["s.css".to_owned()]);
    }

    #[test]
    fn test_failing_renderer_reports_nonzero_exit() {
        let renderer = MockRenderer::failing();

        let err = renderer.render(Path::new("x.md"), &[]).unwrap_err();

        match err {
            RenderError::Failed { code, stderr } => {
                assert_eq!(code, 1);
                assert_eq!(stderr, "mock failure");
            }
            other => panic!("expected Failed, got {other:?}"),
        }
        assert_eq!(renderer.calls().len(), 1);
    }

    #[test]
    fn test_missing_source_maps_to_spawn_error() {
        let renderer = MockRenderer::new();

        let err = renderer.render(Path::new("/no/such/file.md"), &[]).unwrap_err();

        assert!(matches!(err, RenderError::Spawn { .. }));
    }
}
