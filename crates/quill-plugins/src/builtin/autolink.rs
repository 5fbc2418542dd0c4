//! Bare-URL line expansion.
//!
//! Rewrites any source line consisting of a single http(s) URL into a
//! markdown link titled after the fetched page, stamped with the fetch
//! time. Lines whose title cannot be resolved are left untouched.

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use regex::Regex;
use ureq::Agent;

use crate::{Plugin, PluginError};

/// Name used for configuration selection.
pub(crate) const NAME: &str = "autolink";

/// Upper bound for a single title fetch.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Rewrites bare-URL lines into titled markdown links.
pub struct AutolinkPlugin {
    agent: Agent,
    url_line: Regex,
    title: Regex,
}

impl AutolinkPlugin {
    /// Create the plugin with a pooled HTTP agent.
    ///
    /// # Panics
    ///
    /// Panics if the internal regexes fail to compile. This should never
    /// happen as the patterns are compile-time constants.
    #[must_use]
    pub fn new() -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(FETCH_TIMEOUT))
            .build()
            .into();

        Self {
            agent,
            url_line: Regex::new(r"^https?://\S+$").unwrap(),
            title: Regex::new(r"(?is)<title[^>]*>(.*?)</title>").unwrap(),
        }
    }

    /// Fetch a page title, `None` on any transport or parse failure.
    fn fetch_title(&self, url: &str) -> Option<String> {
        let response = self.agent.get(url).call().ok()?;
        let body = response.into_body().read_to_string().ok()?;
        self.extract_title(&body)
    }

    /// First `<title>` element content, entity-decoded and collapsed to a
    /// single line.
    fn extract_title(&self, html: &str) -> Option<String> {
        let captured = self.title.captures(html)?.get(1)?;
        let decoded = decode_entities(captured.as_str());
        let title = decoded.split_whitespace().collect::<Vec<_>>().join(" ");
        if title.is_empty() { None } else { Some(title) }
    }

    /// Rewrite every bare-URL line through `fetch`.
    fn rewrite<F>(&self, text: &str, fetch: F, now: &DateTime<Utc>) -> String
    where
        F: Fn(&str) -> Option<String>,
    {
        let stamp = now.format("%Y-%m-%dT%H:%M:%S").to_string();
        let mut lines: Vec<String> = Vec::with_capacity(text.len() / 16);
        for line in text.split('\n') {
            if self.url_line.is_match(line)
                && let Some(title) = fetch(line)
            {
                lines.push(format!("[{title}]({line}) <small>{stamp}</small><br>"));
            } else {
                lines.push(line.to_owned());
            }
        }
        lines.join("\n")
    }
}

impl Default for AutolinkPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for AutolinkPlugin {
    fn name(&self) -> &'static str {
        NAME
    }

    fn pre_publish(
        &self,
        name: String,
        content: Vec<u8>,
    ) -> Result<(String, Vec<u8>), PluginError> {
        // Binary content passes through untouched.
        let Ok(text) = std::str::from_utf8(&content) else {
            return Ok((name, content));
        };

        if !text.split('\n').any(|line| self.url_line.is_match(line)) {
            return Ok((name, content));
        }

        let rewritten = self.rewrite(text, |url| self.fetch_title(url), &Utc::now());
        Ok((name, rewritten.into_bytes()))
    }

    fn post_publish(&self, source_path: &Path, artifact_path: &Path) -> Result<(), PluginError> {
        tracing::debug!(
            source = %source_path.display(),
            artifact = %artifact_path.display(),
            "Publish observed"
        );
        Ok(())
    }
}

/// Decode the few entities common in page titles. `&amp;` goes last so it
/// is not re-decoded into another entity.
fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap()
    }

    #[test]
    fn test_extract_title_plain() {
        let plugin = AutolinkPlugin::new();

        let title = plugin.extract_title("<html><title>Example Domain</title></html>");

        assert_eq!(title, Some("Example Domain".to_owned()));
    }

    #[test]
    fn test_extract_title_with_attributes_and_entities() {
        let plugin = AutolinkPlugin::new();

        let title = plugin.extract_title(r#"<TITLE lang="en">Fish &amp; Chips</TITLE>"#);

        assert_eq!(title, Some("Fish & Chips".to_owned()));
    }

    #[test]
    fn test_extract_title_collapses_whitespace() {
        let plugin = AutolinkPlugin::new();

        let title = plugin.extract_title("<title>\n  Spread\n  Out\n</title>");

        assert_eq!(title, Some("Spread Out".to_owned()));
    }

    #[test]
    fn test_extract_title_missing_or_empty() {
        let plugin = AutolinkPlugin::new();

        assert_eq!(plugin.extract_title("<html><body>no title</body></html>"), None);
        assert_eq!(plugin.extract_title("<title>   </title>"), None);
    }

    #[test]
    fn test_rewrite_bare_url_line() {
        let plugin = AutolinkPlugin::new();

        let out = plugin.rewrite(
            "intro\nhttps://example.com/page\noutro",
            |_| Some("Example".to_owned()),
            &fixed_time(),
        );

        assert_eq!(
            out,
            "intro\n[Example](https://example.com/page) \
             <small>2026-01-02T03:04:05</small><br>\noutro"
        );
    }

    #[test]
    fn test_rewrite_leaves_inline_urls_alone() {
        let plugin = AutolinkPlugin::new();
        let text = "see https://example.com for details";

        let out = plugin.rewrite(text, |_| Some("Example".to_owned()), &fixed_time());

        assert_eq!(out, text);
    }

    #[test]
    fn test_rewrite_keeps_line_when_title_unavailable() {
        let plugin = AutolinkPlugin::new();
        let text = "https://example.com/down";

        let out = plugin.rewrite(text, |_| None, &fixed_time());

        assert_eq!(out, text);
    }

    #[test]
    fn test_rewrite_matches_http_and_https_only() {
        let plugin = AutolinkPlugin::new();
        let text = "http://a\nhttps://b\nftp://c";

        let out = plugin.rewrite(text, |_| Some("T".to_owned()), &fixed_time());

        let lines: Vec<&str> = out.split('\n').collect();
        assert!(lines[0].starts_with("[T](http://a)"));
        assert!(lines[1].starts_with("[T](https://b)"));
        assert_eq!(lines[2], "ftp://c");
    }

    #[test]
    fn test_pre_publish_without_urls_is_identity() {
        let plugin = AutolinkPlugin::new();

        let (name, content) = plugin
            .pre_publish("note.md".to_owned(), b"just text\nmore text".to_vec())
            .unwrap();

        assert_eq!(name, "note.md");
        assert_eq!(content, b"just text\nmore text");
    }

    #[test]
    fn test_pre_publish_passes_binary_content_through() {
        let plugin = AutolinkPlugin::new();
        let binary = vec![0xff, 0xfe, 0x00, 0x42];

        let (_, content) = plugin.pre_publish("blob.css".to_owned(), binary.clone()).unwrap();

        assert_eq!(content, binary);
    }

    #[test]
    fn test_decode_entities_amp_last() {
        assert_eq!(decode_entities("&amp;lt;"), "&lt;");
        assert_eq!(decode_entities("a &lt; b &gt; c"), "a < b > c");
    }
}
