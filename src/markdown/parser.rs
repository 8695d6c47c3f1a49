//! Markdown parser implementation using comrak
//!
//! This module wraps comrak's HTML rendering behind the options the
//! preview uses, and turns a parser panic into a render error so one bad
//! document cannot take the application down.

use comrak::{markdown_to_html, Options};
use log::error;
use std::panic::{self, AssertUnwindSafe};

use crate::error::{Error, Result};

// ─────────────────────────────────────────────────────────────────────────────
// Options
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration options for markdown parsing and rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownOptions {
    /// Pass raw HTML through (it is sanitized afterwards)
    pub raw_html: bool,
    /// Turn bare URLs and emails into links
    pub autolink: bool,
    /// Smart quotes and dashes
    pub smart_punctuation: bool,
    /// Render every newline as `<br>`
    pub hard_breaks: bool,
    /// Enable GitHub Flavored Markdown tables
    pub tables: bool,
    /// Enable strikethrough syntax (~~text~~)
    pub strikethrough: bool,
    /// Enable task lists (- [ ] and - [x])
    pub tasklist: bool,
    /// Enable footnotes
    pub footnotes: bool,
    /// Prefix for generated heading ids, `None` for no ids
    pub header_ids: Option<String>,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            raw_html: true,
            autolink: true,
            smart_punctuation: true,
            hard_breaks: false,
            tables: true,
            strikethrough: true,
            tasklist: true,
            footnotes: true,
            header_ids: Some(String::new()),
        }
    }
}

impl MarkdownOptions {
    /// Convert to comrak Options.
    fn to_comrak_options(&self) -> Options {
        let mut options = Options::default();

        // Extension options
        options.extension.strikethrough = self.strikethrough;
        options.extension.table = self.tables;
        options.extension.autolink = self.autolink;
        options.extension.tasklist = self.tasklist;
        options.extension.footnotes = self.footnotes;
        options.extension.header_ids = self.header_ids.clone();

        // Parse options
        options.parse.smart = self.smart_punctuation;

        // Render options
        options.render.unsafe_ = self.raw_html;
        options.render.hardbreaks = self.hard_breaks;

        options
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rendering
// ─────────────────────────────────────────────────────────────────────────────

/// Markdown to HTML renderer.
#[derive(Debug, Clone, Default)]
pub struct MarkdownParser {
    options: MarkdownOptions,
}

impl MarkdownParser {
    pub fn new(options: MarkdownOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &MarkdownOptions {
        &self.options
    }

    /// Render markdown to an HTML fragment.
    ///
    /// comrak does not return errors; a panic inside it is caught and
    /// reported as `Error::Render`.
    pub fn render(&self, markdown: &str) -> Result<String> {
        let options = self.options.to_comrak_options();

        let rendered = panic::catch_unwind(AssertUnwindSafe(|| markdown_to_html(markdown, &options)));
        rendered.map_err(|payload| {
            let message = panic_message(payload.as_ref());
            error!("Markdown parser failed: {}", message);
            Error::Render(message)
        })
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "markdown parser panicked".to_string()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn render(markdown: &str) -> String {
        MarkdownParser::default().render(markdown).unwrap()
    }

    #[test]
    fn test_render_empty_document() {
        assert_eq!(render(""), "");
    }

    #[test]
    fn test_render_heading_with_id() {
        let html = render("# Hello World");
        assert!(html.contains("<h1>"));
        assert!(html.contains("id=\"hello-world\""));
        assert!(html.contains("Hello World"));
    }

    #[test]
    fn test_render_gfm_extensions() {
        let html = render("~~gone~~\n\n| a | b |\n|---|---|\n| 1 | 2 |\n\n- [x] done\n");
        assert!(html.contains("<del>gone</del>"));
        assert!(html.contains("<table>"));
        assert!(html.contains("type=\"checkbox\""));
    }

    #[test]
    fn test_render_autolink() {
        let html = render("see https://example.com now");
        assert!(html.contains("<a href=\"https://example.com\">"));
    }

    #[test]
    fn test_render_smart_punctuation() {
        let html = render("\"quoted\" -- dash");
        assert!(html.contains('\u{201c}'));
        assert!(html.contains('\u{2013}'));
    }

    #[test]
    fn test_soft_breaks_are_not_hard() {
        let html = render("line one\nline two");
        assert!(!html.contains("<br"));
    }

    #[test]
    fn test_raw_html_passes_through() {
        let html = render("<kbd>Ctrl</kbd>");
        assert!(html.contains("<kbd>Ctrl</kbd>"));
    }

    #[test]
    fn test_footnotes() {
        let html = render("Text[^1]\n\n[^1]: Note\n");
        assert!(html.contains("footnote"));
    }

    #[test]
    fn test_fenced_code_language_class() {
        let html = render("```rust\nfn main() {}\n```\n");
        assert!(html.contains("<pre><code class=\"language-rust\">"));
    }

    #[test]
    fn test_options_mapping() {
        let options = MarkdownOptions {
            hard_breaks: true,
            ..MarkdownOptions::default()
        }
        .to_comrak_options();
        assert!(options.render.hardbreaks);
        assert!(options.render.unsafe_);
        assert!(options.parse.smart);
    }
}
