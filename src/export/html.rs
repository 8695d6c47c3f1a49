//! HTML Export Generation
//!
//! This module wraps preview markup in a complete HTML document with the
//! theme colors, font size, reading direction and code highlighting CSS
//! inlined, so the file looks like the live preview without the
//! application around it.

use chrono::{DateTime, Utc};

use super::options::{Artifact, FONT_FAMILY};
use super::{ExportKind, ExportSnapshot};
use crate::config::Preferences;
use crate::error::{Result, ResultExt};
use crate::markdown::{escape_html, get_highlighter};
use crate::theme::ThemeColors;

/// Title of every exported document.
pub const DOCUMENT_TITLE: &str = "Exported Markdown Document";

/// KaTeX stylesheet, linked only when the markup contains math.
pub const KATEX_STYLESHEET: &str = "https://cdn.jsdelivr.net/npm/katex@0.16.9/dist/katex.min.css";

// ─────────────────────────────────────────────────────────────────────────────
// HTML Generation
// ─────────────────────────────────────────────────────────────────────────────

/// Generate a complete HTML document around preview markup.
///
/// # Arguments
///
/// * `markup` - Sanitized preview markup
/// * `prefs` - Theme, font size and direction to inline
///
/// # Returns
///
/// A complete HTML document as a string. It contains no scripts.
pub fn standalone_document(markup: &str, prefs: &Preferences) -> String {
    let katex_link = if markup_has_math(markup) {
        format!(
            "\n    <link rel=\"stylesheet\" href=\"{}\">",
            escape_html(KATEX_STYLESHEET)
        )
    } else {
        String::new()
    };

    format!(
        r#"<!doctype html>
<html lang="en" dir="{dir}">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta name="generator" content="mdpad">
    <title>{title}</title>{katex_link}
    <style>
{styles}
    </style>
</head>
<body data-theme="{theme}">
{body}
</body>
</html>"#,
        dir = prefs.direction.as_str(),
        title = escape_html(DOCUMENT_TITLE),
        katex_link = katex_link,
        styles = document_styles(prefs),
        theme = prefs.theme.as_str(),
        body = markup,
    )
}

/// The preview as a standalone `.html` artifact.
pub fn export_html(snapshot: &ExportSnapshot<'_>, now: DateTime<Utc>) -> Result<Artifact> {
    let document = standalone_document(snapshot.markup, &snapshot.preferences);
    Ok(Artifact::for_kind(ExportKind::Html, now, document.into_bytes()))
}

/// Base, theme and code highlighting CSS for `prefs`.
pub fn document_styles(prefs: &Preferences) -> String {
    let colors = ThemeColors::for_theme(prefs.theme);
    let syntax_css = get_highlighter()
        .stylesheet(colors.syntax_theme)
        .unwrap_or_warn_default(String::new(), "Code highlighting CSS unavailable");

    format!("{}\n{}\n{}", BASE_CSS, generate_theme_css(&colors, prefs), syntax_css)
}

/// Whether markup contains typeset math.
pub fn markup_has_math(markup: &str) -> bool {
    markup.contains("class=\"katex")
}

// ─────────────────────────────────────────────────────────────────────────────
// CSS Generation
// ─────────────────────────────────────────────────────────────────────────────

/// Base CSS for markdown rendering (layout, typography).
const BASE_CSS: &str = r#"
*, *::before, *::after {
    box-sizing: border-box;
}

body {
    line-height: 1.6;
    max-width: 900px;
    margin: 0 auto;
    padding: 2rem;
}

h1, h2, h3, h4, h5, h6 {
    margin-top: 1.5rem;
    margin-bottom: 0.75rem;
    font-weight: 600;
    line-height: 1.3;
}

h1 { font-size: 2.25rem; border-bottom: 2px solid; padding-bottom: 0.5rem; }
h2 { font-size: 1.875rem; border-bottom: 1px solid; padding-bottom: 0.5rem; }
h3 { font-size: 1.5rem; }
h4 { font-size: 1.25rem; }
h5 { font-size: 1.125rem; }
h6 { font-size: 1rem; }

p { margin-bottom: 1rem; }

a { text-decoration: none; }
a:hover { text-decoration: underline; }
h1 a.anchor, h2 a.anchor, h3 a.anchor, h4 a.anchor, h5 a.anchor, h6 a.anchor { display: none; }

ul, ol { margin-bottom: 1rem; padding-left: 2rem; }
li { margin-bottom: 0.5rem; }
.task-list-item, li:has(> input[type="checkbox"]) { list-style: none; }

blockquote {
    margin: 1rem 0;
    padding: 0.5rem 1rem;
    border-left: 4px solid;
}

code {
    padding: 0.2rem 0.4rem;
    border-radius: 4px;
    font-family: 'Consolas', 'Monaco', 'Courier New', monospace;
    font-size: 0.9em;
}

pre {
    margin: 1rem 0;
    padding: 1rem;
    border-radius: 8px;
    overflow-x: auto;
}

pre code {
    padding: 0;
    background-color: transparent;
    border-radius: 0;
}

table {
    width: 100%;
    margin: 1rem 0;
    border-collapse: collapse;
    border: 1px solid;
}

th, td {
    padding: 0.75rem;
    border: 1px solid;
    text-align: left;
}

th { font-weight: 600; }

img {
    max-width: 100%;
    height: auto;
    border-radius: 8px;
    margin: 1rem 0;
}

hr {
    margin: 2rem 0;
    border: none;
    border-top: 2px solid;
}

.katex-error { color: #cc0000; }

[dir="rtl"] ul, [dir="rtl"] ol {
    padding-right: 2rem;
    padding-left: 0;
}

[dir="rtl"] blockquote {
    border-left: none;
    border-right: 4px solid;
}

[dir="rtl"] th, [dir="rtl"] td { text-align: right; }
"#;

/// Generate theme-specific CSS from ThemeColors.
fn generate_theme_css(colors: &ThemeColors, prefs: &Preferences) -> String {
    format!(
        r#"
:root {{
    color-scheme: {color_scheme};
}}

body {{
    font-family: {font_family};
    background-color: {bg};
    color: {text};
    font-size: {font_size}px;
}}

h1, h2, hr, table, th, td {{
    border-color: {border};
}}

a {{
    color: {link};
}}

blockquote {{
    border-color: {link};
    background-color: {quote_bg};
    color: {quote_text};
}}

code, th {{
    background-color: {code_bg};
}}

pre {{
    background-color: {code_bg};
    border: 1px solid {border};
}}
"#,
        color_scheme = if colors.is_dark() { "dark" } else { "light" },
        font_family = FONT_FAMILY,
        bg = colors.background,
        text = colors.text,
        font_size = prefs.font_size.px(),
        border = colors.border,
        link = colors.link,
        quote_bg = colors.quote_background,
        quote_text = colors.quote_text,
        code_bg = colors.code_background,
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Direction, FontSize, Theme};
    use chrono::TimeZone;

    fn prefs(theme: Theme, size: u16, direction: Direction) -> Preferences {
        Preferences {
            theme,
            font_size: FontSize::new(size).unwrap(),
            direction,
        }
    }

    #[test]
    fn test_document_structure() {
        let html = standalone_document("<h1>Test</h1>", &Preferences::default());

        assert!(html.starts_with("<!doctype html>"));
        assert!(html.contains("<html lang=\"en\" dir=\"ltr\">"));
        assert!(html.contains("<title>Exported Markdown Document</title>"));
        assert!(html.contains("<body data-theme=\"light\">\n<h1>Test</h1>\n</body>"));
        assert!(!html.contains("<script"));
    }

    #[test]
    fn test_theme_colors_and_font_size_inlined() {
        let html = standalone_document("<p>x</p>", &prefs(Theme::Dark, 20, Direction::Ltr));
        assert!(html.contains("background-color: #1e1e1e;"));
        assert!(html.contains("color: #e0e0e0;"));
        assert!(html.contains("font-size: 20px;"));
        assert!(html.contains("color-scheme: dark"));

        let html = standalone_document("<p>x</p>", &prefs(Theme::Sepia, 16, Direction::Ltr));
        assert!(html.contains("background-color: #f4ecd8;"));
        assert!(html.contains("color: #5a4a3a;"));
    }

    #[test]
    fn test_direction_attribute() {
        let html = standalone_document("<p>x</p>", &prefs(Theme::Light, 16, Direction::Rtl));
        assert!(html.contains("dir=\"rtl\""));
        assert!(html.contains("[dir=\"rtl\"] blockquote"));
    }

    #[test]
    fn test_katex_stylesheet_only_with_math() {
        let plain = standalone_document("<p>x</p>", &Preferences::default());
        assert!(!plain.contains("katex.min.css"));

        let math = standalone_document("<p><span class=\"katex\">x</span></p>", &Preferences::default());
        assert!(math.contains("katex.min.css"));
    }

    #[test]
    fn test_syntax_css_included() {
        let html = standalone_document("<p>x</p>", &Preferences::default());
        assert!(html.contains(".hl-"));
    }

    #[test]
    fn test_export_html_artifact() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let snapshot = ExportSnapshot::new("# x", "<h1>x</h1>", Preferences::default());
        let artifact = export_html(&snapshot, now).unwrap();
        assert_eq!(artifact.file_name, "document-2024-05-01T12-00-00.html");
        assert_eq!(artifact.mime, "text/html");
        let body = String::from_utf8(artifact.bytes).unwrap();
        assert!(body.contains("<h1>x</h1>"));
    }
}
