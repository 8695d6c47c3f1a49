//! Fenced code highlighting for the preview
//!
//! Code blocks emitted by the parser as `<pre><code class="language-x">`
//! are re-emitted with `hl-` prefixed span classes. Colors live in a
//! stylesheet generated per syntect theme, so switching themes never
//! re-highlights. Blocks in unknown languages pass through untouched.

use log::{debug, warn};
use regex::{Captures, Regex};
use std::sync::OnceLock;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{css_for_theme_with_class_style, ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use crate::error::{Error, Result};
use crate::markdown::html_text::decode_entities;

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Fallback theme if the specified theme is not found
pub const FALLBACK_THEME: &str = "InspiredGitHub";

/// Class style shared by the highlighter output and the stylesheet.
pub const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed { prefix: "hl-" };

/// Fence languages syntect does not know under that spelling.
const LANGUAGE_ALIASES: &[(&str, &str)] = &[
    ("c++", "cpp"),
    ("cxx", "cpp"),
    ("c#", "cs"),
    ("csharp", "cs"),
    ("golang", "go"),
    ("shell", "sh"),
    ("patch", "diff"),
];

fn code_block_regex() -> &'static Regex {
    static CODE_BLOCK: OnceLock<Regex> = OnceLock::new();
    CODE_BLOCK.get_or_init(|| {
        Regex::new(r#"<pre><code class="language-([^"\s]+)">([\s\S]*?)</code></pre>"#)
            .expect("code block pattern should compile")
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Syntax Highlighter
// ─────────────────────────────────────────────────────────────────────────────

/// syntect's bundled syntaxes and themes, loaded once.
pub struct SyntaxHighlighter {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
}

impl Default for SyntaxHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SyntaxHighlighter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyntaxHighlighter")
            .field("syntaxes", &self.syntax_set.syntaxes().len())
            .field("themes", &self.theme_set.themes.len())
            .finish()
    }
}

impl SyntaxHighlighter {
    /// Load syntect's default sets. Slow; use [`get_highlighter`] instead.
    pub fn new() -> Self {
        debug!("Loading syntect syntax and theme sets");
        let syntax_set = SyntaxSet::load_defaults_newlines();
        let theme_set = ThemeSet::load_defaults();
        debug!(
            "Loaded {} syntaxes and {} themes",
            syntax_set.syntaxes().len(),
            theme_set.themes.len()
        );
        Self {
            syntax_set,
            theme_set,
        }
    }

    /// Theme by name, or the fallback theme.
    pub fn get_theme(&self, name: &str) -> Option<&Theme> {
        self.theme_set
            .themes
            .get(name)
            .or_else(|| self.theme_set.themes.get(FALLBACK_THEME))
    }

    /// Highlight one code block to classed HTML spans.
    ///
    /// Returns `Ok(None)` when the language is not recognized.
    pub fn highlight_code(&self, code: &str, language: &str) -> Result<Option<String>> {
        let Some(syntax) = self.find_syntax_for_language(language) else {
            debug!("No syntax found for language: {}", language);
            return Ok(None);
        };

        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntax_set, CLASS_STYLE);
        for line in LinesWithEndings::from(code) {
            generator
                .parse_html_for_line_which_includes_newline(line)
                .map_err(|e| Error::Highlight(e.to_string()))?;
        }
        Ok(Some(generator.finalize()))
    }

    /// Highlight every fenced code block with a recognized language in an
    /// HTML fragment. A block that fails to highlight is left as it was.
    pub fn highlight_html(&self, html: &str) -> String {
        code_block_regex()
            .replace_all(html, |caps: &Captures<'_>| {
                let language = &caps[1];
                let code = decode_entities(&caps[2]);
                match self.highlight_code(&code, language) {
                    Ok(Some(highlighted)) => format!(
                        "<pre><code class=\"language-{}\">{}</code></pre>",
                        language, highlighted
                    ),
                    Ok(None) => caps[0].to_string(),
                    Err(e) => {
                        warn!("Failed to highlight {} block: {}", language, e);
                        caps[0].to_string()
                    }
                }
            })
            .into_owned()
    }

    /// CSS rules for the highlight classes under a syntect theme.
    pub fn stylesheet(&self, theme_name: &str) -> Result<String> {
        let theme = self
            .get_theme(theme_name)
            .ok_or_else(|| Error::Highlight(format!("theme '{}' not found", theme_name)))?;
        css_for_theme_with_class_style(theme, CLASS_STYLE).map_err(|e| Error::Highlight(e.to_string()))
    }

    /// Resolve a fence info string to a syntax.
    ///
    /// syntect matches tokens against file extensions and then display
    /// names, so only spellings that are neither need an alias here.
    fn find_syntax_for_language(&self, language: &str) -> Option<&SyntaxReference> {
        let token = language.trim().to_ascii_lowercase();
        if token.is_empty() {
            return None;
        }
        let token = LANGUAGE_ALIASES
            .iter()
            .find(|(alias, _)| *alias == token)
            .map_or(token.as_str(), |(_, target)| *target);
        self.syntax_set.find_syntax_by_token(token)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Global Highlighter Instance
// ─────────────────────────────────────────────────────────────────────────────

/// Global syntax highlighter instance.
///
/// Lazily initialized on first access and reused for all highlighting
/// operations, so syntax and theme sets are loaded once.
static HIGHLIGHTER: OnceLock<SyntaxHighlighter> = OnceLock::new();

/// Get or create the global syntax highlighter.
pub fn get_highlighter() -> &'static SyntaxHighlighter {
    HIGHLIGHTER.get_or_init(SyntaxHighlighter::new)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{DARK_SYNTAX_THEME, LIGHT_SYNTAX_THEME, SEPIA_SYNTAX_THEME};

    #[test]
    fn test_highlighter_creation() {
        let highlighter = get_highlighter();
        assert!(!highlighter.syntax_set.syntaxes().is_empty());
        assert!(!highlighter.theme_set.themes.is_empty());
    }

    #[test]
    fn test_palette_syntax_themes_are_bundled() {
        let themes = &get_highlighter().theme_set.themes;
        for name in [LIGHT_SYNTAX_THEME, DARK_SYNTAX_THEME, SEPIA_SYNTAX_THEME] {
            assert!(themes.contains_key(name), "missing {}", name);
        }
    }

    #[test]
    fn test_find_syntax_aliases() {
        let highlighter = get_highlighter();
        let known = |language| highlighter.find_syntax_for_language(language).is_some();
        assert!(known("rust"));
        assert!(known("RS"));
        assert!(known("python"));
        assert!(known("bash"));
        assert!(known("c++"));
        assert!(!known(""));
        assert!(!known("definitely-not-a-language"));
    }

    #[test]
    fn test_highlight_html_known_language() {
        let html = "<pre><code class=\"language-rust\">fn main() { let x = &quot;s&quot;; }\n</code></pre>";
        let out = get_highlighter().highlight_html(html);
        assert!(out.starts_with("<pre><code class=\"language-rust\">"));
        assert!(out.contains("hl-"));
        assert!(out.contains("main"));
        assert!(out.ends_with("</code></pre>"));
    }

    #[test]
    fn test_highlight_html_unknown_language_unchanged() {
        let html = "<pre><code class=\"language-nope\">a &lt; b\n</code></pre>";
        assert_eq!(get_highlighter().highlight_html(html), html);
    }

    #[test]
    fn test_highlight_html_no_language_unchanged() {
        let html = "<pre><code>plain\n</code></pre>";
        assert_eq!(get_highlighter().highlight_html(html), html);
    }

    #[test]
    fn test_highlight_keeps_text_escaped() {
        let html = "<pre><code class=\"language-html\">&lt;script&gt;x&lt;/script&gt;\n</code></pre>";
        let out = get_highlighter().highlight_html(html);
        assert!(!out.contains("<script>"));
        assert!(out.contains("&lt;"));
    }

    #[test]
    fn test_stylesheet() {
        let css = get_highlighter().stylesheet("base16-ocean.dark").unwrap();
        assert!(css.contains(".hl-"));

        // Unknown names fall back instead of failing
        assert!(get_highlighter().stylesheet("no-such-theme").is_ok());
    }
}
