//! Live preview for mdpad
//!
//! The `RenderPipeline` turns document text into preview markup:
//!
//! 1. math spans are pulled out of the source ([`crate::markdown::math`])
//! 2. comrak renders the remaining markdown
//! 3. typeset math is spliced back in
//! 4. ammonia sanitizes the result with the math allow-list
//! 5. syntect highlights fenced code blocks with known languages
//!
//! The result is written to a `PreviewSurface`. The pipeline is the only
//! code allowed to replace the surface's markup; exports and the clipboard
//! only read it.

use log::{debug, error};

use crate::config::Direction;
use crate::error::Result;
use crate::host::Typesetter;
use crate::markdown::math::{substitute_placeholders, typeset_tokens};
use crate::markdown::{
    escape_html, extract_math, get_highlighter, text_content, MarkdownOptions, MarkdownParser,
    Sanitizer, SyntaxHighlighter,
};

// ─────────────────────────────────────────────────────────────────────────────
// Preview Surface
// ─────────────────────────────────────────────────────────────────────────────

/// The rendered side of the editor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewSurface {
    markup: String,
    direction: Direction,
    fullscreen: bool,
}

impl PreviewSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Markup of the most recently completed render.
    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Reading direction the markup was rendered with.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn set_fullscreen(&mut self, fullscreen: bool) {
        self.fullscreen = fullscreen;
    }

    /// Length of the visible text, in characters.
    pub fn text_len(&self) -> usize {
        text_content(&self.markup).chars().count()
    }

    /// Whether the markup contains typeset (or failed) math.
    pub fn has_math(&self) -> bool {
        self.markup.contains("class=\"katex")
    }

    fn replace(&mut self, markup: String, direction: Direction) {
        self.markup = markup;
        self.direction = direction;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Render Pipeline
// ─────────────────────────────────────────────────────────────────────────────

/// Markup shown instead of the document when rendering fails.
pub fn render_error_markup(message: &str) -> String {
    format!(
        "<div style=\"color: red; padding: 1rem;\"><strong>Rendering Error:</strong><br>{}</div>",
        escape_html(message)
    )
}

/// Parser, sanitizer and highlighter wired in render order.
#[derive(Debug)]
pub struct RenderPipeline {
    parser: MarkdownParser,
    sanitizer: Sanitizer,
    highlighter: &'static SyntaxHighlighter,
}

impl Default for RenderPipeline {
    fn default() -> Self {
        Self::new(MarkdownOptions::default())
    }
}

impl RenderPipeline {
    pub fn new(options: MarkdownOptions) -> Self {
        Self {
            parser: MarkdownParser::new(options),
            sanitizer: Sanitizer::new(),
            highlighter: get_highlighter(),
        }
    }

    /// Render text to sanitized, highlighted markup.
    pub fn render_markup(&self, text: &str, typesetter: Option<&dyn Typesetter>) -> Result<String> {
        let extraction = extract_math(text);
        debug!(
            "Rendering {} bytes with {} math spans",
            text.len(),
            extraction.tokens.len()
        );

        let html = self.parser.render(&extraction.markdown)?;
        let typeset = typeset_tokens(&extraction.tokens, typesetter);
        let html = substitute_placeholders(&html, &extraction, &typeset);
        let html = self.sanitizer.clean(&html);
        Ok(self.highlighter.highlight_html(&html))
    }

    /// Render text into the preview surface.
    ///
    /// On failure the surface shows the error instead of the document and
    /// the error is returned; the text itself is never touched.
    pub fn render(
        &self,
        text: &str,
        direction: Direction,
        typesetter: Option<&dyn Typesetter>,
        surface: &mut PreviewSurface,
    ) -> Result<()> {
        match self.render_markup(text, typesetter) {
            Ok(markup) => {
                surface.replace(markup, direction);
                Ok(())
            }
            Err(e) => {
                error!("Render failed: {}", e);
                surface.replace(render_error_markup(&e.to_string()), direction);
                Err(e)
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
