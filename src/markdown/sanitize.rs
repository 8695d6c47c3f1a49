//! HTML sanitization of rendered markup
//!
//! Everything the preview shows passes through `ammonia` with its default
//! allow-list, extended by the MathML and SVG elements typeset math is made
//! of, the attributes it styles itself with, and the disabled checkboxes of
//! task lists. Scripts, event handlers and `javascript:` URLs are removed.

use ammonia::Builder;

/// Elements emitted by the math typesetter.
pub const MATH_TAGS: &[&str] = &[
    "math",
    "semantics",
    "annotation",
    "mrow",
    "mi",
    "mo",
    "mn",
    "ms",
    "mtext",
    "mspace",
    "msup",
    "msub",
    "msubsup",
    "mfrac",
    "msqrt",
    "mroot",
    "munder",
    "mover",
    "munderover",
    "mtable",
    "mtr",
    "mtd",
    "mstyle",
    "mpadded",
    "mphantom",
    "menclose",
    "svg",
    "path",
    "line",
];

/// Attributes allowed on every element.
pub const GENERIC_ATTRIBUTES: &[&str] = &[
    "class",
    "style",
    "id",
    "aria-hidden",
    "xmlns",
    "encoding",
    "mathvariant",
    "stretchy",
    "fence",
    "separator",
    "lspace",
    "rspace",
    "width",
    "height",
    "columnalign",
    "rowspacing",
    "columnspacing",
    "displaystyle",
    "scriptlevel",
    "accent",
    "accentunder",
    "minsize",
    "maxsize",
    "movablelimits",
    "display",
    "viewBox",
    "viewbox",
    "preserveAspectRatio",
    "preserveaspectratio",
];

/// Markup sanitizer with the math allow-list.
pub struct Sanitizer {
    builder: Builder<'static>,
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Sanitizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sanitizer").finish_non_exhaustive()
    }
}

impl Sanitizer {
    pub fn new() -> Self {
        let mut builder = Builder::default();
        builder
            .add_tags(MATH_TAGS.iter().copied())
            .add_tags(["input"])
            .add_generic_attributes(GENERIC_ATTRIBUTES.iter().copied())
            .add_tag_attributes("input", ["type", "checked", "disabled"])
            .add_tag_attributes("path", ["d"])
            .add_tag_attributes("line", ["x1", "x2", "y1", "y2", "stroke-width"]);
        Self { builder }
    }

    /// Sanitize an HTML fragment.
    pub fn clean(&self, html: &str) -> String {
        self.builder.clean(html).to_string()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_scripts_and_handlers() {
        let sanitizer = Sanitizer::new();
        let out = sanitizer.clean("<p onclick=\"x()\">hi</p><script>alert(1)</script>");
        assert_eq!(out, "<p>hi</p>");
    }

    #[test]
    fn test_strips_javascript_urls() {
        let out = Sanitizer::new().clean("<a href=\"javascript:alert(1)\">x</a>");
        assert!(!out.contains("javascript"));
    }

    #[test]
    fn test_keeps_math_markup() {
        let html = concat!(
            "<span class=\"katex\"><span class=\"katex-mathml\">",
            "<math xmlns=\"http://www.w3.org/1998/Math/MathML\"><semantics><mrow>",
            "<msup><mi>x</mi><mn>2</mn></msup></mrow>",
            "<annotation encoding=\"application/x-tex\">x^2</annotation>",
            "</semantics></math></span>",
            "<span class=\"katex-html\" aria-hidden=\"true\" style=\"height:0.8em;\">x</span></span>"
        );
        let out = Sanitizer::new().clean(html);
        assert!(out.contains("<msup><mi>x</mi><mn>2</mn></msup>"));
        assert!(out.contains("encoding=\"application/x-tex\""));
        assert!(out.contains("aria-hidden=\"true\""));
        assert!(out.contains("style=\"height:0.8em;\""));
        assert!(out.contains("class=\"katex\""));
    }

    #[test]
    fn test_keeps_task_list_checkbox() {
        let out =
            Sanitizer::new().clean("<li><input type=\"checkbox\" checked=\"\" disabled=\"\" /> done</li>");
        assert!(out.contains("<input"));
        assert!(out.contains("type=\"checkbox\""));
        assert!(out.contains("checked"));
    }

    #[test]
    fn test_keeps_code_language_class() {
        let out = Sanitizer::new().clean("<pre><code class=\"language-rust\">fn</code></pre>");
        assert_eq!(out, "<pre><code class=\"language-rust\">fn</code></pre>");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let sanitizer = Sanitizer::new();
        let once = sanitizer.clean("<h1 id=\"t\">T</h1><p>a &amp; b<img src=x onerror=y></p>");
        assert_eq!(sanitizer.clean(&once), once);
    }
}
