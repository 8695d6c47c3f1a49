//! Markdown rendering module
//!
//! Turns editor text into preview markup using comrak, a CommonMark + GFM
//! compatible parser, extended with `$...$` / `$$...$$` math.
//!
//! # Architecture
//!
//! - `math.rs` - math span extraction, typesetting and substitution
//! - `parser.rs` - comrak options and HTML rendering
//! - `sanitize.rs` - ammonia allow-list including MathML
//! - `syntax.rs` - syntect highlighting of fenced code blocks
//! - `html_text.rs` - escaping, entity decoding and text extraction
//! - `typesetter.rs` - KaTeX typesetter (feature `katex`)

pub mod html_text;
#[cfg(feature = "katex")]
mod typesetter;
pub mod math;
mod parser;
mod sanitize;
pub mod syntax;

pub use html_text::{decode_entities, escape_html, text_content};
#[cfg(feature = "katex")]
pub use typesetter::KatexTypesetter;
pub use math::{extract_math, MathExtraction, MathKind, MathToken};
pub use parser::{MarkdownOptions, MarkdownParser};
pub use sanitize::Sanitizer;
pub use syntax::{get_highlighter, SyntaxHighlighter};
