//! Math grammar extension
//!
//! comrak has no hook for custom inline or block rules, so math is handled
//! around the parser instead of inside it:
//!
//! 1. [`extract_math`] walks the source once, skipping code (fenced,
//!    indented and inline spans) and raw HTML tags, and replaces every
//!    `$...$` and `$$...$$` span with a private-use placeholder. The raw
//!    math source is kept as a [`MathToken`]. Placeholders carry a nonce
//!    that does not occur in the source, so text that merely looks like a
//!    placeholder is never substituted.
//! 2. The rewritten source goes through comrak untouched by math syntax, so
//!    markdown punctuation inside a formula (`*`, `_`, `\`) cannot leak
//!    into emphasis or escapes.
//! 3. [`typeset_tokens`] hands each token to the typesetter and
//!    [`substitute_placeholders`] splices the results into the rendered
//!    HTML. A block placeholder that ended up alone in a paragraph replaces
//!    the whole `<p>` element.
//!
//! Tokens live for one render pass only.

use crate::host::Typesetter;
use crate::markdown::html_text::{decode_entities, escape_html};
use log::{debug, warn};
use regex::Regex;
use std::sync::OnceLock;

// ─────────────────────────────────────────────────────────────────────────────
// Tokens
// ─────────────────────────────────────────────────────────────────────────────

const PLACEHOLDER_OPEN: char = '\u{E000}';
const PLACEHOLDER_CLOSE: char = '\u{E001}';

/// Inline (`$`) or display (`$$`) math.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathKind {
    Inline,
    Block,
}

impl MathKind {
    /// Display-mode flag passed to the typesetter.
    pub fn display_mode(&self) -> bool {
        matches!(self, MathKind::Block)
    }

    /// The delimiter the span was written with.
    pub fn markup(&self) -> &'static str {
        match self {
            MathKind::Inline => "$",
            MathKind::Block => "$$",
        }
    }
}

/// One recognized math span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MathToken {
    pub kind: MathKind,
    /// Raw math source between the delimiters
    pub source: String,
}

impl MathToken {
    fn new(kind: MathKind, source: impl Into<String>) -> Self {
        Self {
            kind,
            source: source.into(),
        }
    }
}

/// Result of the extraction pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MathExtraction {
    /// Markdown with every math span replaced by a placeholder
    pub markdown: String,
    /// Extracted spans, indexed by placeholder number
    pub tokens: Vec<MathToken>,
    /// Placeholder nonce for this pass
    pub nonce: u32,
}

impl MathExtraction {
    /// Placeholder standing for token `index` in the rewritten markdown.
    pub fn placeholder(&self, index: usize) -> String {
        placeholder(self.nonce, index)
    }
}

fn placeholder(nonce: u32, index: usize) -> String {
    format!("{}{}:{}{}", PLACEHOLDER_OPEN, nonce, index, PLACEHOLDER_CLOSE)
}

/// Smallest nonce whose placeholder prefix occurs nowhere in the source,
/// neither literally nor through a character reference.
fn choose_nonce(markdown: &str) -> u32 {
    let decoded = decode_entities(markdown);
    if !decoded.contains(PLACEHOLDER_OPEN) {
        return 0;
    }
    (0u32..)
        .find(|&nonce| {
            let prefix = format!("{}{}:", PLACEHOLDER_OPEN, nonce);
            !markdown.contains(&prefix) && !decoded.contains(&prefix)
        })
        .unwrap_or_default()
}

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new("\u{E000}([0-9]+):([0-9]+)\u{E001}").expect("placeholder pattern should compile")
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Extraction
// ─────────────────────────────────────────────────────────────────────────────

/// Replace math spans in `markdown` with placeholders.
///
/// Block math (`$$`) is recognized only at the start of a line with less
/// than four columns of indentation, and only where a new block may begin:
/// it never interrupts a paragraph. Its content runs until a line whose
/// trimmed form ends with `$$`, or to the end of input when no such line
/// exists. A non-empty opening remainder that itself ends with `$$`
/// closes the block on the same line.
///
/// Inline math starts at an unescaped `$` and runs to the next `$` not
/// preceded by a backslash within the same paragraph. Without a closing
/// delimiter the `$` stays literal text.
pub fn extract_math(markdown: &str) -> MathExtraction {
    let mut extractor = Extractor {
        nonce: choose_nonce(markdown),
        ..Extractor::default()
    };
    extractor.run(markdown);
    MathExtraction {
        markdown: extractor.out,
        tokens: extractor.tokens,
        nonce: extractor.nonce,
    }
}

#[derive(Debug, Clone, Copy)]
struct Fence {
    marker: u8,
    len: usize,
}

#[derive(Default)]
struct Extractor {
    out: String,
    tokens: Vec<MathToken>,
    paragraph: String,
    nonce: u32,
}

impl Extractor {
    fn run(&mut self, markdown: &str) {
        let lines: Vec<&str> = markdown.split_inclusive('\n').collect();
        let mut fence: Option<Fence> = None;
        let mut indented_code = false;
        let mut list_context = false;
        let mut i = 0;

        while i < lines.len() {
            let line = lines[i];
            let body = strip_line_ending(line);
            i += 1;

            if let Some(open) = fence {
                self.out.push_str(line);
                if closes_fence(body, open) {
                    fence = None;
                }
                continue;
            }

            if body.trim().is_empty() {
                self.flush_paragraph();
                self.out.push_str(line);
                continue;
            }

            let (columns, indent_len) = indentation(body);
            let rest = &body[indent_len..];

            if indented_code {
                if columns >= 4 {
                    self.out.push_str(line);
                    continue;
                }
                indented_code = false;
            }

            let paragraph_open = !self.paragraph.is_empty();
            if columns == 0 && !is_list_marker(rest) {
                list_context = false;
            }

            if columns >= 4 && !paragraph_open && !list_context {
                indented_code = true;
                self.out.push_str(line);
                continue;
            }

            if columns < 4 || list_context {
                if let Some(open) = opens_fence(rest) {
                    self.flush_paragraph();
                    self.out.push_str(line);
                    fence = Some(open);
                    continue;
                }

                if rest.starts_with("$$") && !paragraph_open {
                    i = self.block(&lines, i - 1, &body[..indent_len], &rest[2..]);
                    continue;
                }

                if paragraph_open && is_setext_underline(rest) {
                    self.paragraph.push_str(line);
                    self.flush_paragraph();
                    continue;
                }

                if is_thematic_break(rest) {
                    self.flush_paragraph();
                    self.out.push_str(line);
                    continue;
                }

                if is_heading(rest) {
                    self.flush_paragraph();
                    self.paragraph.push_str(line);
                    self.flush_paragraph();
                    continue;
                }

                if is_list_marker(rest) {
                    self.flush_paragraph();
                    list_context = true;
                } else if rest.starts_with('>') || rest.starts_with('|') {
                    self.flush_paragraph();
                }
            }

            self.paragraph.push_str(line);
        }

        self.flush_paragraph();
    }

    /// Consume a block starting at `lines[start]` and return the index of
    /// the first line after it.
    fn block(&mut self, lines: &[&str], start: usize, indent: &str, first: &str) -> usize {
        let mut content = String::new();
        let mut next = start + 1;

        let first_trimmed = first.trim();
        if !first_trimmed.is_empty() && first_trimmed.ends_with("$$") {
            content.push_str(&first_trimmed[..first_trimmed.len() - 2]);
        } else {
            content.push_str(first);
            while next < lines.len() {
                let body = strip_line_ending(lines[next]);
                next += 1;
                let trimmed = body.trim();
                content.push('\n');
                if let Some(last) = trimmed.strip_suffix("$$") {
                    content.push_str(last);
                    break;
                }
                content.push_str(body);
            }
        }

        let source = content.trim();
        let source = source.strip_suffix("$$").unwrap_or(source).trim();
        debug!("Block math over lines {}..{}", start + 1, next);

        let marker = self.push_token(MathKind::Block, source);
        self.out.push_str(indent);
        self.out.push_str(&marker);
        self.out.push_str("\n\n");
        next
    }

    fn push_token(&mut self, kind: MathKind, source: &str) -> String {
        self.tokens.push(MathToken::new(kind, source));
        placeholder(self.nonce, self.tokens.len() - 1)
    }

    fn flush_paragraph(&mut self) {
        if self.paragraph.is_empty() {
            return;
        }
        let chunk = std::mem::take(&mut self.paragraph);
        let scanned = self.scan_inline(&chunk);
        self.out.push_str(&scanned);
    }

    /// Inline pass over one paragraph.
    fn scan_inline(&mut self, chunk: &str) -> String {
        let bytes = chunk.as_bytes();
        let mut out = String::with_capacity(chunk.len());
        let mut copied = 0;
        let mut i = 0;

        while i < bytes.len() {
            match bytes[i] {
                b'\\' if bytes.get(i + 1).is_some_and(|b| b.is_ascii_punctuation()) => i += 2,
                b'`' => {
                    let run = run_length(bytes, i, b'`');
                    i = match closing_backticks(bytes, i + run, run) {
                        Some(close) => close + run,
                        None => i + run,
                    };
                }
                b'<' => {
                    i = match tag_end(bytes, i) {
                        Some(end) => end + 1,
                        None => i + 1,
                    };
                }
                b'$' => match closing_dollar(bytes, i + 1) {
                    Some(end) => {
                        out.push_str(&chunk[copied..i]);
                        let marker = self.push_token(MathKind::Inline, &chunk[i + 1..end]);
                        out.push_str(&marker);
                        i = end + 1;
                        copied = i;
                    }
                    None => i += 1,
                },
                _ => i += 1,
            }
        }

        out.push_str(&chunk[copied..]);
        out
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Line Classification
// ─────────────────────────────────────────────────────────────────────────────

fn strip_line_ending(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}

/// Indentation width in columns (tabs to the next multiple of four) and
/// its length in bytes.
fn indentation(line: &str) -> (usize, usize) {
    let mut columns = 0;
    let mut len = 0;
    for b in line.bytes() {
        match b {
            b' ' => columns += 1,
            b'\t' => columns += 4 - columns % 4,
            _ => break,
        }
        len += 1;
    }
    (columns, len)
}

fn opens_fence(rest: &str) -> Option<Fence> {
    let bytes = rest.as_bytes();
    let marker = *bytes.first()?;
    if marker != b'`' && marker != b'~' {
        return None;
    }
    let len = run_length(bytes, 0, marker);
    if len < 3 {
        return None;
    }
    if marker == b'`' && rest[len..].contains('`') {
        return None;
    }
    Some(Fence { marker, len })
}

fn closes_fence(line: &str, fence: Fence) -> bool {
    let (columns, indent_len) = indentation(line);
    if columns >= 4 {
        return false;
    }
    let rest = line[indent_len..].trim_end();
    let len = run_length(rest.as_bytes(), 0, fence.marker);
    len >= fence.len && len == rest.len()
}

fn is_heading(rest: &str) -> bool {
    let hashes = run_length(rest.as_bytes(), 0, b'#');
    (1..=6).contains(&hashes)
        && rest[hashes..]
            .chars()
            .next()
            .map_or(true, |c| c == ' ' || c == '\t')
}

fn is_thematic_break(rest: &str) -> bool {
    let mut marker = None;
    let mut count = 0;
    for c in rest.trim_end().chars() {
        match c {
            ' ' | '\t' => {}
            '-' | '*' | '_' if marker.map_or(true, |m| m == c) => {
                marker = Some(c);
                count += 1;
            }
            _ => return false,
        }
    }
    count >= 3
}

fn is_setext_underline(rest: &str) -> bool {
    let trimmed = rest.trim_end();
    !trimmed.is_empty() && (trimmed.bytes().all(|b| b == b'=') || trimmed.bytes().all(|b| b == b'-'))
}

fn is_list_marker(rest: &str) -> bool {
    let bytes = rest.as_bytes();
    let followed_by_space = |at: usize| matches!(bytes.get(at), None | Some(b' ') | Some(b'\t'));
    match bytes.first() {
        Some(b'-') | Some(b'*') | Some(b'+') => followed_by_space(1),
        Some(b) if b.is_ascii_digit() => {
            let digits = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
            digits <= 9
                && matches!(bytes.get(digits), Some(b'.') | Some(b')'))
                && followed_by_space(digits + 1)
        }
        _ => false,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Inline Scanning Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn run_length(bytes: &[u8], start: usize, marker: u8) -> usize {
    bytes[start.min(bytes.len())..]
        .iter()
        .take_while(|&&b| b == marker)
        .count()
}

/// Start of a backtick run of exactly `len` after `from`.
fn closing_backticks(bytes: &[u8], from: usize, len: usize) -> Option<usize> {
    let mut i = from;
    while i < bytes.len() {
        if bytes[i] == b'`' {
            let run = run_length(bytes, i, b'`');
            if run == len {
                return Some(i);
            }
            i += run;
        } else {
            i += 1;
        }
    }
    None
}

/// End of raw HTML (tag, comment, declaration) or an autolink opening at
/// `start`, following the CommonMark raw HTML grammar. Anything else, such
/// as `0<x` in prose, is not skipped.
fn tag_end(bytes: &[u8], start: usize) -> Option<usize> {
    let rest = &bytes[start..];
    let end = if rest.starts_with(b"<!--") {
        find_from(rest, 4, b"-->").map(|i| i + 2)
    } else if rest.starts_with(b"<?") {
        find_from(rest, 2, b"?>").map(|i| i + 1)
    } else if rest.starts_with(b"<!") && rest.get(2).is_some_and(u8::is_ascii_alphabetic) {
        find_from(rest, 2, b">")
    } else if rest.starts_with(b"</") {
        let i = skip_whitespace(rest, tag_name_end(rest, 2)?);
        (rest.get(i) == Some(&b'>')).then_some(i)
    } else {
        let name_end = tag_name_end(rest, 1)?;
        autolink_end(rest, name_end).or_else(|| open_tag_end(rest, name_end))
    };
    end.map(|offset| start + offset)
}

/// End of an ASCII tag name (letter, then letters, digits or `-`).
fn tag_name_end(bytes: &[u8], from: usize) -> Option<usize> {
    if !bytes.get(from)?.is_ascii_alphabetic() {
        return None;
    }
    let len = bytes[from..]
        .iter()
        .take_while(|b| b.is_ascii_alphanumeric() || **b == b'-')
        .count();
    Some(from + len)
}

/// Attributes and the closing `>` of an open tag whose name ends at `i`.
fn open_tag_end(bytes: &[u8], mut i: usize) -> Option<usize> {
    loop {
        let after_space = skip_whitespace(bytes, i);
        match *bytes.get(after_space)? {
            b'>' => return Some(after_space),
            b'/' => return (bytes.get(after_space + 1) == Some(&b'>')).then_some(after_space + 1),
            b if after_space > i && (b.is_ascii_alphabetic() || b == b'_' || b == b':') => {
                i = attribute_end(bytes, after_space)?;
            }
            _ => return None,
        }
    }
}

/// End of one attribute (name and optional value) starting at `from`.
fn attribute_end(bytes: &[u8], from: usize) -> Option<usize> {
    let name_len = bytes[from..]
        .iter()
        .take_while(|b| b.is_ascii_alphanumeric() || matches!(**b, b'_' | b'.' | b':' | b'-'))
        .count();
    let name_end = from + name_len;

    let eq = skip_whitespace(bytes, name_end);
    if bytes.get(eq) != Some(&b'=') {
        return Some(name_end);
    }
    let value = skip_whitespace(bytes, eq + 1);
    match *bytes.get(value)? {
        quote @ (b'"' | b'\'') => find_from(bytes, value + 1, &[quote]).map(|close| close + 1),
        _ => {
            let len = bytes[value..]
                .iter()
                .take_while(|b| {
                    !b.is_ascii_whitespace() && !matches!(**b, b'"' | b'\'' | b'=' | b'<' | b'>' | b'`')
                })
                .count();
            (len > 0).then_some(value + len)
        }
    }
}

/// `<scheme:...>` with no spaces or `<` before the closing `>`.
fn autolink_end(bytes: &[u8], scheme_end: usize) -> Option<usize> {
    if bytes.get(scheme_end) != Some(&b':') || scheme_end < 3 {
        return None;
    }
    bytes[scheme_end..]
        .iter()
        .take_while(|b| !b.is_ascii_whitespace() && **b != b'<')
        .position(|&b| b == b'>')
        .map(|offset| scheme_end + offset)
}

fn skip_whitespace(bytes: &[u8], from: usize) -> usize {
    from + bytes[from.min(bytes.len())..]
        .iter()
        .take_while(|b| b.is_ascii_whitespace())
        .count()
}

/// Start of the first occurrence of `needle` at or after `from`.
fn find_from(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    bytes
        .get(from..)?
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|offset| from + offset)
}

/// Next `$` at or after `from` that is not preceded by a backslash.
fn closing_dollar(bytes: &[u8], from: usize) -> Option<usize> {
    (from..bytes.len()).find(|&end| bytes[end] == b'$' && bytes[end - 1] != b'\\')
}

// ─────────────────────────────────────────────────────────────────────────────
// Typesetting
// ─────────────────────────────────────────────────────────────────────────────

/// Markup shown in place of a span the typesetter rejected.
pub fn error_markup(token: &MathToken) -> String {
    let source = escape_html(&token.source);
    match token.kind {
        MathKind::Inline => format!("<span class=\"katex-error\">{}</span>", source),
        MathKind::Block => format!("<div class=\"katex-error\">{}</div>", source),
    }
}

/// Typeset every token. A failure only affects its own span.
pub fn typeset_tokens(tokens: &[MathToken], typesetter: Option<&dyn Typesetter>) -> Vec<String> {
    tokens
        .iter()
        .map(|token| match typesetter {
            Some(typesetter) => match typesetter.typeset(&token.source, token.kind.display_mode()) {
                Ok(markup) => markup,
                Err(e) => {
                    warn!("Math typesetting failed: {}", e);
                    error_markup(token)
                }
            },
            None => error_markup(token),
        })
        .collect()
}

/// Splice typeset markup into rendered HTML.
///
/// Placeholders inside a tag (alt text, titles) are replaced with the raw
/// math source instead, so attributes stay well-formed.
pub fn substitute_placeholders(html: &str, extraction: &MathExtraction, rendered: &[String]) -> String {
    let tokens = &extraction.tokens;
    if tokens.is_empty() {
        return html.to_string();
    }

    let mut out = String::with_capacity(html.len() + rendered.iter().map(String::len).sum::<usize>());
    let mut copied = 0;
    let mut in_tag = false;

    for caps in placeholder_regex().captures_iter(html) {
        let Some(whole) = caps.get(0) else { continue };
        let between = &html[copied..whole.start()];
        in_tag = inside_tag_after(between, in_tag);
        out.push_str(between);
        copied = whole.end();

        let index = caps[2]
            .parse::<usize>()
            .ok()
            .filter(|_| caps[1].parse::<u32>().ok() == Some(extraction.nonce));
        let (Some(token), Some(markup)) = (
            index.and_then(|i| tokens.get(i)),
            index.and_then(|i| rendered.get(i)),
        ) else {
            out.push_str(whole.as_str());
            continue;
        };

        if in_tag {
            out.push_str(&escape_html(&token.source));
            continue;
        }

        if token.kind == MathKind::Block && out.ends_with("<p>") && html[copied..].starts_with("</p>") {
            out.truncate(out.len() - "<p>".len());
            copied += "</p>".len();
        }
        out.push_str(markup);
    }

    out.push_str(&html[copied..]);
    out
}

fn inside_tag_after(segment: &str, was_inside: bool) -> bool {
    match (segment.rfind('<'), segment.rfind('>')) {
        (Some(open), Some(close)) => open > close,
        (Some(_), None) => true,
        (None, Some(_)) => false,
        (None, None) => was_inside,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::testing::FakeTypesetter;

    fn extraction_of(tokens: Vec<MathToken>) -> MathExtraction {
        MathExtraction {
            tokens,
            ..MathExtraction::default()
        }
    }

    fn sources(markdown: &str) -> Vec<(MathKind, String)> {
        extract_math(markdown)
            .tokens
            .into_iter()
            .map(|t| (t.kind, t.source))
            .collect()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Inline rule
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_inline_simple() {
        let extraction = extract_math("$a+b$");
        assert_eq!(extraction.tokens, vec![MathToken::new(MathKind::Inline, "a+b")]);
        assert_eq!(extraction.markdown, placeholder(0, 0));
    }

    #[test]
    fn test_inline_escaped_dollar_inside_span() {
        assert_eq!(
            sources(r"$a\$b$"),
            vec![(MathKind::Inline, r"a\$b".to_string())]
        );
    }

    #[test]
    fn test_inline_unterminated_is_literal() {
        let extraction = extract_math("$unterminated");
        assert!(extraction.tokens.is_empty());
        assert_eq!(extraction.markdown, "$unterminated");
    }

    #[test]
    fn test_inline_escaped_opening_is_literal() {
        let extraction = extract_math(r"costs \$5 and \$6");
        assert!(extraction.tokens.is_empty());
    }

    #[test]
    fn test_inline_within_text() {
        let extraction = extract_math("Euler: $e^{i\\pi}+1=0$, done.");
        assert_eq!(extraction.tokens.len(), 1);
        assert_eq!(extraction.tokens[0].source, "e^{i\\pi}+1=0");
        assert_eq!(extraction.markdown, format!("Euler: {}, done.", placeholder(0, 0)));
    }

    #[test]
    fn test_inline_spans_lines_within_paragraph() {
        assert_eq!(
            sources("start $a\nb$ end"),
            vec![(MathKind::Inline, "a\nb".to_string())]
        );
    }

    #[test]
    fn test_inline_does_not_cross_paragraphs() {
        assert!(sources("one $a\n\nb$ two").is_empty());
    }

    #[test]
    fn test_inline_skips_code_spans() {
        assert!(sources("use `$x$` literally").is_empty());
        assert_eq!(sources("`a` $x$").len(), 1);
    }

    #[test]
    fn test_double_dollar_inside_paragraph_is_empty_inline() {
        assert_eq!(
            sources("text $$ more"),
            vec![(MathKind::Inline, String::new())]
        );
    }

    #[test]
    fn test_inline_in_heading() {
        assert_eq!(
            sources("# Area $r^2$\n"),
            vec![(MathKind::Inline, "r^2".to_string())]
        );
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Block rule
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_block_multiline() {
        let extraction = extract_math("$$\nx^2\n$$\n");
        assert_eq!(extraction.tokens, vec![MathToken::new(MathKind::Block, "x^2")]);
        assert_eq!(extraction.markdown, format!("{}\n\n", placeholder(0, 0)));
    }

    #[test]
    fn test_block_first_line_content() {
        assert_eq!(
            sources("$$ a +\nb $$\nafter"),
            vec![(MathKind::Block, "a +\nb".to_string())]
        );
    }

    #[test]
    fn test_block_single_line() {
        let extraction = extract_math("$$x^2$$\nNext paragraph $y$\n");
        assert_eq!(
            extraction.tokens,
            vec![
                MathToken::new(MathKind::Block, "x^2"),
                MathToken::new(MathKind::Inline, "y"),
            ]
        );
    }

    #[test]
    fn test_block_unterminated_consumes_rest() {
        let extraction = extract_math("$$\na\nb");
        assert_eq!(extraction.tokens, vec![MathToken::new(MathKind::Block, "a\nb")]);
        assert_eq!(extraction.markdown, format!("{}\n\n", placeholder(0, 0)));
    }

    #[test]
    fn test_block_inner_dollars_not_special() {
        assert_eq!(
            sources("$$\na $b$ c\n$$"),
            vec![(MathKind::Block, "a $b$ c".to_string())]
        );
    }

    #[test]
    fn test_block_does_not_interrupt_paragraph() {
        let extraction = extract_math("para\n$$\nx\n$$\n");
        assert!(extraction.tokens.iter().all(|t| t.kind == MathKind::Inline));
    }

    #[test]
    fn test_block_after_heading() {
        assert_eq!(
            sources("# Title\n$$\nx\n$$\n"),
            vec![(MathKind::Block, "x".to_string())]
        );
    }

    #[test]
    fn test_code_is_untouched() {
        let markdown = "```\n$$\nx\n$$\n```\n\n    $indented$\n";
        let extraction = extract_math(markdown);
        assert!(extraction.tokens.is_empty());
        assert_eq!(extraction.markdown, markdown);
    }

    #[test]
    fn test_html_tags_are_skipped() {
        assert!(sources("<a title=\"$x$\">link</a>").is_empty());
        assert!(sources("<img alt='$a$' data-x=$b$ /> <!-- $c$ -->").is_empty());
        assert_eq!(sources("<a href=\"x\">$x$</a><br/>").len(), 1);
    }

    #[test]
    fn test_less_than_in_prose_is_not_a_tag() {
        assert_eq!(
            sources("Given 0<x, then $x^2$ is positive and y>0."),
            vec![(MathKind::Inline, "x^2".to_string())]
        );
        assert_eq!(
            sources("if a<b then $a$ and b>a"),
            vec![(MathKind::Inline, "a".to_string())]
        );
        assert_eq!(sources("a<b c $x$ d>e").len(), 1);
        assert_eq!(sources("</x $y$ >").len(), 1);
    }

    #[test]
    fn test_autolink_is_skipped() {
        assert!(sources("<https://example.com/$a$b>").is_empty());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Placeholders
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_nonce_avoids_source_text() {
        assert_eq!(extract_math("$x$").nonce, 0);

        let extraction = extract_math("\u{E000}0:0\u{E001} $x$");
        assert_eq!(extraction.nonce, 1);
        assert!(extraction.markdown.ends_with(&extraction.placeholder(0)));

        let extraction = extract_math("&#xE000;0:0&#xE001; $x$");
        assert_eq!(extraction.nonce, 1);
    }

    #[test]
    fn test_lookalike_placeholder_is_not_substituted() {
        let extraction = extract_math("lit \u{E000}0\u{E001} and \u{E000}0:0\u{E001} and $y$");
        let html = format!("<p>{}</p>", extraction.markdown);
        let out = substitute_placeholders(&html, &extraction, &["<span>Y</span>".to_string()]);
        assert_eq!(
            out,
            "<p>lit \u{E000}0\u{E001} and \u{E000}0:0\u{E001} and <span>Y</span></p>"
        );
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Typesetting and substitution
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_typeset_failure_is_isolated() {
        let tokens = vec![
            MathToken::new(MathKind::Inline, "a"),
            MathToken::new(MathKind::Inline, r"\fail<"),
            MathToken::new(MathKind::Block, r"\fail"),
        ];
        let rendered = typeset_tokens(&tokens, Some(&FakeTypesetter as &dyn Typesetter));
        assert_eq!(rendered[0], r#"<span class="katex">a</span>"#);
        assert_eq!(rendered[1], r#"<span class="katex-error">\fail&lt;</span>"#);
        assert_eq!(rendered[2], r#"<div class="katex-error">\fail</div>"#);
    }

    #[test]
    fn test_missing_typesetter_marks_spans() {
        let tokens = vec![MathToken::new(MathKind::Inline, "x")];
        let rendered = typeset_tokens(&tokens, None);
        assert_eq!(rendered[0], r#"<span class="katex-error">x</span>"#);
    }

    #[test]
    fn test_block_replaces_paragraph() {
        let extraction = extraction_of(vec![MathToken::new(MathKind::Block, "x")]);
        let html = format!("<p>{}</p>\n", placeholder(0, 0));
        let out = substitute_placeholders(&html, &extraction, &["<div>X</div>".to_string()]);
        assert_eq!(out, "<div>X</div>\n");
    }

    #[test]
    fn test_inline_keeps_paragraph() {
        let extraction = extraction_of(vec![MathToken::new(MathKind::Inline, "x")]);
        let html = format!("<p>{}</p>\n", placeholder(0, 0));
        let out = substitute_placeholders(&html, &extraction, &["<span>X</span>".to_string()]);
        assert_eq!(out, "<p><span>X</span></p>\n");
    }

    #[test]
    fn test_placeholder_in_attribute_gets_source() {
        let extraction = extraction_of(vec![MathToken::new(MathKind::Inline, "a<b")]);
        let html = format!("<p><img src=\"x.png\" alt=\"{}\" /></p>", placeholder(0, 0));
        let out = substitute_placeholders(&html, &extraction, &["<span>X</span>".to_string()]);
        assert_eq!(out, "<p><img src=\"x.png\" alt=\"a&lt;b\" /></p>");
    }

    #[test]
    fn test_unknown_placeholder_left_alone() {
        let extraction = extraction_of(vec![MathToken::new(MathKind::Inline, "x")]);
        let html = format!("<p>{}</p>", placeholder(0, 7));
        assert_eq!(substitute_placeholders(&html, &extraction, &["X".to_string()]), html);
    }
}
