//! Text statistics for the editor
//!
//! Word and character counts shown in the status line, recomputed on
//! every buffer change.

// ─────────────────────────────────────────────────────────────────────────────
// Counting Functions
// ─────────────────────────────────────────────────────────────────────────────

/// Count whitespace-delimited tokens after trimming.
///
/// Empty or whitespace-only text yields zero.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Raw length of the text in Unicode scalar values.
pub fn char_count(text: &str) -> usize {
    text.chars().count()
}

// ─────────────────────────────────────────────────────────────────────────────
// TextStats
// ─────────────────────────────────────────────────────────────────────────────

/// Counts shown in the status line.
///
/// # Example
///
/// ```
/// use mdpad::editor::TextStats;
///
/// let stats = TextStats::from_text("a b  c");
/// assert_eq!(stats.words, 3);
/// assert_eq!(stats.format_status(), "3 words, 6 chars");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextStats {
    /// See [`word_count`]
    pub words: usize,
    /// See [`char_count`]
    pub characters: usize,
}

impl TextStats {
    pub fn from_text(text: &str) -> Self {
        Self {
            words: word_count(text),
            characters: char_count(text),
        }
    }

    /// Format the statistics for the status line, e.g. `"150 words, 892 chars"`.
    pub fn format_status(&self) -> String {
        format!("{} words, {} chars", self.words, self.characters)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
