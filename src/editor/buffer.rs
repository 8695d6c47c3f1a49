//! The editor buffer: single source of truth for document text.

use super::sample::SAMPLE_DOCUMENT;
use super::stats::TextStats;
use crate::error::ResultExt;
use crate::host::Prompt;
use crate::storage::{KeyValueStore, CONTENT_KEY};
use log::{debug, warn};
use std::rc::Rc;

/// Confirmation shown before the buffer is discarded.
pub const CLEAR_CONFIRMATION: &str = "Are you sure you want to clear the editor?";

/// Owns the document text, persists it on every change and keeps the
/// derived word/character statistics current.
pub struct EditorBuffer {
    text: String,
    stats: TextStats,
    store: Rc<dyn KeyValueStore>,
}

impl EditorBuffer {
    /// Open the buffer with whatever text was persisted last.
    pub fn open(store: Rc<dyn KeyValueStore>) -> Self {
        let mut buffer = Self {
            text: String::new(),
            stats: TextStats::from_text(""),
            store,
        };
        let saved = buffer.load();
        buffer.stats = TextStats::from_text(&saved);
        buffer.text = saved;
        buffer
    }

    /// Persisted text, or an empty string if none exists or storage is
    /// unavailable.
    pub fn load(&self) -> String {
        self.store
            .get(CONTENT_KEY)
            .map(Option::unwrap_or_default)
            .unwrap_or_warn_default(String::new(), "Failed to load content")
    }

    /// Persist `text`. Failures are logged; the text stays usable in-session.
    ///
    /// Returns `true` if the text was written.
    pub fn save(&self, text: &str) -> bool {
        match self.store.set(CONTENT_KEY, text) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to save content: {}", e);
                false
            }
        }
    }

    /// Current document text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Statistics of the current text.
    pub fn stats(&self) -> TextStats {
        self.stats
    }

    /// Whether the buffer holds only whitespace.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Replace the text after an edit: persist and recount.
    pub fn set_text(&mut self, text: impl Into<String>) -> TextStats {
        self.text = text.into();
        self.save(&self.text);
        self.stats = TextStats::from_text(&self.text);
        self.stats
    }

    /// Replace the text with the built-in sample document.
    pub fn load_sample(&mut self) -> TextStats {
        debug!("Loading sample document");
        self.set_text(SAMPLE_DOCUMENT)
    }

    /// Discard the text after explicit confirmation.
    ///
    /// Returns `true` if the buffer was cleared; the caller re-renders.
    pub fn clear(&mut self, prompt: &dyn Prompt) -> bool {
        if !prompt.confirm(CLEAR_CONFIRMATION) {
            debug!("Clear cancelled");
            return false;
        }
        self.set_text(String::new());
        true
    }
}
