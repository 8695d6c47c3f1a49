//! Clipboard Operations for Preview Markup
//!
//! This module copies the preview's current markup to the system clipboard
//! as text, using the arboard crate.

use arboard::Clipboard as SystemBoard;
use log::{error, info};

use crate::error::{Error, Result};
use crate::host::Clipboard;

/// Notice shown when the clipboard write fails.
pub const COPY_FAILED_MESSAGE: &str = "Failed to copy HTML to clipboard";

// ─────────────────────────────────────────────────────────────────────────────
// System Clipboard
// ─────────────────────────────────────────────────────────────────────────────

/// The platform clipboard.
///
/// A fresh arboard handle is opened per write, so a clipboard that becomes
/// available later still works.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<()> {
        let mut clipboard = SystemBoard::new().map_err(|e| Error::Clipboard(e.to_string()))?;

        clipboard
            .set_text(text)
            .map_err(|e| Error::Clipboard(e.to_string()))?;

        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Clipboard Operations
// ─────────────────────────────────────────────────────────────────────────────

/// Copy preview markup to the clipboard.
///
/// # Arguments
///
/// * `markup` - The preview's current markup, copied as-is
/// * `clipboard` - Where to write it
pub fn copy_preview(markup: &str, clipboard: &dyn Clipboard) -> Result<()> {
    match clipboard.write_text(markup) {
        Ok(()) => {
            info!("Copied {} bytes of HTML to clipboard", markup.len());
            Ok(())
        }
        Err(e) => {
            error!("Clipboard copy failed: {}", e);
            Err(e)
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::testing::RecordingClipboard;

    #[test]
    fn test_copy_writes_markup_verbatim() {
        let clipboard = RecordingClipboard::default();
        copy_preview("<h1 id=\"a\">A</h1>", &clipboard).unwrap();
        assert_eq!(clipboard.written(), vec!["<h1 id=\"a\">A</h1>".to_string()]);
    }

    #[test]
    fn test_copy_failure_is_reported() {
        let err = copy_preview("<p>x</p>", &RecordingClipboard::failing()).unwrap_err();
        assert!(matches!(err, Error::Clipboard(_)));
    }

    // Note: SystemClipboard tests require a display/clipboard context
    // which isn't typically available in CI environments.
}
