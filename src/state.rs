//! UI state for mdpad
//!
//! Control labels, chrome visibility and the status line. The host reads
//! these after every action to redraw its controls; `App` is the only
//! writer.

use std::collections::HashMap;

use crate::export::ExportKind;

// ─────────────────────────────────────────────────────────────────────────────
// Labels
// ─────────────────────────────────────────────────────────────────────────────

/// Fullscreen control while the preview is embedded.
pub const FULLSCREEN_ENTER_LABEL: &str = "⛶";
/// Fullscreen control while the preview is fullscreen.
pub const FULLSCREEN_EXIT_LABEL: &str = "✕";
/// Copy control while idle.
pub const COPY_IDLE_LABEL: &str = "📋";
/// Copy control after a successful copy.
pub const COPY_DONE_LABEL: &str = "✓";
/// PNG control while rasterizing.
pub const PNG_BUSY_LABEL: &str = "⏳ Generating...";
/// PDF control while converting.
pub const PDF_BUSY_LABEL: &str = "⏳ Converting...";
/// PDF control after a download.
pub const PDF_DONE_LABEL: &str = "✓ Downloaded";

// ─────────────────────────────────────────────────────────────────────────────
// Deferred Tasks
// ─────────────────────────────────────────────────────────────────────────────

/// UI effects undone after a fixed delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
    /// Show the chrome hidden for printing
    RestoreChrome,
    /// Put the copy control back to its idle label
    RestoreCopyLabel,
    /// Put an export control back to its idle label
    RestoreExportLabel(ExportKind),
}

// ─────────────────────────────────────────────────────────────────────────────
// UI State
// ─────────────────────────────────────────────────────────────────────────────

/// Visible state of the controls around the editor and preview.
#[derive(Debug, Clone)]
pub struct UiState {
    /// Whether toolbars and the editor pane are shown (hidden while printing)
    pub chrome_visible: bool,
    /// Fullscreen control label
    pub fullscreen_label: &'static str,
    /// Copy control label
    pub copy_label: &'static str,
    /// Status line, e.g. `"150 words, 892 chars"`
    pub status: String,
    export_labels: HashMap<ExportKind, String>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            chrome_visible: true,
            fullscreen_label: FULLSCREEN_ENTER_LABEL,
            copy_label: COPY_IDLE_LABEL,
            status: String::new(),
            export_labels: ExportKind::all()
                .iter()
                .map(|kind| (*kind, kind.idle_label()))
                .collect(),
        }
    }
}

impl UiState {
    /// Current label of the export control for `kind`.
    pub fn export_label(&self, kind: ExportKind) -> &str {
        self.export_labels
            .get(&kind)
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn set_export_label(&mut self, kind: ExportKind, label: impl Into<String>) {
        self.export_labels.insert(kind, label.into());
    }

    pub fn reset_export_label(&mut self, kind: ExportKind) {
        self.set_export_label(kind, kind.idle_label());
    }

    /// Apply a deferred task that came due.
    pub fn apply(&mut self, task: Deferred) {
        match task {
            Deferred::RestoreChrome => self.chrome_visible = true,
            Deferred::RestoreCopyLabel => self.copy_label = COPY_IDLE_LABEL,
            Deferred::RestoreExportLabel(kind) => self.reset_export_label(kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_labels() {
        let ui = UiState::default();
        assert!(ui.chrome_visible);
        assert_eq!(ui.fullscreen_label, "⛶");
        assert_eq!(ui.export_label(ExportKind::Png), "⬇️ .png");
        assert_eq!(ui.export_label(ExportKind::Pdf), "⬇️ .pdf");
    }

    #[test]
    fn test_deferred_tasks_restore() {
        let mut ui = UiState::default();
        ui.chrome_visible = false;
        ui.copy_label = COPY_DONE_LABEL;
        ui.set_export_label(ExportKind::Pdf, PDF_DONE_LABEL);

        ui.apply(Deferred::RestoreChrome);
        ui.apply(Deferred::RestoreCopyLabel);
        ui.apply(Deferred::RestoreExportLabel(ExportKind::Pdf));

        assert!(ui.chrome_visible);
        assert_eq!(ui.copy_label, COPY_IDLE_LABEL);
        assert_eq!(ui.export_label(ExportKind::Pdf), "⬇️ .pdf");
    }
}
