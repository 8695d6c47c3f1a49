//! Document Export Module for mdpad
//!
//! This module produces downloadable artifacts from a snapshot of the
//! editor text and the preview markup. Exports never modify the document
//! or the preferences.
//!
//! # Supported Export Formats
//!
//! - **Markdown**: the document text, verbatim
//! - **HTML**: the preview markup in a standalone, styled document
//! - **PNG**: the preview rasterized at 2x
//! - **PDF**: paginated A4 output, either through the host's print dialog
//!   or assembled from page rasters
//! - **Clipboard**: the preview markup as text
//!
//! # Architecture
//!
//! - `options.rs` - artifacts, file names and export constants
//! - `html.rs` - standalone HTML document generation with theme styling
//! - `raster.rs` - PNG export
//! - `pdf.rs` - PDF strategies, off-screen container and fallback
//! - `paginate.rs` - slicing a raster into JPEG pages
//! - `assembler.rs` - pdf-writer page assembler
//! - `images.rs` - HTTP image loader for inlining images
//! - `clipboard.rs` - system clipboard provider
//! - `guard.rs` - per-kind in-flight flags

mod assembler;
mod clipboard;
mod guard;
pub mod html;
mod images;
pub mod options;
mod paginate;
pub mod pdf;
mod raster;

pub use assembler::PdfWriterAssembler;
pub use clipboard::{copy_preview, SystemClipboard, COPY_FAILED_MESSAGE};
pub use guard::{ExportGuard, InFlight};
pub use html::{export_html, standalone_document};
pub use images::HttpImageLoader;
pub use options::{file_name, timestamp, Artifact};
pub use paginate::paginate;
pub use pdf::{PdfOutcome, PdfStrategy};
pub use raster::export_png;

use crate::config::Preferences;
use chrono::{DateTime, Utc};
use std::fmt;

// ─────────────────────────────────────────────────────────────────────────────
// Export Kind
// ─────────────────────────────────────────────────────────────────────────────

/// The four downloadable formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportKind {
    Markdown,
    Html,
    Png,
    Pdf,
}

impl ExportKind {
    /// Get all export kinds.
    pub fn all() -> &'static [ExportKind] {
        &[
            ExportKind::Markdown,
            ExportKind::Html,
            ExportKind::Png,
            ExportKind::Pdf,
        ]
    }

    /// Get the display label for this format.
    pub fn label(&self) -> &'static str {
        match self {
            ExportKind::Markdown => "Markdown",
            ExportKind::Html => "HTML",
            ExportKind::Png => "PNG",
            ExportKind::Pdf => "PDF",
        }
    }

    /// Get the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportKind::Markdown => "md",
            ExportKind::Html => "html",
            ExportKind::Png => "png",
            ExportKind::Pdf => "pdf",
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            ExportKind::Markdown => "text/markdown",
            ExportKind::Html => "text/html",
            ExportKind::Png => "image/png",
            ExportKind::Pdf => "application/pdf",
        }
    }

    /// Text of the triggering control while idle.
    pub fn idle_label(&self) -> String {
        format!("⬇️ .{}", self.extension())
    }
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Snapshot
// ─────────────────────────────────────────────────────────────────────────────

/// What an export reads: the document text, the preview markup and the
/// preferences in effect.
#[derive(Debug, Clone, Copy)]
pub struct ExportSnapshot<'a> {
    pub text: &'a str,
    pub markup: &'a str,
    pub preferences: Preferences,
}

impl<'a> ExportSnapshot<'a> {
    pub fn new(text: &'a str, markup: &'a str, preferences: Preferences) -> Self {
        Self {
            text,
            markup,
            preferences,
        }
    }
}

/// The document text as a `.md` artifact.
pub fn export_markdown(text: &str, now: DateTime<Utc>) -> Artifact {
    Artifact::for_kind(ExportKind::Markdown, now, text.as_bytes().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_export_markdown_is_verbatim() {
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let text = "# Title\n\n$x$ and *emphasis*\r\n";
        let artifact = export_markdown(text, now);
        assert_eq!(artifact.bytes, text.as_bytes());
        assert_eq!(artifact.file_name, "document-2024-01-02T03-04-05.md");
        assert_eq!(artifact.mime, "text/markdown");
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(ExportKind::Pdf.label(), "PDF");
        assert_eq!(ExportKind::Png.idle_label(), "⬇️ .png");
        assert_eq!(ExportKind::all().len(), 4);
    }
}
