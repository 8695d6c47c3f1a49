//! Export artifacts and fixed export parameters
//!
//! This module defines the downloadable `Artifact`, the timestamped file
//! names every export uses, and the constants shared by the raster and
//! paginated export paths.

use chrono::{DateTime, Utc};
use std::time::Duration;

use super::ExportKind;

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Rendered text length above which PDF export asks for a strategy.
pub const LONG_DOCUMENT_THRESHOLD: usize = 10_000;

/// How long the PDF path waits for each image.
pub const IMAGE_LOAD_TIMEOUT: Duration = Duration::from_secs(3);

/// Supersampling factor for PNG and PDF rasters.
pub const RASTER_SCALE: f32 = 2.0;

/// Width of the off-screen PDF container (A4 at 96 dpi).
pub const PDF_CONTAINER_WIDTH_PX: u32 = 794;

/// Padding around the off-screen PDF container content.
pub const PDF_CONTAINER_PADDING_PX: u32 = 40;

/// Line height of the off-screen PDF container.
pub const PDF_LINE_HEIGHT: f32 = 1.6;

/// JPEG quality of PDF page slices.
pub const JPEG_QUALITY: u8 = 92;

/// Font stack of the preview, copied onto exported containers.
pub const FONT_FAMILY: &str =
    "-apple-system, BlinkMacSystemFont, 'Segoe UI', 'Roboto', 'Helvetica', 'Arial', sans-serif";

// ─────────────────────────────────────────────────────────────────────────────
// Artifact
// ─────────────────────────────────────────────────────────────────────────────

/// A file handed to the host's download facility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Suggested file name, e.g. `document-2024-05-01T12-30-00.md`
    pub file_name: String,
    /// MIME type of the content
    pub mime: String,
    /// File content
    pub bytes: Vec<u8>,
}

impl Artifact {
    pub fn new(file_name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// Build an artifact named for `kind` at `now`.
    pub fn for_kind(kind: ExportKind, now: DateTime<Utc>, bytes: Vec<u8>) -> Self {
        Self::new(file_name(kind, now), kind.mime(), bytes)
    }
}

/// Timestamp used in file names: ISO 8601 in UTC, seconds precision,
/// with `:` replaced by `-`.
pub fn timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%dT%H-%M-%S").to_string()
}

/// `document-<timestamp>.<ext>`
pub fn file_name(kind: ExportKind, now: DateTime<Utc>) -> String {
    format!("document-{}.{}", timestamp(now), kind.extension())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
