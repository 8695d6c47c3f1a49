//! PNG export
//!
//! The preview is rasterized by the host's rasterizer at 2x with the
//! theme background, then encoded with the `image` crate.

use chrono::{DateTime, Utc};
use image::ImageFormat;
use log::info;
use std::io::Cursor;

use super::html::standalone_document;
use super::options::{Artifact, RASTER_SCALE};
use super::{ExportKind, ExportSnapshot};
use crate::error::{Error, Result};
use crate::host::{RasterRequest, Rasterizer};
use crate::theme::ThemeColors;

/// Rasterize the preview into a `.png` artifact.
pub fn export_png(
    snapshot: &ExportSnapshot<'_>,
    rasterizer: &dyn Rasterizer,
    now: DateTime<Utc>,
) -> Result<Artifact> {
    let colors = ThemeColors::for_theme(snapshot.preferences.theme);
    let document = standalone_document(snapshot.markup, &snapshot.preferences);

    let raster = rasterizer.rasterize(&RasterRequest {
        html: &document,
        width_px: None,
        scale: RASTER_SCALE,
        background: colors.background,
    })?;

    let mut bytes = Vec::new();
    raster
        .image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| Error::export(ExportKind::Png, e.to_string()))?;

    info!(
        "Rendered PNG {}x{} ({} bytes)",
        raster.image.width(),
        raster.image.height(),
        bytes.len()
    );
    Ok(Artifact::for_kind(ExportKind::Png, now, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Preferences, Theme};
    use crate::host::testing::FakeRasterizer;
    use crate::theme::Rgb;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_png_export_scale_and_background() {
        let rasterizer = FakeRasterizer::new(30);
        let prefs = Preferences {
            theme: Theme::Dark,
            ..Preferences::default()
        };
        let snapshot = ExportSnapshot::new("x", "<p>x</p>", prefs);

        let artifact = export_png(&snapshot, &rasterizer, now()).unwrap();
        assert_eq!(artifact.mime, "image/png");
        assert!(artifact.file_name.ends_with(".png"));
        assert_eq!(&artifact.bytes[..8], b"\x89PNG\r\n\x1a\n");

        let requests = rasterizer.requests();
        assert_eq!(requests.len(), 1);
        let (html, width, scale, background) = &requests[0];
        assert!(html.contains("<p>x</p>"));
        assert_eq!(*width, None);
        assert_eq!(*scale, 2.0);
        assert_eq!(*background, Rgb(0x1e, 0x1e, 0x1e));
    }

    #[test]
    fn test_png_export_failure_propagates() {
        let snapshot = ExportSnapshot::new("x", "<p>x</p>", Preferences::default());
        assert!(export_png(&snapshot, &FakeRasterizer::failing(), now()).is_err());
    }
}
