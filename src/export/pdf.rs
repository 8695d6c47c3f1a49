//! PDF export
//!
//! Two strategies produce a paginated document:
//!
//! - **Direct print** hands the preview to the host's print facility. The
//!   caller hides the chrome around it and restores it on a timer.
//! - **Programmatic** copies the preview into an off-screen container of A4
//!   width, inlines its images, rasterizes it, slices the raster into pages
//!   and assembles them into a PDF.
//!
//! Long documents ask the user which strategy to use, since the
//! programmatic path struggles with large content. A failing programmatic
//! export offers direct printing instead.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use regex::{Captures, Regex};
use std::sync::OnceLock;
use std::time::Duration;

use super::html::document_styles;
use super::options::{
    Artifact, FONT_FAMILY, IMAGE_LOAD_TIMEOUT, JPEG_QUALITY, LONG_DOCUMENT_THRESHOLD,
    PDF_CONTAINER_PADDING_PX, PDF_CONTAINER_WIDTH_PX, PDF_LINE_HEIGHT, RASTER_SCALE,
};
use super::paginate::paginate;
use super::{ExportKind, ExportSnapshot};
use crate::config::Preferences;
use crate::error::{Error, Result};
use crate::host::{Capabilities, ImageLoader, PageSetup, Prompt, RasterRequest};
use crate::markdown::{decode_entities, escape_html};
use crate::theme::ThemeColors;

/// Notice shown when the rasterizer or page assembler is missing.
pub const PDF_UNAVAILABLE_MESSAGE: &str =
    "PDF libraries not available. Use direct printing (Ctrl+P)";

// ─────────────────────────────────────────────────────────────────────────────
// Strategy Selection
// ─────────────────────────────────────────────────────────────────────────────

/// How a PDF gets produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdfStrategy {
    /// The host's print dialog
    DirectPrint,
    /// Rasterize, paginate, assemble
    Programmatic,
}

impl PdfStrategy {
    /// Pick a strategy for a preview with `text_len` characters of text.
    ///
    /// Short documents go straight to the programmatic path. Longer ones
    /// ask; OK means direct printing.
    pub fn select(text_len: usize, prompt: &dyn Prompt) -> Self {
        if text_len <= LONG_DOCUMENT_THRESHOLD {
            return PdfStrategy::Programmatic;
        }
        if prompt.confirm(&long_document_message(text_len)) {
            PdfStrategy::DirectPrint
        } else {
            PdfStrategy::Programmatic
        }
    }
}

/// What a PDF export ended in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PdfOutcome {
    /// Handed to the printer. `fallback` is set when the programmatic path
    /// failed first.
    Printed { fallback: bool },
    /// Assembled and saved
    Downloaded(Artifact),
}

/// Strategy question for long documents.
pub fn long_document_message(text_len: usize) -> String {
    let thousands = (text_len as f64 / 1000.0).round() as u64;
    format!(
        "Long document ({}k characters)\n\n\
         For best results, use:\n\
         ✓ Direct printing (recommended)\n\
         ✗ Automatic export (may cause issues)\n\n\
         Press OK for direct printing\n\
         Press Cancel for automatic export",
        thousands
    )
}

/// Question offering direct printing after a failed programmatic export.
pub fn fallback_message(err: &Error) -> String {
    let reason = match err {
        Error::Export { message, .. } => message.clone(),
        other => other.to_string(),
    };
    format!(
        "Failed to export PDF: {}\n\nDo you want to use direct printing instead?",
        reason
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Off-screen Container
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
thread_local! {
    static LIVE_CONTAINERS: std::cell::Cell<usize> = const { std::cell::Cell::new(0) };
}

/// Containers currently alive on this thread.
#[cfg(test)]
pub(crate) fn live_containers() -> usize {
    LIVE_CONTAINERS.with(|c| c.get())
}

/// A page-width copy of the preview, styled like the preview.
///
/// Lives only for one export; dropping it removes it.
#[derive(Debug)]
pub struct OffscreenContainer {
    html: String,
}

impl OffscreenContainer {
    pub fn new(markup: &str, prefs: &Preferences) -> Self {
        let colors = ThemeColors::for_theme(prefs.theme);
        let html = format!(
            "<style>\n{styles}\n</style>\n\
             <div class=\"pdf-container\" dir=\"{dir}\" style=\"width: {width}px; \
             padding: {padding}px; background-color: {bg}; color: {text}; \
             font-family: {font}; font-size: {size}px; line-height: {line_height};\">\n\
             {markup}\n</div>",
            styles = document_styles(prefs),
            dir = prefs.direction.as_str(),
            width = PDF_CONTAINER_WIDTH_PX,
            padding = PDF_CONTAINER_PADDING_PX,
            bg = colors.background,
            text = colors.text,
            font = FONT_FAMILY,
            size = prefs.font_size.px(),
            line_height = PDF_LINE_HEIGHT,
            markup = markup,
        );

        #[cfg(test)]
        LIVE_CONTAINERS.with(|c| c.set(c.get() + 1));
        debug!("Created off-screen container ({} bytes)", html.len());
        Self { html }
    }

    pub fn html(&self) -> &str {
        &self.html
    }
}

impl Drop for OffscreenContainer {
    fn drop(&mut self) {
        #[cfg(test)]
        LIVE_CONTAINERS.with(|c| c.set(c.get().saturating_sub(1)));
        debug!("Removed off-screen container");
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Image Inlining
// ─────────────────────────────────────────────────────────────────────────────

fn img_src_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(<img\b[^>]*?\ssrc=")([^"]*)(")"#).expect("img pattern should compile")
    })
}

/// Replace every loadable `<img src>` with a data URI.
///
/// Each image gets `timeout`; images that fail or time out keep their
/// original source.
pub fn inline_images(markup: &str, loader: &dyn ImageLoader, timeout: Duration) -> String {
    img_src_regex()
        .replace_all(markup, |caps: &Captures<'_>| {
            let src = decode_entities(&caps[2]);
            if src.starts_with("data:") {
                return caps[0].to_string();
            }
            match loader.load(&src, timeout) {
                Some(image) => format!(
                    "{}data:{};base64,{}{}",
                    &caps[1],
                    escape_html(&image.mime),
                    STANDARD.encode(&image.bytes),
                    &caps[3]
                ),
                None => {
                    warn!("Image did not load in time, leaving as is: {}", src);
                    caps[0].to_string()
                }
            }
        })
        .into_owned()
}

// ─────────────────────────────────────────────────────────────────────────────
// Programmatic Path
// ─────────────────────────────────────────────────────────────────────────────

/// Whether the programmatic path can run at all.
pub fn programmatic_available(caps: &Capabilities) -> bool {
    caps.rasterizer.is_some() && caps.page_assembler.is_some()
}

/// Produce a `.pdf` artifact from the preview without the print dialog.
pub fn render_pdf(
    snapshot: &ExportSnapshot<'_>,
    caps: &Capabilities,
    now: DateTime<Utc>,
) -> Result<Artifact> {
    let rasterizer = caps.require_rasterizer()?;
    let assembler = caps.require_page_assembler()?;
    let setup = PageSetup::A4;

    let markup = match caps.image_loader.as_deref() {
        Some(loader) => inline_images(snapshot.markup, loader, IMAGE_LOAD_TIMEOUT),
        None => snapshot.markup.to_string(),
    };

    let container = OffscreenContainer::new(&markup, &snapshot.preferences);
    let colors = ThemeColors::for_theme(snapshot.preferences.theme);

    let raster = rasterizer
        .rasterize(&RasterRequest {
            html: container.html(),
            width_px: Some(PDF_CONTAINER_WIDTH_PX),
            scale: RASTER_SCALE,
            background: colors.background,
        })
        .map_err(|e| Error::export(ExportKind::Pdf, e.to_string()))?;

    let pages = paginate(&raster, &setup, JPEG_QUALITY)
        .map_err(|e| Error::export(ExportKind::Pdf, e.to_string()))?;
    let bytes = assembler
        .assemble(&pages, &setup)
        .map_err(|e| Error::export(ExportKind::Pdf, e.to_string()))?;

    info!("Assembled PDF with {} pages ({} bytes)", pages.len(), bytes.len());
    Ok(Artifact::for_kind(ExportKind::Pdf, now, bytes))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Direction, FontSize, Theme};
    use crate::host::testing::{FakeAssembler, FakeImageLoader, FakeRasterizer, ScriptedPrompt};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn caps(rasterizer: FakeRasterizer, assembler: FakeAssembler) -> Capabilities {
        Capabilities::none()
            .with_rasterizer(rasterizer)
            .with_page_assembler(assembler)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Strategy selection
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_long_document_prompts() {
        let prompt = ScriptedPrompt::answering(true);
        assert_eq!(PdfStrategy::select(10_001, &prompt), PdfStrategy::DirectPrint);
        assert_eq!(prompt.confirmations().len(), 1);
        assert!(prompt.confirmations()[0].starts_with("Long document (10k characters)"));
    }

    #[test]
    fn test_short_document_does_not_prompt() {
        let prompt = ScriptedPrompt::answering(true);
        assert_eq!(PdfStrategy::select(9_999, &prompt), PdfStrategy::Programmatic);
        assert_eq!(PdfStrategy::select(10_000, &prompt), PdfStrategy::Programmatic);
        assert!(prompt.confirmations().is_empty());
    }

    #[test]
    fn test_cancel_selects_programmatic() {
        let prompt = ScriptedPrompt::answering(false);
        assert_eq!(PdfStrategy::select(25_400, &prompt), PdfStrategy::Programmatic);
        assert!(prompt.confirmations()[0].contains("(25k characters)"));
    }

    #[test]
    fn test_fallback_message() {
        let err = Error::export(ExportKind::Pdf, "canvas exploded");
        assert_eq!(
            fallback_message(&err),
            "Failed to export PDF: canvas exploded\n\nDo you want to use direct printing instead?"
        );
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Container and images
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_container_copies_presentation() {
        let prefs = Preferences {
            theme: Theme::Sepia,
            font_size: FontSize::new(18).unwrap(),
            direction: Direction::Rtl,
        };
        let container = OffscreenContainer::new("<p>x</p>", &prefs);
        let html = container.html();
        assert!(html.contains("dir=\"rtl\""));
        assert!(html.contains("width: 794px;"));
        assert!(html.contains("padding: 40px;"));
        assert!(html.contains("background-color: #f4ecd8;"));
        assert!(html.contains("font-size: 18px;"));
        assert!(html.contains("line-height: 1.6;"));
        assert!(html.contains("<p>x</p>"));
    }

    #[test]
    fn test_container_is_removed_on_drop() {
        let before = live_containers();
        {
            let _c = OffscreenContainer::new("", &Preferences::default());
            assert_eq!(live_containers(), before + 1);
        }
        assert_eq!(live_containers(), before);
    }

    #[test]
    fn test_inline_images() {
        let loader = FakeImageLoader::default();
        let markup = r#"<p><img src="https://a.test/ok.png" alt="a"><img src="slow.png" alt="b"><img src="data:image/gif;base64,R0"></p>"#;
        let out = inline_images(markup, &loader, IMAGE_LOAD_TIMEOUT);

        assert!(out.contains(r#"<img src="data:image/png;base64,AQID" alt="a">"#));
        assert!(out.contains(r#"<img src="slow.png" alt="b">"#));
        assert!(out.contains("data:image/gif;base64,R0"));

        let requested = loader.requested();
        assert_eq!(requested.len(), 2);
        assert!(requested.iter().all(|(_, t)| *t == Duration::from_secs(3)));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Programmatic path
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_render_pdf() {
        let rasterizer = FakeRasterizer::new(5000);
        let assembler = FakeAssembler::default();
        let caps = caps(rasterizer.clone(), assembler.clone());
        let snapshot = ExportSnapshot::new("# x", "<h1>x</h1>", Preferences::default());

        let artifact = render_pdf(&snapshot, &caps, now()).unwrap();
        assert_eq!(artifact.file_name, "document-2024-05-01T12-00-00.pdf");
        assert_eq!(artifact.mime, "application/pdf");
        assert!(artifact.bytes.starts_with(b"%PDF"));

        let (html, width, scale, _) = rasterizer.requests().remove(0);
        assert!(html.contains("<h1>x</h1>"));
        assert_eq!(width, Some(794));
        assert_eq!(scale, 2.0);

        // 1588 px wide raster, 2315 px per page
        let pages = assembler.pages();
        assert_eq!(pages.len(), 3);
        assert!(pages.iter().all(|p| p.width_px == 1588));
        assert_eq!(live_containers(), 0);
    }

    #[test]
    fn test_render_pdf_failure_cleans_up() {
        let caps = caps(FakeRasterizer::failing(), FakeAssembler::default());
        let snapshot = ExportSnapshot::new("x", "<p>x</p>", Preferences::default());

        let err = render_pdf(&snapshot, &caps, now()).unwrap_err();
        assert!(matches!(err, Error::Export { kind: ExportKind::Pdf, .. }));
        assert_eq!(live_containers(), 0);
    }

    #[test]
    fn test_render_pdf_assembler_failure() {
        let assembler = FakeAssembler::failing();
        let caps = caps(FakeRasterizer::new(100), assembler.clone());
        let snapshot = ExportSnapshot::new("x", "<p>x</p>", Preferences::default());

        let err = render_pdf(&snapshot, &caps, now()).unwrap_err();
        assert!(fallback_message(&err).contains("assembler ran out of memory"));
        assert_eq!(assembler.calls(), 1);
        assert_eq!(live_containers(), 0);
    }

    #[test]
    fn test_programmatic_requires_both_providers() {
        let only_raster = Capabilities::none().with_rasterizer(FakeRasterizer::new(10));
        assert!(!programmatic_available(&only_raster));
        assert!(programmatic_available(&caps(
            FakeRasterizer::new(10),
            FakeAssembler::default()
        )));

        let snapshot = ExportSnapshot::new("x", "<p>x</p>", Preferences::default());
        assert!(matches!(
            render_pdf(&snapshot, &only_raster, now()),
            Err(Error::CapabilityUnavailable(_))
        ));
    }
}
