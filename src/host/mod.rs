//! Host capabilities for mdpad
//!
//! Everything mdpad cannot do by itself is delegated to a capability
//! provider injected at construction time: asking the user, writing the
//! clipboard, printing, saving downloads, typesetting math, rasterizing
//! markup, assembling paginated documents and fetching images.
//!
//! Providers are optional. `Capabilities` holds each one as an `Option`
//! and call sites check presence once through `Capabilities::require_*`,
//! which turns an absent provider into `Error::CapabilityUnavailable`.
//!
//! # Architecture
//!
//! - `providers.rs` - bundled providers (terminal prompt, browser printer,
//!   directory downloads)
//! - `scheduler.rs` - deferred UI work for a single-threaded event loop

mod providers;
mod scheduler;
#[cfg(test)]
pub(crate) mod testing;

pub use providers::{BrowserPrinter, DirectoryDownloads, TerminalPrompt};
pub use scheduler::Scheduler;

use crate::error::{Error, Result};
use crate::export::Artifact;
use crate::theme::Rgb;
use image::RgbaImage;
use std::fmt;
use std::ops::Range;
use std::time::Duration;

// ─────────────────────────────────────────────────────────────────────────────
// Capability Identifiers
// ─────────────────────────────────────────────────────────────────────────────

/// Names of the optional capability providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Typesetter,
    Rasterizer,
    PageAssembler,
    ImageLoader,
    Clipboard,
    Printer,
}

impl Capability {
    /// Get a display label for the capability.
    pub fn label(&self) -> &'static str {
        match self {
            Capability::Typesetter => "Math typesetting",
            Capability::Rasterizer => "Rasterizer",
            Capability::PageAssembler => "PDF assembly",
            Capability::ImageLoader => "Image loading",
            Capability::Clipboard => "Clipboard",
            Capability::Printer => "Printing",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// User Interaction
// ─────────────────────────────────────────────────────────────────────────────

/// Blocking dialogs shown to the user.
pub trait Prompt {
    /// Ask an OK/Cancel question. `true` means OK.
    fn confirm(&self, message: &str) -> bool;

    /// Show a blocking notice.
    fn alert(&self, message: &str);
}

/// Receives finished export artifacts (the "download").
pub trait Downloads {
    fn save(&self, artifact: &Artifact) -> Result<()>;
}

/// System clipboard.
pub trait Clipboard {
    fn write_text(&self, text: &str) -> Result<()>;
}

/// The host's native print/paginate facility.
///
/// `document` is a complete HTML document containing only the preview
/// content. The call returns once the print request was handed over; no
/// completion signal is available.
pub trait Printer {
    fn print(&self, document: &str) -> Result<()>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Rendering Capabilities
// ─────────────────────────────────────────────────────────────────────────────

/// Math typesetting: TeX source in, markup out.
pub trait Typesetter {
    fn typeset(&self, source: &str, display_mode: bool) -> Result<String>;
}

/// What to rasterize and how.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterRequest<'a> {
    /// HTML fragment to rasterize, styles inlined
    pub html: &'a str,
    /// Layout width in CSS pixels, `None` for the natural width
    pub width_px: Option<u32>,
    /// Supersampling factor
    pub scale: f32,
    /// Canvas background
    pub background: Rgb,
}

/// Rasterized markup.
#[derive(Debug, Clone)]
pub struct Raster {
    pub image: RgbaImage,
    /// Vertical pixel ranges of elements that must not be split across
    /// pages (images, code, tables, table rows)
    pub keep_together: Vec<Range<u32>>,
}

/// Markup-to-raster rendering.
pub trait Rasterizer {
    fn rasterize(&self, request: &RasterRequest<'_>) -> Result<Raster>;
}

/// One page image handed to the page assembler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageImage {
    /// JPEG-encoded page content
    pub jpeg: Vec<u8>,
    pub width_px: u32,
    pub height_px: u32,
}

/// Paper geometry of the paginated document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSetup {
    pub width_mm: f32,
    pub height_mm: f32,
    pub margin_mm: f32,
}

impl PageSetup {
    /// A4 portrait with 10 mm margins.
    pub const A4: PageSetup = PageSetup {
        width_mm: 210.0,
        height_mm: 297.0,
        margin_mm: 10.0,
    };

    /// Printable width inside the margins.
    pub fn content_width_mm(&self) -> f32 {
        self.width_mm - 2.0 * self.margin_mm
    }

    /// Printable height inside the margins.
    pub fn content_height_mm(&self) -> f32 {
        self.height_mm - 2.0 * self.margin_mm
    }
}

/// Raster-to-paginated-document assembly.
pub trait PageAssembler {
    fn assemble(&self, pages: &[PageImage], setup: &PageSetup) -> Result<Vec<u8>>;
}

/// Image bytes fetched for inlining.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedImage {
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Image fetching with a per-image deadline.
pub trait ImageLoader {
    /// Fetch `src`, giving up after `timeout`. `None` on failure or timeout.
    fn load(&self, src: &str, timeout: Duration) -> Option<LoadedImage>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Capability Bundle
// ─────────────────────────────────────────────────────────────────────────────

/// All optional providers, wired once at startup.
#[derive(Default)]
pub struct Capabilities {
    pub typesetter: Option<Box<dyn Typesetter>>,
    pub rasterizer: Option<Box<dyn Rasterizer>>,
    pub page_assembler: Option<Box<dyn PageAssembler>>,
    pub image_loader: Option<Box<dyn ImageLoader>>,
    pub clipboard: Option<Box<dyn Clipboard>>,
    pub printer: Option<Box<dyn Printer>>,
}

impl Capabilities {
    /// No providers at all.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_typesetter(mut self, typesetter: impl Typesetter + 'static) -> Self {
        self.typesetter = Some(Box::new(typesetter));
        self
    }

    pub fn with_rasterizer(mut self, rasterizer: impl Rasterizer + 'static) -> Self {
        self.rasterizer = Some(Box::new(rasterizer));
        self
    }

    pub fn with_page_assembler(mut self, assembler: impl PageAssembler + 'static) -> Self {
        self.page_assembler = Some(Box::new(assembler));
        self
    }

    pub fn with_image_loader(mut self, loader: impl ImageLoader + 'static) -> Self {
        self.image_loader = Some(Box::new(loader));
        self
    }

    pub fn with_clipboard(mut self, clipboard: impl Clipboard + 'static) -> Self {
        self.clipboard = Some(Box::new(clipboard));
        self
    }

    pub fn with_printer(mut self, printer: impl Printer + 'static) -> Self {
        self.printer = Some(Box::new(printer));
        self
    }

    pub fn require_rasterizer(&self) -> Result<&dyn Rasterizer> {
        self.rasterizer
            .as_deref()
            .ok_or(Error::CapabilityUnavailable(Capability::Rasterizer))
    }

    pub fn require_page_assembler(&self) -> Result<&dyn PageAssembler> {
        self.page_assembler
            .as_deref()
            .ok_or(Error::CapabilityUnavailable(Capability::PageAssembler))
    }

    pub fn require_clipboard(&self) -> Result<&dyn Clipboard> {
        self.clipboard
            .as_deref()
            .ok_or(Error::CapabilityUnavailable(Capability::Clipboard))
    }

    pub fn require_printer(&self) -> Result<&dyn Printer> {
        self.printer
            .as_deref()
            .ok_or(Error::CapabilityUnavailable(Capability::Printer))
    }

    /// Which providers are present, for startup logging.
    pub fn present(&self) -> Vec<Capability> {
        [
            (self.typesetter.is_some(), Capability::Typesetter),
            (self.rasterizer.is_some(), Capability::Rasterizer),
            (self.page_assembler.is_some(), Capability::PageAssembler),
            (self.image_loader.is_some(), Capability::ImageLoader),
            (self.clipboard.is_some(), Capability::Clipboard),
            (self.printer.is_some(), Capability::Printer),
        ]
        .into_iter()
        .filter_map(|(present, capability)| present.then_some(capability))
        .collect()
    }
}
