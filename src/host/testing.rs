//! Recording providers shared by unit tests.

use super::*;
use crate::export::Artifact;
use image::{Rgba, RgbaImage};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

// ─────────────────────────────────────────────────────────────────────────────
// Prompt
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Clone)]
pub struct ScriptedPrompt {
    answers: Rc<RefCell<VecDeque<bool>>>,
    fallback: bool,
    confirmations: Rc<RefCell<Vec<String>>>,
    alerts: Rc<RefCell<Vec<String>>>,
}

impl ScriptedPrompt {
    /// Answer every confirmation with `answer`.
    pub fn answering(answer: bool) -> Self {
        Self {
            fallback: answer,
            ..Self::default()
        }
    }

    /// Answer confirmations in order, then `false`.
    pub fn with_answers(answers: &[bool]) -> Self {
        Self {
            answers: Rc::new(RefCell::new(answers.iter().copied().collect())),
            ..Self::default()
        }
    }

    pub fn confirmations(&self) -> Vec<String> {
        self.confirmations.borrow().clone()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.borrow().clone()
    }
}

impl Prompt for ScriptedPrompt {
    fn confirm(&self, message: &str) -> bool {
        self.confirmations.borrow_mut().push(message.to_string());
        self.answers.borrow_mut().pop_front().unwrap_or(self.fallback)
    }

    fn alert(&self, message: &str) {
        self.alerts.borrow_mut().push(message.to_string());
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Downloads, Clipboard, Printer
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Clone)]
pub struct MemoryDownloads {
    saved: Rc<RefCell<Vec<Artifact>>>,
}

impl MemoryDownloads {
    pub fn saved(&self) -> Vec<Artifact> {
        self.saved.borrow().clone()
    }
}

impl Downloads for MemoryDownloads {
    fn save(&self, artifact: &Artifact) -> Result<()> {
        self.saved.borrow_mut().push(artifact.clone());
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct RecordingClipboard {
    pub fail: bool,
    written: Rc<RefCell<Vec<String>>>,
}

impl RecordingClipboard {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn written(&self) -> Vec<String> {
        self.written.borrow().clone()
    }
}

impl Clipboard for RecordingClipboard {
    fn write_text(&self, text: &str) -> Result<()> {
        if self.fail {
            return Err(Error::Clipboard("no clipboard".to_string()));
        }
        self.written.borrow_mut().push(text.to_string());
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct RecordingPrinter {
    printed: Rc<RefCell<Vec<String>>>,
}

impl RecordingPrinter {
    pub fn printed(&self) -> Vec<String> {
        self.printed.borrow().clone()
    }
}

impl Printer for RecordingPrinter {
    fn print(&self, document: &str) -> Result<()> {
        self.printed.borrow_mut().push(document.to_string());
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rendering Capabilities
// ─────────────────────────────────────────────────────────────────────────────

/// Wraps the source in a marker element; fails on `\fail`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FakeTypesetter;

impl Typesetter for FakeTypesetter {
    fn typeset(&self, source: &str, display_mode: bool) -> Result<String> {
        if source.contains("\\fail") {
            return Err(Error::Typeset {
                source: source.to_string(),
                message: "undefined control sequence".to_string(),
            });
        }
        let class = if display_mode { "katex-display" } else { "katex" };
        Ok(format!(
            "<span class=\"{}\">{}</span>",
            class,
            crate::markdown::escape_html(source)
        ))
    }
}

/// Produces a solid raster of a fixed height.
#[derive(Debug, Clone)]
pub struct FakeRasterizer {
    pub height: u32,
    pub keep_together: Vec<Range<u32>>,
    pub fail: bool,
    requests: Rc<RefCell<Vec<(String, Option<u32>, f32, Rgb)>>>,
}

impl FakeRasterizer {
    pub fn new(height: u32) -> Self {
        Self {
            height,
            keep_together: Vec::new(),
            fail: false,
            requests: Rc::default(),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(10)
        }
    }

    pub fn requests(&self) -> Vec<(String, Option<u32>, f32, Rgb)> {
        self.requests.borrow().clone()
    }
}

impl Rasterizer for FakeRasterizer {
    fn rasterize(&self, request: &RasterRequest<'_>) -> Result<Raster> {
        self.requests.borrow_mut().push((
            request.html.to_string(),
            request.width_px,
            request.scale,
            request.background,
        ));
        if self.fail {
            return Err(Error::Application("canvas exploded".to_string()));
        }
        let width = (request.width_px.unwrap_or(400) as f32 * request.scale) as u32;
        let Rgb(r, g, b) = request.background;
        Ok(Raster {
            image: RgbaImage::from_pixel(width, self.height, Rgba([r, g, b, 255])),
            keep_together: self.keep_together.clone(),
        })
    }
}

#[derive(Debug, Default, Clone)]
pub struct FakeAssembler {
    pub fail: bool,
    pages: Rc<RefCell<Vec<PageImage>>>,
    calls: Rc<Cell<usize>>,
}

impl FakeAssembler {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn pages(&self) -> Vec<PageImage> {
        self.pages.borrow().clone()
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl PageAssembler for FakeAssembler {
    fn assemble(&self, pages: &[PageImage], _setup: &PageSetup) -> Result<Vec<u8>> {
        self.calls.set(self.calls.get() + 1);
        if self.fail {
            return Err(Error::Application("assembler ran out of memory".to_string()));
        }
        self.pages.borrow_mut().extend_from_slice(pages);
        Ok(b"%PDF-1.7 fake".to_vec())
    }
}

/// Serves a fixed image for `ok.png`, nothing else.
#[derive(Debug, Default, Clone)]
pub struct FakeImageLoader {
    requested: Rc<RefCell<Vec<(String, Duration)>>>,
}

impl FakeImageLoader {
    pub fn requested(&self) -> Vec<(String, Duration)> {
        self.requested.borrow().clone()
    }
}

impl ImageLoader for FakeImageLoader {
    fn load(&self, src: &str, timeout: Duration) -> Option<LoadedImage> {
        self.requested.borrow_mut().push((src.to_string(), timeout));
        src.ends_with("ok.png").then(|| LoadedImage {
            mime: "image/png".to_string(),
            bytes: vec![1, 2, 3],
        })
    }
}
