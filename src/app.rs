//! Main application wiring for mdpad
//!
//! `App` owns every component and exposes one method per user-facing
//! control. Components never reach each other directly: the app reads the
//! editor buffer, hands the text to the render pipeline, and builds export
//! snapshots from the buffer and the preview surface.
//!
//! The host drives the app from a single-threaded loop. Delayed UI effects
//! (restoring labels, showing the chrome again after printing) are queued on
//! a `Scheduler` and applied by `tick`.

use chrono::Utc;
use log::{debug, error, info, warn};
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::config::{FontSize, PreferenceStore, Preferences, Presentation, Theme};
use crate::editor::{EditorBuffer, TextStats};
use crate::error::{Error, Result};
use crate::export::pdf::{
    fallback_message, programmatic_available, render_pdf, PDF_UNAVAILABLE_MESSAGE,
};
use crate::export::{
    copy_preview, export_html, export_markdown, export_png, standalone_document, Artifact,
    ExportGuard, ExportKind, ExportSnapshot, PdfOutcome, PdfStrategy, COPY_FAILED_MESSAGE,
};
use crate::host::{Capabilities, Capability, Downloads, Prompt, Scheduler};
use crate::preview::{PreviewSurface, RenderPipeline};
use crate::state::{
    Deferred, UiState, COPY_DONE_LABEL, FULLSCREEN_ENTER_LABEL, FULLSCREEN_EXIT_LABEL,
    PDF_BUSY_LABEL, PDF_DONE_LABEL, PNG_BUSY_LABEL,
};
use crate::storage::KeyValueStore;

/// Delay before the chrome returns after a print request.
pub const PRINT_RESTORE_DELAY: Duration = Duration::from_secs(1);

/// How long the copy control shows its success label.
pub const COPY_LABEL_DELAY: Duration = Duration::from_secs(2);

/// How long the PDF control shows its success label.
pub const PDF_LABEL_DELAY: Duration = Duration::from_secs(3);

/// Notice shown when no rasterizer is available.
pub const PNG_UNAVAILABLE_MESSAGE: &str = "PNG export is not available";

/// Notice shown when PNG export fails.
pub const PNG_FAILED_MESSAGE: &str = "Failed to export PNG";

// ─────────────────────────────────────────────────────────────────────────────
// App
// ─────────────────────────────────────────────────────────────────────────────

/// The editor, its preview and every control around them.
pub struct App {
    buffer: EditorBuffer,
    preference_store: PreferenceStore,
    presentation: Presentation,
    pipeline: RenderPipeline,
    preview: PreviewSurface,
    capabilities: Capabilities,
    prompt: Box<dyn Prompt>,
    downloads: Box<dyn Downloads>,
    guard: ExportGuard,
    scheduler: Scheduler<Deferred>,
    ui: UiState,
}

impl App {
    /// Wire all components and show the first render.
    ///
    /// This restores the persisted text and preferences, fills a blank
    /// buffer with the sample document, and renders the preview.
    pub fn new(
        store: Rc<dyn KeyValueStore>,
        capabilities: Capabilities,
        prompt: Box<dyn Prompt>,
        downloads: Box<dyn Downloads>,
    ) -> Self {
        let buffer = EditorBuffer::open(Rc::clone(&store));
        let mut preference_store = PreferenceStore::new(store);
        let mut presentation = Presentation::default();
        preference_store.init(&mut presentation);

        info!("Capabilities present: {:?}", capabilities.present());

        let mut app = Self {
            buffer,
            preference_store,
            presentation,
            pipeline: RenderPipeline::default(),
            preview: PreviewSurface::new(),
            capabilities,
            prompt,
            downloads,
            guard: ExportGuard::new(),
            scheduler: Scheduler::new(),
            ui: UiState::default(),
        };

        if app.buffer.is_blank() {
            app.buffer.load_sample();
        }
        app.refresh();
        app
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn text(&self) -> &str {
        self.buffer.text()
    }

    pub fn stats(&self) -> TextStats {
        self.buffer.stats()
    }

    pub fn preview(&self) -> &PreviewSurface {
        &self.preview
    }

    pub fn preferences(&self) -> Preferences {
        self.preference_store.current()
    }

    pub fn presentation(&self) -> &Presentation {
        &self.presentation
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    /// Deadline of the next deferred UI effect.
    pub fn next_due(&self) -> Option<Instant> {
        self.scheduler.next_due()
    }

    fn snapshot(&self) -> ExportSnapshot<'_> {
        ExportSnapshot::new(self.buffer.text(), self.preview.markup(), self.preferences())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Editing
    // ─────────────────────────────────────────────────────────────────────────

    /// The editor text changed.
    pub fn on_input(&mut self, text: impl Into<String>) {
        self.buffer.set_text(text);
        self.refresh();
    }

    /// Replace the text with the sample document.
    pub fn load_sample(&mut self) {
        self.buffer.load_sample();
        self.refresh();
    }

    /// Discard the text after confirmation. Returns `true` if cleared.
    pub fn clear(&mut self) -> bool {
        let cleared = self.buffer.clear(self.prompt.as_ref());
        if cleared {
            self.refresh();
        }
        cleared
    }

    /// Start a new document; same as `clear`.
    pub fn new_document(&mut self) -> bool {
        self.clear()
    }

    /// Re-render the preview and recount the status line.
    fn refresh(&mut self) {
        self.ui.status = self.buffer.stats().format_status();
        let _ = self.pipeline.render(
            self.buffer.text(),
            self.presentation.preview_dir,
            self.capabilities.typesetter.as_deref(),
            &mut self.preview,
        );
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Presentation
    // ─────────────────────────────────────────────────────────────────────────

    pub fn toggle_fullscreen(&mut self) {
        let fullscreen = !self.preview.is_fullscreen();
        self.preview.set_fullscreen(fullscreen);
        self.ui.fullscreen_label = if fullscreen {
            FULLSCREEN_EXIT_LABEL
        } else {
            FULLSCREEN_ENTER_LABEL
        };
    }

    /// Escape key: leave fullscreen if active.
    pub fn escape(&mut self) {
        if self.preview.is_fullscreen() {
            self.toggle_fullscreen();
        }
    }

    pub fn select_theme(&mut self, theme: Theme) {
        self.preference_store.select_theme(theme, &mut self.presentation);
        info!("Theme changed to: {}", theme.as_str());
    }

    pub fn cycle_theme(&mut self) {
        let prefs = self.preference_store.cycle_theme(&mut self.presentation);
        info!("Theme cycled to: {}", prefs.theme.as_str());
    }

    pub fn select_font_size(&mut self, size: FontSize) {
        self.preference_store.select_font_size(size, &mut self.presentation);
    }

    pub fn toggle_direction(&mut self) {
        self.preference_store.toggle_direction(&mut self.presentation);
        self.refresh();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Clipboard
    // ─────────────────────────────────────────────────────────────────────────

    /// Copy the preview markup to the clipboard.
    pub fn copy_preview(&mut self) -> Result<()> {
        let result = self
            .capabilities
            .require_clipboard()
            .and_then(|clipboard| copy_preview(self.preview.markup(), clipboard));

        match result {
            Ok(()) => {
                self.ui.copy_label = COPY_DONE_LABEL;
                self.scheduler
                    .reschedule(Instant::now(), COPY_LABEL_DELAY, Deferred::RestoreCopyLabel);
                Ok(())
            }
            Err(e) => {
                self.prompt.alert(COPY_FAILED_MESSAGE);
                Err(e)
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Exports
    // ─────────────────────────────────────────────────────────────────────────

    fn save_artifact(&self, artifact: &Artifact) -> Result<()> {
        self.downloads.save(artifact)?;
        info!("Exported {}", artifact.file_name);
        Ok(())
    }

    pub fn export_markdown(&mut self) -> Result<Artifact> {
        let _in_flight = self.guard.begin(ExportKind::Markdown)?;
        let artifact = export_markdown(self.buffer.text(), Utc::now());
        self.save_artifact(&artifact)?;
        Ok(artifact)
    }

    pub fn export_html(&mut self) -> Result<Artifact> {
        let _in_flight = self.guard.begin(ExportKind::Html)?;
        let artifact = export_html(&self.snapshot(), Utc::now())?;
        self.save_artifact(&artifact)?;
        Ok(artifact)
    }

    /// Rasterize the preview into a PNG download.
    pub fn export_png(&mut self) -> Result<Artifact> {
        let _in_flight = self.guard.begin(ExportKind::Png)?;
        let Some(rasterizer) = self.capabilities.rasterizer.as_deref() else {
            self.prompt.alert(PNG_UNAVAILABLE_MESSAGE);
            return Err(Error::CapabilityUnavailable(Capability::Rasterizer));
        };

        self.ui.set_export_label(ExportKind::Png, PNG_BUSY_LABEL);
        let result = export_png(&self.snapshot(), rasterizer, Utc::now())
            .and_then(|artifact| self.save_artifact(&artifact).map(|()| artifact));
        self.ui.reset_export_label(ExportKind::Png);

        if let Err(e) = &result {
            error!("PNG export failed: {}", e);
            self.prompt.alert(PNG_FAILED_MESSAGE);
        }
        result
    }

    /// Produce a PDF, by printing or programmatically.
    pub fn export_pdf(&mut self) -> Result<PdfOutcome> {
        let _in_flight = self.guard.begin(ExportKind::Pdf)?;

        let strategy = PdfStrategy::select(self.preview.text_len(), self.prompt.as_ref());
        debug!("PDF strategy: {:?}", strategy);
        if strategy == PdfStrategy::DirectPrint {
            self.print()?;
            return Ok(PdfOutcome::Printed { fallback: false });
        }

        if !programmatic_available(&self.capabilities) {
            self.prompt.alert(PDF_UNAVAILABLE_MESSAGE);
            return Err(match self.capabilities.require_rasterizer() {
                Err(e) => e,
                Ok(_) => Error::CapabilityUnavailable(Capability::PageAssembler),
            });
        }

        self.ui.set_export_label(ExportKind::Pdf, PDF_BUSY_LABEL);
        let result = render_pdf(&self.snapshot(), &self.capabilities, Utc::now())
            .and_then(|artifact| self.save_artifact(&artifact).map(|()| artifact));

        match result {
            Ok(artifact) => {
                self.ui.set_export_label(ExportKind::Pdf, PDF_DONE_LABEL);
                self.scheduler.reschedule(
                    Instant::now(),
                    PDF_LABEL_DELAY,
                    Deferred::RestoreExportLabel(ExportKind::Pdf),
                );
                Ok(PdfOutcome::Downloaded(artifact))
            }
            Err(e) => {
                error!("PDF export failed: {}", e);
                self.ui.reset_export_label(ExportKind::Pdf);
                if self.prompt.confirm(&fallback_message(&e)) {
                    self.print()?;
                    Ok(PdfOutcome::Printed { fallback: true })
                } else {
                    Err(e)
                }
            }
        }
    }

    /// Hand the preview to the host's print facility.
    ///
    /// The chrome is hidden for the print and shown again after a fixed
    /// delay; the host gives no signal when its dialog closes.
    pub fn print(&mut self) -> Result<()> {
        let printer = self.capabilities.require_printer()?;
        let document = standalone_document(self.preview.markup(), &self.preferences());

        self.ui.chrome_visible = false;
        if let Err(e) = printer.print(&document) {
            warn!("Print failed: {}", e);
            self.ui.chrome_visible = true;
            return Err(e);
        }
        self.scheduler
            .reschedule(Instant::now(), PRINT_RESTORE_DELAY, Deferred::RestoreChrome);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Event Loop
    // ─────────────────────────────────────────────────────────────────────────

    /// Apply deferred UI effects due at `now`.
    pub fn tick(&mut self, now: Instant) {
        for task in self.scheduler.take_due(now) {
            debug!("Applying {:?}", task);
            self.ui.apply(task);
        }
    }

    /// Apply every pending UI effect, e.g. before the host exits.
    pub fn flush(&mut self) {
        for task in self.scheduler.drain_all() {
            self.ui.apply(task);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
