//! Presentation attributes driven by preferences.
//!
//! Mirrors what the host shows: the document-level theme and font size
//! attributes, the document and preview reading direction, and the values
//! displayed by the theme and font-size selector controls.

use super::{Direction, FontSize, Preferences, Theme};

/// Current presentation attributes and selector control values.
///
/// Every `apply_*` method is idempotent: applying the same value twice
/// leaves the presentation unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Presentation {
    /// `data-theme` attribute of the document body
    pub theme: Theme,
    /// `data-font-size` attribute of the document body
    pub font_size: FontSize,
    /// `dir` attribute of the document root
    pub document_dir: Direction,
    /// `dir` attribute of the preview surface
    pub preview_dir: Direction,
    /// Value shown by the theme selector
    pub theme_select: Theme,
    /// Value shown by the font-size selector
    pub font_size_select: FontSize,
}

impl Presentation {
    /// Presentation with every attribute taken from `prefs`.
    pub fn from_preferences(prefs: &Preferences) -> Self {
        let mut presentation = Self::default();
        presentation.apply_all(prefs);
        presentation
    }

    pub fn apply_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.theme_select = theme;
    }

    pub fn apply_font_size(&mut self, size: FontSize) {
        self.font_size = size;
        self.font_size_select = size;
    }

    pub fn apply_direction(&mut self, direction: Direction) {
        self.document_dir = direction;
        self.preview_dir = direction;
    }

    /// Apply all three preferences.
    pub fn apply_all(&mut self, prefs: &Preferences) {
        self.apply_theme(prefs.theme);
        self.apply_font_size(prefs.font_size);
        self.apply_direction(prefs.direction);
    }
}
