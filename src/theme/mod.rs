//! Theme palettes for mdpad
//!
//! Each `Theme` maps to a `ThemeColors` palette used wherever colors must be
//! materialized outside the live stylesheet: the standalone HTML export, the
//! off-screen PDF container and the raster background.
//!
//! # Color Categories
//!
//! - **Base colors**: background, text
//! - **Accents**: links, borders, blockquote and code backgrounds
//! - **Syntax**: the syntect theme used for fenced code blocks

use crate::config::Theme;
use std::fmt;

// ─────────────────────────────────────────────────────────────────────────────
// Color
// ─────────────────────────────────────────────────────────────────────────────

/// An opaque sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Parse `#rrggbb`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#')?;
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// CSS hex notation, e.g. `#1e1e1e`.
    pub fn to_css(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    /// Relative luminance approximation used to classify dark palettes.
    pub fn luminance(&self) -> f32 {
        (0.299 * self.0 as f32 + 0.587 * self.1 as f32 + 0.114 * self.2 as f32) / 255.0
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Theme Colors
// ─────────────────────────────────────────────────────────────────────────────

/// Syntect theme for light palettes
pub const LIGHT_SYNTAX_THEME: &str = "InspiredGitHub";

/// Syntect theme for dark palettes
pub const DARK_SYNTAX_THEME: &str = "base16-ocean.dark";

/// Syntect theme for the sepia palette
pub const SEPIA_SYNTAX_THEME: &str = "Solarized (light)";

/// Colors materialized for one theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeColors {
    /// Page background
    pub background: Rgb,
    /// Body text
    pub text: Rgb,
    /// Hyperlinks and blockquote accent bar
    pub link: Rgb,
    /// Rules, table and heading borders
    pub border: Rgb,
    /// Inline code and table header background
    pub code_background: Rgb,
    /// Blockquote background
    pub quote_background: Rgb,
    /// Blockquote text
    pub quote_text: Rgb,
    /// Name of the syntect theme used for code blocks
    pub syntax_theme: &'static str,
}

impl ThemeColors {
    /// Get the palette for a theme.
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self::light(),
            Theme::Dark => Self::dark(),
            Theme::Sepia => Self::sepia(),
            Theme::Github => Self::github(),
        }
    }

    pub fn light() -> Self {
        Self {
            background: Rgb(0xff, 0xff, 0xff),
            text: Rgb(0x33, 0x33, 0x33),
            link: Rgb(0x4a, 0x90, 0xe2),
            border: Rgb(0xdd, 0xdd, 0xdd),
            code_background: Rgb(0xf5, 0xf5, 0xf5),
            quote_background: Rgb(0xf5, 0xf5, 0xf5),
            quote_text: Rgb(0x66, 0x66, 0x66),
            syntax_theme: LIGHT_SYNTAX_THEME,
        }
    }

    pub fn dark() -> Self {
        Self {
            background: Rgb(0x1e, 0x1e, 0x1e),
            text: Rgb(0xe0, 0xe0, 0xe0),
            link: Rgb(0x6c, 0xb6, 0xff),
            border: Rgb(0x44, 0x44, 0x44),
            code_background: Rgb(0x2d, 0x2d, 0x2d),
            quote_background: Rgb(0x26, 0x26, 0x26),
            quote_text: Rgb(0xaa, 0xaa, 0xaa),
            syntax_theme: DARK_SYNTAX_THEME,
        }
    }

    pub fn sepia() -> Self {
        Self {
            background: Rgb(0xf4, 0xec, 0xd8),
            text: Rgb(0x5a, 0x4a, 0x3a),
            link: Rgb(0x8b, 0x5a, 0x2b),
            border: Rgb(0xd8, 0xc8, 0xa8),
            code_background: Rgb(0xea, 0xdf, 0xc4),
            quote_background: Rgb(0xec, 0xe2, 0xc8),
            quote_text: Rgb(0x7a, 0x6a, 0x5a),
            syntax_theme: SEPIA_SYNTAX_THEME,
        }
    }

    pub fn github() -> Self {
        Self {
            background: Rgb(0xff, 0xff, 0xff),
            text: Rgb(0x24, 0x29, 0x2f),
            link: Rgb(0x09, 0x69, 0xda),
            border: Rgb(0xd0, 0xd7, 0xde),
            code_background: Rgb(0xf6, 0xf8, 0xfa),
            quote_background: Rgb(0xff, 0xff, 0xff),
            quote_text: Rgb(0x57, 0x60, 0x6a),
            syntax_theme: LIGHT_SYNTAX_THEME,
        }
    }

    /// Check if this is a dark palette.
    pub fn is_dark(&self) -> bool {
        self.background.luminance() < 0.5
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
