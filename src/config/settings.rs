//! User preferences for mdpad
//!
//! This module defines the `Preferences` record that holds the theme,
//! font size and reading direction, with serde support for JSON
//! persistence.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

// ─────────────────────────────────────────────────────────────────────────────
// Theme Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Available color themes, in cycling order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Sepia,
    Github,
}

impl Theme {
    /// Get all themes in cycling order.
    pub fn all() -> &'static [Theme] {
        &[Theme::Light, Theme::Dark, Theme::Sepia, Theme::Github]
    }

    /// The next theme in the fixed order, wrapping after the last one.
    pub fn next(&self) -> Self {
        let themes = Self::all();
        let index = themes.iter().position(|t| t == self).unwrap_or(0);
        themes[(index + 1) % themes.len()]
    }

    /// Value written to the `data-theme` attribute and stored in JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::Sepia => "sepia",
            Theme::Github => "github",
        }
    }

    /// Parse a theme from its stored name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Font Size Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Preview font size in pixels, persisted as an integer string (`"16"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FontSize(u16);

impl FontSize {
    /// Minimum allowed font size.
    pub const MIN: u16 = 10;
    /// Maximum allowed font size.
    pub const MAX: u16 = 32;
    /// Default font size.
    pub const DEFAULT: FontSize = FontSize(16);

    /// Create a font size, rejecting values outside `MIN..=MAX`.
    pub fn new(px: u16) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&px).then_some(Self(px))
    }

    /// Parse an integer string such as `"18"`.
    pub fn parse(value: &str) -> Option<Self> {
        value.trim().parse::<u16>().ok().and_then(Self::new)
    }

    /// Size in pixels.
    pub fn px(&self) -> u16 {
        self.0
    }
}

impl Default for FontSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for FontSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for FontSize {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("invalid font size '{}'", value))
    }
}

impl From<FontSize> for String {
    fn from(size: FontSize) -> Self {
        size.to_string()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Direction Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Reading direction of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
}

impl Direction {
    /// Flip between left-to-right and right-to-left.
    pub fn toggle(&self) -> Self {
        match self {
            Direction::Ltr => Direction::Rtl,
            Direction::Rtl => Direction::Ltr,
        }
    }

    /// Value of the `dir` attribute.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Ltr => "ltr",
            Direction::Rtl => "rtl",
        }
    }

    /// Parse a direction from its attribute value.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "ltr" => Some(Direction::Ltr),
            "rtl" => Some(Direction::Rtl),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Preferences Record
// ─────────────────────────────────────────────────────────────────────────────

/// The persisted preferences record.
///
/// Serialized as `{"theme": "light", "fontSize": "16", "direction": "ltr"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    /// Color theme
    pub theme: Theme,
    /// Preview font size
    pub font_size: FontSize,
    /// Reading direction
    pub direction: Direction,
}

impl Preferences {
    /// Parse a persisted record, merging it over the defaults field by field.
    ///
    /// A field that is missing or has an unusable value keeps its default
    /// without affecting the others. Valid JSON that is not an object
    /// yields pure defaults. Invalid JSON is an error.
    pub fn from_json_merged(json: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(json)?;
        Ok(match value {
            Value::Object(fields) => Self::merged(&fields),
            _ => Self::default(),
        })
    }

    fn merged(fields: &Map<String, Value>) -> Self {
        let defaults = Self::default();
        Self {
            theme: field(fields, "theme").unwrap_or(defaults.theme),
            font_size: field(fields, "fontSize").unwrap_or(defaults.font_size),
            direction: field(fields, "direction").unwrap_or(defaults.direction),
        }
    }

    /// Serialize the full record.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

fn field<T: for<'de> Deserialize<'de>>(fields: &Map<String, Value>, name: &str) -> Option<T> {
    let value = fields.get(name)?;
    match serde_json::from_value(value.clone()) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            log::warn!("Ignoring stored preference '{}': {}", name, e);
            None
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
