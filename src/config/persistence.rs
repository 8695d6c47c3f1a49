//! Preference persistence for mdpad
//!
//! This module loads and saves the preferences record through the
//! key-value store with graceful fallback to defaults. Storage problems are
//! logged and never surfaced to the user.

use super::{Direction, FontSize, Preferences, Presentation, Theme};
use crate::error::{Result, ResultExt};
use crate::storage::{KeyValueStore, PREFS_KEY};
use log::{debug, warn};
use std::rc::Rc;

// ─────────────────────────────────────────────────────────────────────────────
// Preference Store
// ─────────────────────────────────────────────────────────────────────────────

/// Durable theme/size/direction settings.
///
/// The store keeps the in-session record. Every change is applied to that
/// record first and then written through in full, so an unavailable store
/// only costs durability.
pub struct PreferenceStore {
    store: Rc<dyn KeyValueStore>,
    current: Preferences,
}

impl PreferenceStore {
    pub fn new(store: Rc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            current: Preferences::default(),
        }
    }

    /// The record in effect for this session.
    pub fn current(&self) -> Preferences {
        self.current
    }

    /// Load preferences, merging the persisted record over the defaults.
    ///
    /// # Behavior
    ///
    /// 1. Nothing stored, or storage unavailable: defaults
    /// 2. Stored record is invalid JSON: defaults (logged)
    /// 3. Otherwise each field falls back to its default independently
    pub fn load(&self) -> Preferences {
        self.load_internal()
            .unwrap_or_warn_default(Preferences::default(), "Failed to load preferences")
    }

    fn load_internal(&self) -> Result<Preferences> {
        let Some(saved) = self.store.get(PREFS_KEY)? else {
            debug!("No stored preferences, using defaults");
            return Ok(Preferences::default());
        };
        Ok(Preferences::from_json_merged(&saved)?)
    }

    /// Persist the full record. Failures are logged only.
    ///
    /// Returns `true` if the record was written.
    pub fn save(&self, prefs: &Preferences) -> bool {
        match self.save_internal(prefs) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to save preferences: {}", e);
                false
            }
        }
    }

    fn save_internal(&self, prefs: &Preferences) -> Result<()> {
        let json = prefs.to_json()?;
        self.store.set(PREFS_KEY, &json)?;
        debug!("Preferences saved: {}", json);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // User Actions
    // ─────────────────────────────────────────────────────────────────────────

    /// Load the stored preferences and apply them to `presentation`.
    pub fn init(&mut self, presentation: &mut Presentation) -> Preferences {
        self.current = self.load();
        presentation.apply_all(&self.current);
        self.current
    }

    /// Theme selector changed.
    pub fn select_theme(&mut self, theme: Theme, presentation: &mut Presentation) -> Preferences {
        presentation.apply_theme(theme);
        self.update(|prefs| prefs.theme = theme)
    }

    /// Font-size selector changed.
    pub fn select_font_size(&mut self, size: FontSize, presentation: &mut Presentation) -> Preferences {
        presentation.apply_font_size(size);
        self.update(|prefs| prefs.font_size = size)
    }

    /// Advance to the next theme in the fixed order.
    pub fn cycle_theme(&mut self, presentation: &mut Presentation) -> Preferences {
        let next = self.current.theme.next();
        presentation.apply_theme(next);
        self.update(|prefs| prefs.theme = next)
    }

    /// Flip the reading direction.
    pub fn toggle_direction(&mut self, presentation: &mut Presentation) -> Preferences {
        let direction: Direction = self.current.direction.toggle();
        presentation.apply_direction(direction);
        self.update(|prefs| prefs.direction = direction)
    }

    fn update(&mut self, change: impl FnOnce(&mut Preferences)) -> Preferences {
        change(&mut self.current);
        self.save(&self.current);
        self.current
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
