//! Configuration module for mdpad
//!
//! This module handles the user preferences record (theme, font size,
//! reading direction), its JSON persistence through the key-value store,
//! and its application to the presentation attributes of the document.

mod persistence;
mod presentation;
mod settings;

pub use persistence::*;
pub use presentation::*;
pub use settings::*;
