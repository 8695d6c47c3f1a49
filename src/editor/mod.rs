//! Editor module for mdpad
//!
//! This module owns the document text: loading and persisting it, the
//! confirmed clear action, the sample document, and word/character
//! statistics for the status line.

mod buffer;
mod sample;
mod stats;

pub use buffer::{EditorBuffer, CLEAR_CONFIRMATION};
pub use sample::SAMPLE_DOCUMENT;
pub use stats::{char_count, word_count, TextStats};
