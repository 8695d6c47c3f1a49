//! mdpad - Markdown authoring with live preview
//!
//! A Markdown editor core with `$...$`/`$$...$$` math, sanitized and
//! highlighted preview markup, persisted theme/font-size/direction
//! preferences, and export to Markdown, HTML, PNG and PDF.
//!
//! The library owns all state. A host (the `mdpad` binary, or any GUI)
//! supplies capability providers through [`host::Capabilities`] and drives
//! [`app::App`] from its event loop.

pub mod app;
pub mod config;
pub mod editor;
pub mod error;
pub mod export;
pub mod host;
pub mod markdown;
pub mod preview;
pub mod state;
pub mod storage;
pub mod theme;

pub use app::App;
pub use error::{Error, Result};
