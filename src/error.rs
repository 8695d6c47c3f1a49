//! Centralized error handling for mdpad
//!
//! This module provides a unified error type that covers all error scenarios
//! in the application: persistence, rendering, typesetting and export.

use crate::export::ExportKind;
use crate::host::Capability;
use log::warn;
use std::fmt;
use std::io;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Custom Result Type Alias
// ─────────────────────────────────────────────────────────────────────────────

/// A specialized `Result` type for the application.
pub type Result<T> = std::result::Result<T, Error>;

/// The centralized error type for the application.
#[derive(Debug)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────────────────
    // File I/O Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Generic I/O error wrapper
    Io(io::Error),

    /// Failed to write file contents
    FileWrite { path: PathBuf, source: io::Error },

    // ─────────────────────────────────────────────────────────────────────────
    // Persistence Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// The key-value store cannot be used at all (quota, permissions, ...)
    StorageUnavailable(String),

    /// Failed to read a key from the store
    StorageRead {
        key: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to write a key to the store
    StorageWrite {
        key: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Persisted preferences are not valid JSON
    PrefsParse {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Data directory not found or inaccessible
    StoreDirNotFound,

    // ─────────────────────────────────────────────────────────────────────────
    // Rendering Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// The markdown parser failed on the current document
    Render(String),

    /// The math typesetter rejected a span
    Typeset { source: String, message: String },

    /// A code block could not be highlighted
    Highlight(String),

    // ─────────────────────────────────────────────────────────────────────────
    // Export Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// A capability provider required by the action is absent
    CapabilityUnavailable(Capability),

    /// An export of the same kind is still running
    ExportInProgress(ExportKind),

    /// An export started but failed part way
    Export { kind: ExportKind, message: String },

    /// Clipboard access or write failed
    Clipboard(String),

    /// The host print facility failed
    Print(String),

    // ─────────────────────────────────────────────────────────────────────────
    // Application Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Generic application error with a message
    Application(String),
}

impl Error {
    /// Shorthand for an export failure of the given kind.
    pub fn export(kind: ExportKind, message: impl Into<String>) -> Self {
        Error::Export {
            kind,
            message: message.into(),
        }
    }
}

// Implement From traits for convenient error conversion
impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::PrefsParse {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::Application(format!("Image encoding failed: {}", err))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Display trait implementation for user-friendly error messages
// ─────────────────────────────────────────────────────────────────────────────
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // File I/O Errors
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::FileWrite { path, source } => {
                write!(f, "Failed to write '{}': {}", path.display(), source)
            }

            // Persistence Errors
            Error::StorageUnavailable(reason) => write!(f, "Storage unavailable: {}", reason),
            Error::StorageRead { key, source } => {
                write!(f, "Failed to read '{}' from storage: {}", key, source)
            }
            Error::StorageWrite { key, source } => {
                write!(f, "Failed to write '{}' to storage: {}", key, source)
            }
            Error::PrefsParse { message, .. } => {
                write!(f, "Invalid preferences format: {}", message)
            }
            Error::StoreDirNotFound => write!(f, "Data directory not found"),

            // Rendering Errors
            Error::Render(msg) => write!(f, "{}", msg),
            Error::Typeset { source, message } => {
                write!(f, "Failed to typeset '{}': {}", source, message)
            }
            Error::Highlight(msg) => write!(f, "Highlighting error: {}", msg),

            // Export Errors
            Error::CapabilityUnavailable(capability) => {
                write!(f, "{} is not available", capability.label())
            }
            Error::ExportInProgress(kind) => {
                write!(f, "{} export is already running", kind.label())
            }
            Error::Export { kind, message } => {
                write!(f, "Failed to export {}: {}", kind.label(), message)
            }
            Error::Clipboard(msg) => write!(f, "Clipboard error: {}", msg),
            Error::Print(msg) => write!(f, "Print error: {}", msg),

            // Application Errors
            Error::Application(msg) => write!(f, "{}", msg),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// std::error::Error trait implementation for error chaining
// ─────────────────────────────────────────────────────────────────────────────
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::FileWrite { source, .. } => Some(source),
            Error::StorageRead { source, .. } => Some(source.as_ref()),
            Error::StorageWrite { source, .. } => Some(source.as_ref()),
            Error::PrefsParse { source, .. } => source
                .as_ref()
                .map(|s| s.as_ref() as &(dyn std::error::Error + 'static)),
            _ => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Graceful Degradation Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Extension trait for Result to support graceful degradation.
pub trait ResultExt<T> {
    /// If the result is an error, log it at warning level and return the provided default.
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T;
}

impl<T> ResultExt<T> for Result<T> {
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                warn!("{}: {}. Using default.", context, err);
                default
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
