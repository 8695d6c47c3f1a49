//! Key-value persistence for mdpad
//!
//! Document text and preferences are stored as opaque strings under fixed
//! keys. The store itself knows nothing about their format.
//!
//! - `file.rs` - one file per key inside a data directory
//! - `memory.rs` - in-process store used by tests and ephemeral sessions

mod file;
mod memory;

pub use file::{default_store_dir, FileStore};
pub use memory::MemoryStore;

use crate::error::Result;

/// Key holding the raw document text.
pub const CONTENT_KEY: &str = "content";

/// Key holding the JSON preferences record.
pub const PREFS_KEY: &str = "prefs";

/// An opaque string key-value store.
///
/// Implementations report failures; callers decide whether a failure is
/// user-facing. The editor buffer and preference store swallow them.
pub trait KeyValueStore {
    /// Read the value stored under `key`, or `None` if nothing is stored.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}
