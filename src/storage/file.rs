//! File-backed key-value store.
//!
//! Each key maps to `<dir>/<key>.txt`. Writes go through a backup file and
//! a rename so a crash never leaves a half-written value behind.

use super::KeyValueStore;
use crate::error::{Error, Result};
use log::debug;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Application name used for the data directory
const APP_NAME: &str = "mdpad";

/// Extension of stored values
const VALUE_EXTENSION: &str = "txt";

/// Extension of the temporary file used during atomic writes
const BACKUP_EXTENSION: &str = "bak";

/// Get the platform-specific data directory for the application.
///
/// - **Windows**: `%APPDATA%\mdpad\`
/// - **macOS**: `~/Library/Application Support/mdpad/`
/// - **Linux**: `~/.local/share/mdpad/`
pub fn default_store_dir() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|base| base.join(APP_NAME))
        .ok_or(Error::StoreDirNotFound)
}

/// Key-value store persisting each key as a file in one directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`. The directory is created lazily on
    /// the first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Create a store in the platform data directory.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(default_store_dir()?))
    }

    /// Directory this store writes into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn value_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", key, VALUE_EXTENSION))
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.dir.exists() {
            debug!("Creating data directory: {}", self.dir.display());
            fs::create_dir_all(&self.dir).map_err(|e| Error::StorageUnavailable(format!(
                "cannot create {}: {}",
                self.dir.display(),
                e
            )))?;
        }
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.value_path(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::StorageRead {
                key: key.to_string(),
                source: Box::new(e),
            }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.ensure_dir()?;
        let path = self.value_path(key);
        let backup = path.with_extension(BACKUP_EXTENSION);

        fs::write(&backup, value).map_err(|e| Error::StorageWrite {
            key: key.to_string(),
            source: Box::new(e),
        })?;
        fs::rename(&backup, &path).map_err(|e| Error::StorageWrite {
            key: key.to_string(),
            source: Box::new(e),
        })?;

        debug!("Stored '{}' ({} bytes)", key, value.len());
        Ok(())
    }
}
