//! Image fetching for PDF export
//!
//! Remote images are fetched with minreq, local ones are read from disk
//! relative to a base directory. Any failure yields `None` so the image
//! keeps its original source.

use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::host::{ImageLoader, LoadedImage};

/// Loads `http(s)://`, `file://` and relative image sources.
#[derive(Debug, Clone, Default)]
pub struct HttpImageLoader {
    base_dir: Option<PathBuf>,
}

impl HttpImageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative sources against `dir`.
    pub fn with_base_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(dir.into()),
        }
    }

    fn fetch_remote(&self, url: &str, timeout: Duration) -> Option<LoadedImage> {
        // minreq takes whole seconds
        let secs = timeout.as_secs().max(1);
        let response = match minreq::get(url).with_timeout(secs).send() {
            Ok(response) => response,
            Err(e) => {
                warn!("Failed to fetch image {}: {}", url, e);
                return None;
            }
        };

        if !(200..300).contains(&response.status_code) {
            warn!("Image {} returned HTTP {}", url, response.status_code);
            return None;
        }

        let mime = response
            .headers
            .get("content-type")
            .map(|value| value.split(';').next().unwrap_or(value).trim().to_string())
            .filter(|value| value.starts_with("image/"))
            .or_else(|| mime_for_path(url).map(str::to_string))?;

        debug!("Fetched image {} ({})", url, mime);
        Some(LoadedImage {
            mime,
            bytes: response.into_bytes(),
        })
    }

    fn read_local(&self, src: &str) -> Option<LoadedImage> {
        let raw = src.strip_prefix("file://").unwrap_or(src);
        let path = Path::new(raw);
        let path = match (&self.base_dir, path.is_relative()) {
            (Some(base), true) => base.join(path),
            _ => path.to_path_buf(),
        };

        let mime = mime_for_path(raw)?;
        match fs::read(&path) {
            Ok(bytes) => Some(LoadedImage {
                mime: mime.to_string(),
                bytes,
            }),
            Err(e) => {
                warn!("Failed to read image {}: {}", path.display(), e);
                None
            }
        }
    }
}

impl ImageLoader for HttpImageLoader {
    fn load(&self, src: &str, timeout: Duration) -> Option<LoadedImage> {
        if src.starts_with("data:") || src.is_empty() {
            return None;
        }
        if src.starts_with("http://") || src.starts_with("https://") {
            self.fetch_remote(src, timeout)
        } else {
            self.read_local(src)
        }
    }
}

/// MIME type from the extension of a path or URL.
pub fn mime_for_path(src: &str) -> Option<&'static str> {
    let path = src.split(['?', '#']).next().unwrap_or(src);
    let ext = path.rsplit_once('.')?.1.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "svg" => Some("image/svg+xml"),
        "bmp" => Some("image/bmp"),
        _ => None,
    }
}
