//! Bundled providers for a desktop/terminal host.

use super::{Downloads, Printer, Prompt};
use crate::error::{Error, Result};
use crate::export::Artifact;
use log::{debug, info};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Terminal Prompt
// ─────────────────────────────────────────────────────────────────────────────

/// Prompt answering from the terminal, or with a fixed answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TerminalPrompt {
    /// Read `y`/`n` from stdin
    #[default]
    Interactive,
    /// Answer every confirmation with the given value
    Fixed(bool),
}

impl Prompt for TerminalPrompt {
    fn confirm(&self, message: &str) -> bool {
        match self {
            TerminalPrompt::Fixed(answer) => {
                debug!("Auto-answering {:?} with {}", message, answer);
                *answer
            }
            TerminalPrompt::Interactive => {
                let mut stderr = io::stderr();
                let _ = write!(stderr, "{}\n[y/N] ", message);
                let _ = stderr.flush();

                let mut line = String::new();
                if io::stdin().lock().read_line(&mut line).is_err() {
                    return false;
                }
                matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes" | "ok")
            }
        }
    }

    fn alert(&self, message: &str) {
        eprintln!("{}", message);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Directory Downloads
// ─────────────────────────────────────────────────────────────────────────────

/// Saves artifacts into a directory under their suggested file names.
#[derive(Debug, Clone)]
pub struct DirectoryDownloads {
    dir: PathBuf,
}

impl DirectoryDownloads {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Where an artifact with `file_name` ends up.
    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }
}

impl Downloads for DirectoryDownloads {
    fn save(&self, artifact: &Artifact) -> Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }
        let path = self.path_for(&artifact.file_name);
        fs::write(&path, &artifact.bytes).map_err(|source| Error::FileWrite {
            path: path.clone(),
            source,
        })?;
        info!("Saved {} ({} bytes)", path.display(), artifact.bytes.len());
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Browser Printer
// ─────────────────────────────────────────────────────────────────────────────

/// Script appended to the print document so the browser opens its dialog.
const AUTO_PRINT_SCRIPT: &str =
    "<script>window.addEventListener('load', function () { window.print(); });</script>";

/// Hands the print document to the system browser, whose print dialog
/// does the pagination.
#[derive(Debug, Clone)]
pub struct BrowserPrinter {
    dir: PathBuf,
}

impl Default for BrowserPrinter {
    fn default() -> Self {
        Self {
            dir: std::env::temp_dir(),
        }
    }
}

impl BrowserPrinter {
    /// Write print documents into `dir` instead of the temp directory.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn with_auto_print(document: &str) -> String {
        match document.rfind("</body>") {
            Some(index) => {
                let mut out = String::with_capacity(document.len() + AUTO_PRINT_SCRIPT.len());
                out.push_str(&document[..index]);
                out.push_str(AUTO_PRINT_SCRIPT);
                out.push_str(&document[index..]);
                out
            }
            None => format!("{}{}", document, AUTO_PRINT_SCRIPT),
        }
    }
}

impl Printer for BrowserPrinter {
    fn print(&self, document: &str) -> Result<()> {
        let stamp = chrono::Utc::now().format("%Y%m%d%H%M%S%3f");
        let path = self.dir.join(format!("mdpad-print-{}.html", stamp));
        fs::write(&path, Self::with_auto_print(document)).map_err(|source| Error::FileWrite {
            path: path.clone(),
            source,
        })?;
        open::that(&path).map_err(|e| Error::Print(e.to_string()))?;
        info!("Opened {} for printing", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_fixed_prompt() {
        assert!(TerminalPrompt::Fixed(true).confirm("Proceed?"));
        assert!(!TerminalPrompt::Fixed(false).confirm("Proceed?"));
    }

    #[test]
    fn test_directory_downloads_writes_file() {
        let temp = TempDir::new().unwrap();
        let downloads = DirectoryDownloads::new(temp.path().join("out"));
        let artifact = Artifact::new("document-x.md", "text/markdown", b"# hi".to_vec());
        downloads.save(&artifact).unwrap();
        assert_eq!(
            fs::read_to_string(downloads.path_for("document-x.md")).unwrap(),
            "# hi"
        );
    }

    #[test]
    fn test_auto_print_script_goes_before_body_end() {
        let doc = BrowserPrinter::with_auto_print("<html><body><p>x</p></body></html>");
        assert!(doc.contains("window.print(); });</script></body>"));
        assert!(doc.ends_with("</body></html>"));
    }
}
