//! KaTeX-backed math typesetter

use crate::error::{Error, Result};
use crate::host::Typesetter;

/// Typesets with KaTeX in an embedded JS engine.
///
/// Errors inside a formula are drawn by KaTeX itself (`throw_on_error`
/// off); engine failures come back as `Error::Typeset`.
#[derive(Debug, Clone, Copy, Default)]
pub struct KatexTypesetter;

impl Typesetter for KatexTypesetter {
    fn typeset(&self, source: &str, display_mode: bool) -> Result<String> {
        let fail = |message: String| Error::Typeset {
            source: source.to_string(),
            message,
        };
        let opts = ::katex::Opts::builder()
            .display_mode(display_mode)
            .throw_on_error(false)
            .build()
            .map_err(|e| fail(e.to_string()))?;
        ::katex::render_with_opts(source, &opts).map_err(|e| fail(e.to_string()))
    }
}
