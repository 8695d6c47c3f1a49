//! In-flight flags per export kind
//!
//! An export of a given kind holds an `InFlight` token for its whole run.
//! A second invocation of the same kind is rejected until the token drops,
//! including when the first run fails part way.

use log::warn;
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use super::ExportKind;
use crate::error::{Error, Result};

/// Tracks which export kinds are running.
#[derive(Debug, Default, Clone)]
pub struct ExportGuard {
    running: Rc<RefCell<HashSet<ExportKind>>>,
}

impl ExportGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `kind` as running, or fail if it already is.
    pub fn begin(&self, kind: ExportKind) -> Result<InFlight> {
        if !self.running.borrow_mut().insert(kind) {
            warn!("Ignoring {} export, one is already running", kind);
            return Err(Error::ExportInProgress(kind));
        }
        Ok(InFlight {
            kind,
            running: Rc::clone(&self.running),
        })
    }

    pub fn is_running(&self, kind: ExportKind) -> bool {
        self.running.borrow().contains(&kind)
    }
}

/// Held while one export runs; clears its flag on drop.
#[derive(Debug)]
pub struct InFlight {
    kind: ExportKind,
    running: Rc<RefCell<HashSet<ExportKind>>>,
}

impl InFlight {
    pub fn kind(&self) -> ExportKind {
        self.kind
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.running.borrow_mut().remove(&self.kind);
    }
}
