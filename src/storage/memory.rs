//! In-memory key-value store.

use super::KeyValueStore;
use crate::error::{Error, Result};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// Key-value store living only for the current session.
///
/// `set_available(false)` makes every call fail, which models a storage
/// backend that is disabled or over quota.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
    unavailable: Cell<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle whether the store accepts reads and writes.
    pub fn set_available(&self, available: bool) {
        self.unavailable.set(!available);
    }

    fn check(&self) -> Result<()> {
        if self.unavailable.get() {
            Err(Error::StorageUnavailable("storage is disabled".to_string()))
        } else {
            Ok(())
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.check()?;
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.check()?;
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let store = MemoryStore::new();
        store.set("content", "hello").unwrap();
        assert_eq!(store.get("content").unwrap().as_deref(), Some("hello"));
    }

    #[test]
    fn test_unavailable_store_fails() {
        let store = MemoryStore::new();
        store.set_available(false);
        assert!(store.get("content").is_err());
        assert!(store.set("content", "x").is_err());

        store.set_available(true);
        assert!(store.get("content").unwrap().is_none());
    }
}
