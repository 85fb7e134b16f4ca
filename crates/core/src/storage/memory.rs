//! In-process key-value store
//!
//! Used by tests and by embedders that do not need persistence. Writes can
//! be made to fail on demand to simulate a full or broken backing store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use super::traits::{KeyValueStore, Scope};
use crate::error::{Error, Result};

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<(Scope, String), String>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following `set`/`remove` fail with `StorageUnavailable`
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of entries in a scope
    pub fn len(&self, scope: Scope) -> usize {
        self.lock().keys().filter(|(s, _)| *s == scope).count()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<(Scope, String), String>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::StorageUnavailable(
                "memory store is read-only".to_string(),
            ));
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, scope: Scope, key: &str) -> Result<Option<String>> {
        Ok(self.lock().get(&(scope, key.to_string())).cloned())
    }

    fn set(&self, scope: Scope, key: &str, value: &str) -> Result<()> {
        self.check_writable()?;
        self.lock()
            .insert((scope, key.to_string()), value.to_string());
        Ok(())
    }

    fn remove(&self, scope: Scope, key: &str) -> Result<()> {
        self.check_writable()?;
        self.lock().remove(&(scope, key.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scopes_are_independent() {
        let store = MemoryStore::new();
        store.set(Scope::Session, "k", "a").unwrap();
        store.set(Scope::Durable, "k", "b").unwrap();

        assert_eq!(store.get(Scope::Session, "k").unwrap().as_deref(), Some("a"));
        assert_eq!(store.get(Scope::Durable, "k").unwrap().as_deref(), Some("b"));

        store.remove(Scope::Session, "k").unwrap();
        assert!(store.get(Scope::Session, "k").unwrap().is_none());
        assert_eq!(store.len(Scope::Durable), 1);
    }

    #[test]
    fn failing_writes_leave_entries_untouched() {
        let store = MemoryStore::new();
        store.set(Scope::Durable, "k", "a").unwrap();
        store.set_fail_writes(true);

        assert!(matches!(
            store.set(Scope::Durable, "k", "b"),
            Err(Error::StorageUnavailable(_))
        ));
        assert!(store.remove(Scope::Durable, "k").is_err());
        assert_eq!(store.get(Scope::Durable, "k").unwrap().as_deref(), Some("a"));
    }
}
