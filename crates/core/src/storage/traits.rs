//! Storage capability traits
//!
//! The guard, catalog and contract log only ever talk to this interface,
//! so the backing store can be SQLite, an in-memory map, or a future
//! network service.

use crate::error::Result;

/// Lifetime of a stored value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Lives as long as the running application
    Session,
    /// Survives restarts
    Durable,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Session => "session",
            Scope::Durable => "durable",
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// String key-value persistence with two scopes
pub trait KeyValueStore {
    /// Read a value
    fn get(&self, scope: Scope, key: &str) -> Result<Option<String>>;

    /// Insert or replace a value
    fn set(&self, scope: Scope, key: &str, value: &str) -> Result<()>;

    /// Remove a value; removing a missing key is not an error
    fn remove(&self, scope: Scope, key: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, scope: Scope, key: &str) -> Result<Option<String>> {
        (**self).get(scope, key)
    }

    fn set(&self, scope: Scope, key: &str, value: &str) -> Result<()> {
        (**self).set(scope, key, value)
    }

    fn remove(&self, scope: Scope, key: &str) -> Result<()> {
        (**self).remove(scope, key)
    }
}
