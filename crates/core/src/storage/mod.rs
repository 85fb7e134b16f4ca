//! Key-value storage for TechSolutions
//!
//! `Database` keeps both scopes in one SQLite file; the session scope is
//! purged whenever a new application run starts.

pub mod keys;
mod kv;
mod memory;
mod migrations;
pub(crate) mod parse;
mod traits;

use std::path::Path;

use rusqlite::Connection;
use tracing::{debug, instrument};

use crate::error::Result;

pub use kv::KvStore;
pub use memory::MemoryStore;
pub use traits::{KeyValueStore, Scope};

/// Main database handle
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database at the given path
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Open in-memory database (for testing)
    #[instrument]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    fn init(&self) -> Result<()> {
        migrations::run_migrations(&self.conn)
    }

    pub fn schema_version(&self) -> Result<u32> {
        migrations::current_version(&self.conn)
    }

    pub fn kv(&self) -> KvStore<'_> {
        KvStore::new(&self.conn)
    }

    /// Forget everything stored with session lifetime
    pub fn reset_session_scope(&self) -> Result<u64> {
        let removed = self.kv().clear_scope(Scope::Session)?;
        debug!(removed, "Session scope cleared");
        Ok(removed)
    }
}

impl KeyValueStore for Database {
    fn get(&self, scope: Scope, key: &str) -> Result<Option<String>> {
        self.kv().get(scope, key)
    }

    fn set(&self, scope: Scope, key: &str, value: &str) -> Result<()> {
        self.kv().set(scope, key, value)
    }

    fn remove(&self, scope: Scope, key: &str) -> Result<()> {
        self.kv().remove(scope, key)
    }
}
