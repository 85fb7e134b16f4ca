//! SQLite-backed key-value entries

use chrono::Utc;
use rusqlite::{params, Connection};
use tracing::instrument;

use super::parse::OptionalExt;
use super::traits::Scope;
use crate::error::Result;

pub struct KvStore<'a> {
    conn: &'a Connection,
}

impl<'a> KvStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn get(&self, scope: Scope, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE scope = ?1 AND key = ?2",
                params![scope.as_str(), key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    #[instrument(skip(self, value), fields(len = value.len()))]
    pub fn set(&self, scope: Scope, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (scope, key, value, updated_at) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(scope, key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![scope.as_str(), key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn remove(&self, scope: Scope, key: &str) -> Result<()> {
        self.conn.execute(
            "DELETE FROM kv_entries WHERE scope = ?1 AND key = ?2",
            params![scope.as_str(), key],
        )?;
        Ok(())
    }

    /// Drop every entry of a scope, returning how many were removed
    pub fn clear_scope(&self, scope: Scope) -> Result<u64> {
        let count = self.conn.execute(
            "DELETE FROM kv_entries WHERE scope = ?1",
            params![scope.as_str()],
        )?;
        Ok(count as u64)
    }

    /// Keys present in a scope, sorted
    pub fn keys(&self, scope: Scope) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM kv_entries WHERE scope = ?1 ORDER BY key")?;
        let keys = stmt
            .query_map(params![scope.as_str()], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(keys)
    }
}
