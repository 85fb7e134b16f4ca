//! Schema migrations for the key-value database
//!
//! Each migration is applied once, in version order, and recorded in
//! `schema_migrations`.

use rusqlite::Connection;
use tracing::{debug, info, instrument};

use crate::error::Result;

pub struct Migration {
    /// Sequential, starting from 1
    pub version: u32,
    pub description: &'static str,
    pub sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "Key-value entries",
        sql: r#"
            CREATE TABLE IF NOT EXISTS kv_entries (
                scope TEXT NOT NULL CHECK (scope IN ('session', 'durable')),
                key TEXT NOT NULL,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                PRIMARY KEY (scope, key)
            );
        "#,
    },
    Migration {
        version: 2,
        description: "Index entries by scope",
        sql: r#"
            CREATE INDEX IF NOT EXISTS idx_kv_entries_scope ON kv_entries(scope);
        "#,
    },
];

fn init_migrations_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            applied_at TEXT NOT NULL
        )",
        [],
    )?;
    Ok(())
}

pub(crate) fn current_version(conn: &Connection) -> Result<u32> {
    let version: Option<u32> =
        conn.query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
            row.get(0)
        })?;
    Ok(version.unwrap_or(0))
}

/// Apply every migration newer than the recorded version
#[instrument(skip(conn))]
pub fn run_migrations(conn: &Connection) -> Result<()> {
    init_migrations_table(conn)?;

    let from = current_version(conn)?;
    debug!(from, "Checking for pending migrations");

    for migration in MIGRATIONS.iter().filter(|m| m.version > from) {
        info!(
            version = migration.version,
            description = migration.description,
            "Applying migration"
        );

        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(migration.sql)?;
        tx.execute(
            "INSERT INTO schema_migrations (version, description, applied_at) VALUES (?1, ?2, ?3)",
            rusqlite::params![
                migration.version,
                migration.description,
                chrono::Utc::now().to_rfc3339()
            ],
        )?;
        tx.commit()?;
    }

    let to = current_version(conn)?;
    if to > from {
        info!(from, to, "Database schema updated");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn latest_version() -> u32 {
        MIGRATIONS.last().map(|m| m.version).unwrap_or(0)
    }

    #[test]
    fn test_migrations_run() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        assert_eq!(current_version(&conn).unwrap(), latest_version());
    }

    #[test]
    fn test_migrations_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        assert_eq!(current_version(&conn).unwrap(), latest_version());
    }

    #[test]
    fn test_migrations_sequential() {
        for (i, migration) in MIGRATIONS.iter().enumerate() {
            assert_eq!(
                migration.version as usize,
                i + 1,
                "Migration {} should have version {}",
                migration.description,
                i + 1
            );
        }
    }

    #[test]
    fn test_scope_check_constraint() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let result = conn.execute(
            "INSERT INTO kv_entries (scope, key, value, updated_at) VALUES ('tab', 'k', 'v', 'now')",
            [],
        );
        assert!(result.is_err());
    }
}
