//! Schema versioning via `PRAGMA user_version`.

use anyhow::{Context, Result};
use rusqlite::Connection;

/// One schema step: target version and the SQL that reaches it.
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: "CREATE TABLE IF NOT EXISTS kv_store (
            key         TEXT PRIMARY KEY,
            value       TEXT NOT NULL,
            updated_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );",
}];

/// Latest schema version.
pub const CURRENT_VERSION: u32 = 1;

/// Applies every migration newer than the stored `user_version`.
///
/// # Errors
///
/// Returns an error if reading the version or any SQL statement fails.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    let version: u32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .context("failed to read user_version")?;

    for m in MIGRATIONS.iter().filter(|m| m.version > version) {
        tracing::debug!(from = version, to = m.version, "applying migration");
        conn.execute_batch(m.sql)
            .with_context(|| format!("migration to v{} failed", m.version))?;
    }

    if version < CURRENT_VERSION {
        conn.pragma_update(None, "user_version", CURRENT_VERSION)
            .context("failed to update user_version")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn user_version(conn: &Connection) -> u32 {
        conn.pragma_query_value(None, "user_version", |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_latest_migration_matches_current_version() {
        // Arrange & Act
        let last = MIGRATIONS.last().unwrap();

        // Assert
        assert_eq!(last.version, CURRENT_VERSION);
    }

    #[test]
    fn test_migrations_are_idempotent() {
        // Arrange
        let conn = Connection::open_in_memory().unwrap();

        // Act
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        // Assert
        assert_eq!(user_version(&conn), CURRENT_VERSION);
    }

    #[test]
    fn test_kv_store_exists_after_migration() {
        // Arrange
        let conn = Connection::open_in_memory().unwrap();

        // Act
        run_migrations(&conn).unwrap();

        // Assert
        let count: u32 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='kv_store'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }
}
