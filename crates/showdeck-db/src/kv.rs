//! String key-value operations on `kv_store`.

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};

/// Reads the value stored under `key`.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_value(conn: &Connection, key: &str) -> Result<Option<String>> {
    conn.query_row(
        "SELECT value FROM kv_store WHERE key = ?1",
        params![key],
        |row| row.get(0),
    )
    .optional()
    .with_context(|| format!("failed to read key {key}"))
}

/// Stores `value` under `key`, replacing any previous value.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn set_value(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        params![key, value],
    )
    .with_context(|| format!("failed to write key {key}"))?;
    Ok(())
}

/// Removes `key`. Returns `true` if it existed.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_value(conn: &Connection, key: &str) -> Result<bool> {
    let removed = conn
        .execute("DELETE FROM kv_store WHERE key = ?1", params![key])
        .with_context(|| format!("failed to delete key {key}"))?;
    Ok(removed > 0)
}
