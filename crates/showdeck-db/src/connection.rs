//! Opening the store.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rusqlite::Connection;

use super::migrations::run_migrations;

const DB_FILE: &str = "showdeck.db";

/// Opens (or creates) the store and brings its schema up to date.
///
/// The file is `{dir}/showdeck.db` when `dir` is given, otherwise
/// `~/.local/share/showdeck/showdeck.db`. Missing parent directories are
/// created.
///
/// # Errors
///
/// Returns an error if the path cannot be resolved, the file cannot be
/// opened, or a migration fails.
pub fn open_db(dir: Option<&Path>) -> Result<Connection> {
    let path = db_path(dir)?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    tracing::debug!(path = %path.display(), "opening database");
    let conn = Connection::open(&path)
        .with_context(|| format!("failed to open database {}", path.display()))?;
    run_migrations(&conn).context("database migration failed")?;
    Ok(conn)
}

/// Opens a migrated, throwaway in-memory store.
///
/// # Errors
///
/// Returns an error if `SQLite` cannot open the database or a migration fails.
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
    run_migrations(&conn).context("database migration failed")?;
    Ok(conn)
}

fn db_path(dir: Option<&Path>) -> Result<PathBuf> {
    match dir {
        Some(d) => Ok(d.join(DB_FILE)),
        None => {
            let home = std::env::var("HOME").context("HOME environment variable is not set")?;
            Ok([home.as_str(), ".local", "share", "showdeck", DB_FILE]
                .iter()
                .collect())
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_open_db_creates_file_in_dir() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("state");

        // Act
        let conn = open_db(Some(&nested)).unwrap();

        // Assert
        assert!(nested.join("showdeck.db").exists());
        let version: u32 = conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .unwrap();
        assert!(version > 0);
    }

    #[test]
    fn test_db_path_with_dir() {
        // Arrange & Act
        let path = db_path(Some(Path::new("/tmp/showdeck-test"))).unwrap();

        // Assert
        assert_eq!(path, PathBuf::from("/tmp/showdeck-test/showdeck.db"));
    }

    #[test]
    fn test_db_path_default() {
        // Arrange & Act
        let path = db_path(None).unwrap();

        // Assert
        assert!(path.ends_with(".local/share/showdeck/showdeck.db"));
    }
}
