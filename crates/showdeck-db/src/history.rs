//! Most-recently-used search history lists.
//!
//! Each scope is one `kv_store` entry holding a JSON array of terms, most
//! recent first.

use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::kv::{delete_value, get_value, set_value};

/// Scope of the TV search box.
pub const TV_SEARCH_HISTORY: &str = "tv-search-histories";

/// Number of terms kept per scope unless configured otherwise.
pub const DEFAULT_HISTORY_LIMIT: usize = 5;

/// Loads a scope's terms, most recent first.
///
/// A value that is not a JSON string array is treated as an empty history.
///
/// # Errors
///
/// Returns an error if the read fails.
pub fn load_search_history(conn: &Connection, scope: &str) -> Result<Vec<String>> {
    let Some(raw) = get_value(conn, scope)? else {
        return Ok(Vec::new());
    };
    match serde_json::from_str::<Vec<String>>(&raw) {
        Ok(terms) => Ok(terms),
        Err(e) => {
            tracing::warn!(scope, error = %e, "ignoring unreadable search history");
            Ok(Vec::new())
        }
    }
}

/// Records `term` in a scope and returns the updated list.
///
/// The term is trimmed; blank terms leave the history unchanged. An equal
/// entry already present moves to the front instead of being duplicated.
/// The list is cut to `limit` entries.
///
/// # Errors
///
/// Returns an error if the read or the write fails.
pub fn record_search(
    conn: &Connection,
    scope: &str,
    term: &str,
    limit: usize,
) -> Result<Vec<String>> {
    let mut terms = load_search_history(conn, scope)?;
    let term = term.trim();
    if term.is_empty() {
        return Ok(terms);
    }

    terms.retain(|t| t != term);
    terms.insert(0, term.to_owned());
    terms.truncate(limit);

    let raw = serde_json::to_string(&terms).context("failed to encode search history")?;
    set_value(conn, scope, &raw)?;
    tracing::debug!(scope, term, kept = terms.len(), "recorded search term");
    Ok(terms)
}

/// Clears a scope. Returns `true` if it held any history.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn clear_search_history(conn: &Connection, scope: &str) -> Result<bool> {
    delete_value(conn, scope)
}
