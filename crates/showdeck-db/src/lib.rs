//! Local storage for showdeck.
//!
//! Uses `rusqlite` (bundled `SQLite`) as a small key-value store, and keeps
//! the most-recently-used search history lists on top of it.

mod connection;
/// Search history lists.
pub mod history;
/// Key-value store operations.
pub mod kv;
mod migrations;

#[allow(clippy::module_name_repetitions)]
pub use connection::{open_db, open_in_memory};
pub use history::{
    DEFAULT_HISTORY_LIMIT, TV_SEARCH_HISTORY, clear_search_history, load_search_history,
    record_search,
};
