//! TOML configuration for the `showdeck` binary.
//!
//! Holds TMDB request settings and the search history limit.

#[allow(clippy::module_inception)]
mod config;
mod paths;

#[allow(clippy::module_name_repetitions)]
pub use config::{AppConfig, TmdbConfig};
pub use paths::config_path;
