//! Config file location.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

const CONFIG_FILE: &str = "config.toml";

/// Returns `{dir}/config.toml` when `dir` is given, otherwise
/// `~/.config/showdeck/config.toml`.
///
/// # Errors
///
/// Returns an error if `dir` is `None` and `HOME` is not set.
pub fn config_path(dir: Option<&Path>) -> Result<PathBuf> {
    match dir {
        Some(d) => Ok(d.join(CONFIG_FILE)),
        None => {
            let home = std::env::var("HOME").context("HOME environment variable is not set")?;
            Ok([home.as_str(), ".config", "showdeck", CONFIG_FILE]
                .iter()
                .collect())
        }
    }
}
