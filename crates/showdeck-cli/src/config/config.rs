//! `AppConfig` and its TOML file.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use showdeck_db::DEFAULT_HISTORY_LIMIT;

/// Top-level configuration. Every section and field is optional.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// TMDB request settings.
    #[serde(default)]
    pub tmdb: TmdbConfig,
    /// Search settings.
    #[serde(default)]
    pub search: SearchConfig,
}

/// `[tmdb]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TmdbConfig {
    /// Response language sent with every request.
    pub language: String,
    /// Minimum spacing between requests, in milliseconds.
    pub min_interval_ms: u64,
    /// API root override, e.g. a local mirror. Must end with `/3/`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            language: String::from("en-US"),
            min_interval_ms: 25,
            base_url: None,
        }
    }
}

impl TmdbConfig {
    /// Request spacing as a [`Duration`].
    #[must_use]
    pub const fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }

    /// Language part of the locale (`ja` for `ja-JP`), used to pick
    /// original titles.
    #[must_use]
    pub fn display_language(&self) -> &str {
        self.language
            .split_once('-')
            .map_or(self.language.as_str(), |(lang, _)| lang)
    }
}

/// `[search]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SearchConfig {
    /// Number of recent search terms kept.
    pub history_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl AppConfig {
    /// Loads the file at `path`; a missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Writes the file at `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content = self.to_toml()?;
        std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }

    /// Renders the configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("failed to serialize config to TOML")
    }
}
