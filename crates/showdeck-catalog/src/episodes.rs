//! Season/episode picker for a single series.

use std::sync::Arc;

use showdeck_api::tmdb::{LocalTmdbApi, TmdbEpisode};
use tracing::instrument;

use crate::coordinator::DEFAULT_LANGUAGE;

/// Currently selected `(season, episode)` of a series.
///
/// Starts at season 1, episode 1. Selecting a season resets the episode to 1
/// and reloads the episode list.
pub struct EpisodePicker<A> {
    api: Arc<A>,
    series_id: u64,
    language: String,
    season: u32,
    episode: u32,
    episodes: Vec<TmdbEpisode>,
}

impl<A> std::fmt::Debug for EpisodePicker<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EpisodePicker")
            .field("series_id", &self.series_id)
            .field("season", &self.season)
            .field("episode", &self.episode)
            .field("episodes", &self.episodes.len())
            .finish_non_exhaustive()
    }
}

impl<A: LocalTmdbApi> EpisodePicker<A> {
    /// Creates a picker for `series_id` at season 1, episode 1.
    /// The episode list is empty until a season is selected.
    #[must_use]
    pub fn new(api: Arc<A>, series_id: u64) -> Self {
        Self {
            api,
            series_id,
            language: String::from(DEFAULT_LANGUAGE),
            season: 1,
            episode: 1,
            episodes: Vec::new(),
        }
    }

    /// Sets the response language.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Series this picker belongs to.
    #[must_use]
    pub const fn series_id(&self) -> u64 {
        self.series_id
    }

    /// `(season, episode)`.
    #[must_use]
    pub const fn selection(&self) -> (u32, u32) {
        (self.season, self.episode)
    }

    /// Episodes of the selected season.
    #[must_use]
    pub fn episodes(&self) -> &[TmdbEpisode] {
        &self.episodes
    }

    /// Selects `season`, resets the episode to 1, and loads its episodes.
    ///
    /// A failed load leaves the episode list empty and is logged.
    #[allow(clippy::future_not_send)]
    #[instrument(skip_all, fields(series_id = self.series_id, season = season))]
    pub async fn select_season(&mut self, season: u32) {
        self.season = season;
        self.episode = 1;
        self.episodes = match self
            .api
            .tv_season(self.series_id, season, &self.language)
            .await
        {
            Ok(loaded) => loaded.episodes,
            Err(e) => {
                tracing::warn!(error = %format!("{e:#}"), "failed to load season episodes");
                Vec::new()
            }
        };
    }

    /// Selects `episode` within the current season.
    pub const fn select_episode(&mut self, episode: u32) {
        self.episode = episode;
    }

    /// Episode record for the current selection, if loaded.
    #[must_use]
    pub fn current_episode(&self) -> Option<&TmdbEpisode> {
        self.episodes
            .iter()
            .find(|e| e.episode_number == self.episode)
    }
}
