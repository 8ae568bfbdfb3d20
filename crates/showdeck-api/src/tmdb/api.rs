//! `TmdbApi` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;

use super::types::{
    DiscoverTvParams, ListParams, SearchTvParams, TmdbGenreList, TmdbTvDetails, TmdbTvSeason,
    TrendingWindow, TvShowPage,
};

/// TMDB API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(TmdbApi: Send)]
pub trait LocalTmdbApi {
    /// Fetches the `discover/tv` listing, optionally filtered by genres.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn discover_tv(&self, params: &DiscoverTvParams) -> Result<TvShowPage>;

    /// Fetches the `trending/tv/{window}` listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn trending_tv(&self, window: TrendingWindow, params: &ListParams)
    -> Result<TvShowPage>;

    /// Fetches the `tv/popular` listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn popular_tv(&self, params: &ListParams) -> Result<TvShowPage>;

    /// Fetches the `tv/on_the_air` listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn on_the_air_tv(&self, params: &ListParams) -> Result<TvShowPage>;

    /// Fetches the `tv/top_rated` listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn top_rated_tv(&self, params: &ListParams) -> Result<TvShowPage>;

    /// Searches for TV series.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn search_tv(&self, params: &SearchTvParams) -> Result<TvShowPage>;

    /// Fetches TV series details including season list.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn tv_details(&self, series_id: u64, language: &str) -> Result<TmdbTvDetails>;

    /// Fetches TV season details including episode list.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn tv_season(
        &self,
        series_id: u64,
        season_number: u32,
        language: &str,
    ) -> Result<TmdbTvSeason>;

    /// Fetches the list of TV genres.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn tv_genres(&self, language: &str) -> Result<TmdbGenreList>;
}
