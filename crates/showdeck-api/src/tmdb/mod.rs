//! TMDB API client module.
//!
//! Handles HTTP requests to the TMDB API v3 endpoints and retrieves
//! TV listings (discover, trending, popular, on the air, top rated),
//! search results, series details, seasons and genres.

mod api;
mod client;
mod rate_limiter;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalTmdbApi, TmdbApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{TmdbClient, TmdbClientBuilder};
#[allow(clippy::module_name_repetitions)]
pub use types::{
    DiscoverTvParams, ListParams, SearchTvParams, TmdbCastMember, TmdbCredits, TmdbEpisode,
    TmdbErrorResponse, TmdbGenre, TmdbGenreList, TmdbImage, TmdbImages, TmdbSeasonSummary,
    TmdbTvDetails, TmdbTvSeason, TmdbVideo, TmdbVideoList, TrendingWindow, TvShow, TvShowPage,
};
