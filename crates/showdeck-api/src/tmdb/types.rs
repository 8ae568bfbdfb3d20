//! TMDB API response types and request parameters.

use std::fmt;

use serde::Deserialize;

/// Default response language.
const DEFAULT_LANGUAGE: &str = "en-US";

// --- Listings ---

/// A page of TV show records.
///
/// Shared by the discover, trending, popular, on-the-air, top-rated
/// and `search/tv` endpoints.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TvShowPage {
    /// Current page number.
    pub page: u32,
    /// Show records in upstream order.
    pub results: Vec<TvShow>,
    /// Total number of pages.
    pub total_pages: u32,
    /// Total number of results.
    pub total_results: u32,
}

/// A single TV show record as returned by listing endpoints.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TvShow {
    /// TMDB series ID.
    pub id: u64,
    /// Localized name.
    pub name: String,
    /// Original name.
    pub original_name: String,
    /// Original language (ISO 639-1).
    pub original_language: String,
    /// Origin countries (ISO 3166-1).
    #[serde(default)]
    pub origin_country: Vec<String>,
    /// First air date (YYYY-MM-DD or null).
    pub first_air_date: Option<String>,
    /// Overview text.
    pub overview: Option<String>,
    /// Popularity score.
    #[serde(default)]
    pub popularity: f64,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
    /// Vote count.
    #[serde(default)]
    pub vote_count: u32,
    /// Genre IDs.
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    /// Adult flag.
    #[serde(default)]
    pub adult: bool,
    /// Poster image path.
    pub poster_path: Option<String>,
    /// Backdrop image path.
    pub backdrop_path: Option<String>,
}

/// Time window for the `trending/tv/{window}` endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrendingWindow {
    /// Trending over the last day.
    Day,
    /// Trending over the last week.
    Week,
}

impl TrendingWindow {
    /// Returns the path segment used by TMDB.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
        }
    }
}

impl fmt::Display for TrendingWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- TV Details ---

/// Response from `tv/{series_id}` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbTvDetails {
    /// TMDB series ID.
    pub id: u64,
    /// Localized name.
    pub name: String,
    /// Original name.
    pub original_name: String,
    /// Original language (ISO 639-1).
    pub original_language: String,
    /// Origin countries (ISO 3166-1).
    #[serde(default)]
    pub origin_country: Vec<String>,
    /// First air date.
    pub first_air_date: Option<String>,
    /// Last air date.
    pub last_air_date: Option<String>,
    /// Total number of episodes.
    #[serde(default)]
    pub number_of_episodes: u32,
    /// Total number of seasons.
    #[serde(default)]
    pub number_of_seasons: u32,
    /// Season summaries.
    #[serde(default)]
    pub seasons: Vec<TmdbSeasonSummary>,
    /// Status (e.g., "Returning Series", "Ended").
    pub status: Option<String>,
    /// Tagline.
    pub tagline: Option<String>,
    /// Overview text.
    pub overview: Option<String>,
    /// Popularity score.
    #[serde(default)]
    pub popularity: f64,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
    /// Genres.
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
    /// Whether the show is still in production.
    #[serde(default)]
    pub in_production: bool,
    /// Poster image path.
    pub poster_path: Option<String>,
    /// Backdrop image path.
    pub backdrop_path: Option<String>,
    /// Cast and crew (`append_to_response=credits`).
    #[serde(default)]
    pub credits: TmdbCredits,
    /// Videos (`append_to_response=videos`).
    #[serde(default)]
    pub videos: TmdbVideoList,
    /// Images (`append_to_response=images`).
    #[serde(default)]
    pub images: TmdbImages,
    /// Recommended shows, first page (`append_to_response=recommendations`).
    pub recommendations: Option<TvShowPage>,
    /// Similar shows, first page (`append_to_response=similar`).
    pub similar: Option<TvShowPage>,
}

/// Credits appended to TV details.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbCredits {
    /// Cast members in billing order.
    #[serde(default)]
    pub cast: Vec<TmdbCastMember>,
}

/// One cast member.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbCastMember {
    /// TMDB person ID.
    pub id: u64,
    /// Person name.
    pub name: String,
    /// Character played.
    #[serde(default)]
    pub character: String,
    /// Profile image path.
    pub profile_path: Option<String>,
    /// Billing order.
    #[serde(default)]
    pub order: u32,
}

/// Videos appended to TV details.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbVideoList {
    /// Video entries.
    #[serde(default)]
    pub results: Vec<TmdbVideo>,
}

/// A video hosted on an external site.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TmdbVideo {
    /// Video ID.
    pub id: String,
    /// Site-specific key (YouTube video ID).
    pub key: String,
    /// Title.
    pub name: String,
    /// Hosting site (e.g., "YouTube").
    pub site: String,
    /// Kind of video (e.g., "Trailer", "Teaser").
    #[serde(rename = "type")]
    pub video_type: String,
    /// Whether the video is official.
    #[serde(default)]
    pub official: bool,
}

/// Images appended to TV details.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbImages {
    /// Backdrop images.
    #[serde(default)]
    pub backdrops: Vec<TmdbImage>,
    /// Poster images.
    #[serde(default)]
    pub posters: Vec<TmdbImage>,
}

/// A single image entry.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbImage {
    /// Image path.
    pub file_path: String,
    /// Width in pixels.
    #[serde(default)]
    pub width: u32,
    /// Height in pixels.
    #[serde(default)]
    pub height: u32,
    /// Language of any text in the image.
    pub iso_639_1: Option<String>,
}

/// Season summary within TV details.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbSeasonSummary {
    /// TMDB season ID.
    pub id: u64,
    /// Season number (0 = specials).
    pub season_number: u32,
    /// Number of episodes in this season.
    #[serde(default)]
    pub episode_count: u32,
    /// Air date of this season.
    pub air_date: Option<String>,
    /// Season name.
    pub name: String,
    /// Season overview.
    pub overview: Option<String>,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
}

/// Genre entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TmdbGenre {
    /// Genre ID.
    pub id: u32,
    /// Genre name.
    pub name: String,
}

/// Response from `genre/tv/list` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbGenreList {
    /// Available TV genres.
    pub genres: Vec<TmdbGenre>,
}

// --- TV Season Details ---

/// Response from `tv/{series_id}/season/{season_number}` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbTvSeason {
    /// Internal `MongoDB` ID.
    #[serde(rename = "_id", default)]
    pub internal_id: Option<String>,
    /// TMDB season ID.
    pub id: u64,
    /// Season number.
    pub season_number: u32,
    /// Season name.
    pub name: Option<String>,
    /// Season overview.
    pub overview: Option<String>,
    /// Air date.
    pub air_date: Option<String>,
    /// Episodes in this season.
    #[serde(default)]
    pub episodes: Vec<TmdbEpisode>,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
}

/// A single episode within a season.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbEpisode {
    /// TMDB episode ID.
    pub id: u64,
    /// Episode number within the season.
    pub episode_number: u32,
    /// Episode name.
    pub name: String,
    /// Episode overview.
    pub overview: Option<String>,
    /// Air date.
    pub air_date: Option<String>,
    /// Season number.
    pub season_number: u32,
    /// Parent show ID.
    pub show_id: u64,
    /// Runtime in minutes.
    pub runtime: Option<u32>,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
    /// Still image path.
    pub still_path: Option<String>,
}

// --- Error Response ---

/// TMDB API error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbErrorResponse {
    /// TMDB error code.
    pub status_code: u32,
    /// Error message.
    pub status_message: String,
    /// Success flag (always false for errors).
    #[allow(dead_code)]
    #[serde(default)]
    pub success: bool,
}

// --- Request Parameters ---

/// Parameters shared by the plain listing endpoints
/// (`trending`, `popular`, `on_the_air`, `top_rated`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    /// Response language (default: "en-US").
    pub language: String,
    /// Result page (default: 1).
    pub page: u32,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            language: String::from(DEFAULT_LANGUAGE),
            page: 1,
        }
    }
}

impl ListParams {
    /// Creates params for the given page.
    #[must_use]
    pub fn page(page: u32) -> Self {
        Self {
            page,
            ..Self::default()
        }
    }

    /// Sets the response language.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}

/// Parameters for `discover/tv` endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoverTvParams {
    /// Response language (default: "en-US").
    pub language: String,
    /// Result page (default: 1).
    pub page: u32,
    /// Comma-joined genre IDs. Empty means unfiltered.
    pub with_genres: String,
}

impl Default for DiscoverTvParams {
    fn default() -> Self {
        Self {
            language: String::from(DEFAULT_LANGUAGE),
            page: 1,
            with_genres: String::new(),
        }
    }
}

impl DiscoverTvParams {
    /// Creates params for the given page and genre filter string.
    pub fn new(page: u32, with_genres: impl Into<String>) -> Self {
        Self {
            page,
            with_genres: with_genres.into(),
            ..Self::default()
        }
    }

    /// Sets the response language.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}

/// Parameters for `search/tv` endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTvParams {
    /// Search query (required).
    pub query: String,
    /// Response language (default: "en-US").
    pub language: String,
    /// Result page (1-500, default: 1).
    pub page: u32,
    /// Filter by first air date year.
    pub first_air_date_year: Option<u32>,
    /// Include adult content.
    pub include_adult: bool,
}

impl SearchTvParams {
    /// Creates new search params with the given query.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            language: String::from(DEFAULT_LANGUAGE),
            page: 1,
            first_air_date_year: None,
            include_adult: false,
        }
    }

    /// Sets the response language.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Sets the result page.
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Sets the first air date year filter.
    #[must_use]
    pub const fn first_air_date_year(mut self, year: u32) -> Self {
        self.first_air_date_year = Some(year);
        self
    }
}
