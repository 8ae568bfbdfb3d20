//! Upstream query descriptors and cache keys.

use std::fmt;

use anyhow::Result;
use showdeck_api::tmdb::{DiscoverTvParams, ListParams, LocalTmdbApi, TrendingWindow, TvShowPage};

use crate::genres::GenreFilter;
use crate::view::ViewType;

/// The single upstream listing a view resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingQuery {
    /// `discover/tv`, filtered by comma-joined genre IDs (empty = unfiltered).
    Discover {
        /// Comma-joined genre IDs.
        with_genres: String,
    },
    /// `trending/tv/{window}`.
    Trending(TrendingWindow),
    /// `tv/popular`.
    Popular,
    /// `tv/on_the_air`.
    OnTheAir,
    /// `tv/top_rated`.
    TopRated,
}

impl ListingQuery {
    /// Resolves a view (and, for discover, its genre filter) to its query.
    #[must_use]
    pub fn for_view(view: ViewType, genres: &GenreFilter) -> Self {
        match view {
            ViewType::Discover => Self::Discover {
                with_genres: genres.to_query_string(),
            },
            ViewType::TodayTrending => Self::Trending(TrendingWindow::Day),
            ViewType::ThisWeekTrending => Self::Trending(TrendingWindow::Week),
            ViewType::Popular => Self::Popular,
            ViewType::OnTheAir => Self::OnTheAir,
            ViewType::TopRated => Self::TopRated,
        }
    }

    /// Upstream path this query is sent to, relative to the API root.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Discover { .. } => String::from("discover/tv"),
            Self::Trending(window) => format!("trending/tv/{window}"),
            Self::Popular => String::from("tv/popular"),
            Self::OnTheAir => String::from("tv/on_the_air"),
            Self::TopRated => String::from("tv/top_rated"),
        }
    }

    /// Executes the query for `page` against the API.
    ///
    /// # Errors
    ///
    /// Returns the API error unchanged.
    #[allow(clippy::future_not_send)]
    pub async fn execute<A: LocalTmdbApi>(
        &self,
        api: &A,
        page: u32,
        language: &str,
    ) -> Result<TvShowPage> {
        let params = ListParams::page(page).language(language);
        match self {
            Self::Discover { with_genres } => {
                let params =
                    DiscoverTvParams::new(page, with_genres.as_str()).language(language);
                api.discover_tv(&params).await
            }
            Self::Trending(window) => api.trending_tv(*window, &params).await,
            Self::Popular => api.popular_tv(&params).await,
            Self::OnTheAir => api.on_the_air_tv(&params).await,
            Self::TopRated => api.top_rated_tv(&params).await,
        }
    }
}

/// Cache key for a catalog page: `("<kebab-view>-tv-shows", page, genres)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CatalogKey {
    /// Kebab-cased view name with the `-tv-shows` suffix.
    pub name: String,
    /// Page number.
    pub page: u32,
    /// Comma-joined genre IDs.
    pub genres: String,
}

impl CatalogKey {
    /// Builds the key for a `(view, page, genres)` tuple.
    #[must_use]
    pub fn new(view: ViewType, page: u32, genres: &GenreFilter) -> Self {
        Self {
            name: format!("{}-tv-shows", view.kebab()),
            page,
            genres: genres.to_query_string(),
        }
    }
}

impl fmt::Display for CatalogKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {:?}]", self.name, self.page, self.genres)
    }
}
