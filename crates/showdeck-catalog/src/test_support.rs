//! Mock TMDB API shared by unit tests.
#![allow(clippy::unwrap_used)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Result, bail};
use showdeck_api::tmdb::{
    DiscoverTvParams, ListParams, LocalTmdbApi, SearchTvParams, TmdbEpisode, TmdbGenre,
    TmdbGenreList, TmdbTvDetails, TmdbTvSeason, TrendingWindow, TvShow, TvShowPage,
};

/// A recorded API call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    Discover { page: u32, with_genres: String },
    Trending { window: TrendingWindow, page: u32 },
    Popular { page: u32 },
    OnTheAir { page: u32 },
    TopRated { page: u32 },
    Search { query: String, page: u32 },
    Details { series_id: u64 },
    Season { series_id: u64, season: u32 },
    Genres,
}

/// Mock API that records calls and returns synthetic pages.
pub struct MockTmdbApi {
    calls: Mutex<Vec<ApiCall>>,
    delay: Duration,
    failing: AtomicBool,
}

impl MockTmdbApi {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            delay: Duration::ZERO,
            failing: AtomicBool::new(false),
        }
    }

    /// Every call sleeps for `delay` before answering.
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Makes every subsequent call fail.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    async fn record(&self, call: ApiCall) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            bail!("TMDB API error (HTTP 500 Internal Server Error): mock failure");
        }
        Ok(())
    }
}

/// Builds a minimal show record.
pub fn make_show(id: u64, name: &str) -> TvShow {
    TvShow {
        id,
        name: String::from(name),
        original_name: String::from(name),
        original_language: String::from("en"),
        origin_country: vec![String::from("US")],
        first_air_date: Some(String::from("2020-01-01")),
        overview: None,
        popularity: 1.0,
        vote_average: 7.5,
        vote_count: 10,
        genre_ids: vec![18],
        adult: false,
        poster_path: Some(String::from("/poster.jpg")),
        backdrop_path: None,
    }
}

/// Builds a page whose show IDs encode the source tag and page number.
pub fn make_page(tag: u64, page: u32) -> TvShowPage {
    let base = tag * 1000 + u64::from(page) * 10;
    TvShowPage {
        page,
        results: vec![
            make_show(base + 1, &format!("show {} p{page} a", base + 1)),
            make_show(base + 2, &format!("show {} p{page} b", base + 2)),
        ],
        total_pages: 5,
        total_results: 100,
    }
}

fn make_episode(series_id: u64, season: u32, number: u32) -> TmdbEpisode {
    TmdbEpisode {
        id: u64::from(season) * 100 + u64::from(number),
        episode_number: number,
        name: format!("Episode {number}"),
        overview: None,
        air_date: None,
        season_number: season,
        show_id: series_id,
        runtime: Some(45),
        vote_average: 7.0,
        still_path: None,
    }
}

impl LocalTmdbApi for MockTmdbApi {
    async fn discover_tv(&self, params: &DiscoverTvParams) -> Result<TvShowPage> {
        self.record(ApiCall::Discover {
            page: params.page,
            with_genres: params.with_genres.clone(),
        })
        .await?;
        Ok(make_page(1, params.page))
    }

    async fn trending_tv(
        &self,
        window: TrendingWindow,
        params: &ListParams,
    ) -> Result<TvShowPage> {
        self.record(ApiCall::Trending {
            window,
            page: params.page,
        })
        .await?;
        let tag = match window {
            TrendingWindow::Day => 2,
            TrendingWindow::Week => 3,
        };
        Ok(make_page(tag, params.page))
    }

    async fn popular_tv(&self, params: &ListParams) -> Result<TvShowPage> {
        self.record(ApiCall::Popular { page: params.page }).await?;
        Ok(make_page(4, params.page))
    }

    async fn on_the_air_tv(&self, params: &ListParams) -> Result<TvShowPage> {
        self.record(ApiCall::OnTheAir { page: params.page }).await?;
        Ok(make_page(5, params.page))
    }

    async fn top_rated_tv(&self, params: &ListParams) -> Result<TvShowPage> {
        self.record(ApiCall::TopRated { page: params.page }).await?;
        Ok(make_page(6, params.page))
    }

    async fn search_tv(&self, params: &SearchTvParams) -> Result<TvShowPage> {
        self.record(ApiCall::Search {
            query: params.query.clone(),
            page: params.page,
        })
        .await?;
        Ok(make_page(7, params.page))
    }

    async fn tv_details(&self, series_id: u64, _language: &str) -> Result<TmdbTvDetails> {
        self.record(ApiCall::Details { series_id }).await?;
        bail!("tv_details is not mocked")
    }

    async fn tv_season(
        &self,
        series_id: u64,
        season_number: u32,
        _language: &str,
    ) -> Result<TmdbTvSeason> {
        self.record(ApiCall::Season {
            series_id,
            season: season_number,
        })
        .await?;
        Ok(TmdbTvSeason {
            internal_id: None,
            id: u64::from(season_number),
            season_number,
            name: Some(format!("Season {season_number}")),
            overview: None,
            air_date: None,
            episodes: (1..=3)
                .map(|n| make_episode(series_id, season_number, n))
                .collect(),
            vote_average: 0.0,
        })
    }

    async fn tv_genres(&self, _language: &str) -> Result<TmdbGenreList> {
        self.record(ApiCall::Genres).await?;
        Ok(TmdbGenreList {
            genres: vec![TmdbGenre {
                id: 18,
                name: String::from("Drama"),
            }],
        })
    }
}
