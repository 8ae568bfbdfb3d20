//! `TmdbClient` - TMDB API client implementation.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::{Client, Response, StatusCode};
use tokio::sync::Mutex;
use tracing::instrument;
use url::Url;

use super::api::LocalTmdbApi;
use super::rate_limiter::TmdbRateLimiter;
use super::types::{
    DiscoverTvParams, ListParams, SearchTvParams, TmdbErrorResponse, TmdbGenreList,
    TmdbTvDetails, TmdbTvSeason, TrendingWindow, TvShowPage,
};

/// Default base URL for TMDB API v3.
const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Maximum number of retries for HTTP 429 responses.
const MAX_RETRIES: u32 = 3;

/// Backoff step between retries (multiplied by the attempt number).
const RETRY_BACKOFF: Duration = Duration::from_secs(1);

/// Sub-resources fetched together with TV details.
const DETAILS_APPEND: &str = "credits,videos,images,recommendations,similar";

/// Query parameter list passed to `reqwest`.
type Query<'a> = [(&'a str, String)];

/// TMDB API client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClient {
    /// HTTP client.
    http: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// Bearer API token.
    api_token: String,
    /// Rate limiter shared by all requests of this client.
    limiter: Arc<Mutex<TmdbRateLimiter>>,
}

/// Builder for `TmdbClient`.
#[derive(Debug, Default)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClientBuilder {
    base_url: Option<Url>,
    api_token: Option<String>,
    user_agent: Option<String>,
    min_interval: Option<Duration>,
}

impl TmdbClientBuilder {
    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the API bearer token (required).
    #[must_use]
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the minimum request interval (default: 25ms).
    #[must_use]
    pub const fn min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = Some(interval);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `api_token` is not set.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<TmdbClient> {
        let api_token = self.api_token.context("api_token is required")?;
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = match self.base_url {
            Some(url) => url,
            None => Url::parse(DEFAULT_BASE_URL).context("invalid default base URL")?,
        };

        let limiter = self
            .min_interval
            .map_or_else(TmdbRateLimiter::default_interval, TmdbRateLimiter::new);

        let http = Client::builder()
            .user_agent(user_agent)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(TmdbClient {
            http,
            base_url,
            api_token,
            limiter: Arc::new(Mutex::new(limiter)),
        })
    }
}

impl TmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> TmdbClientBuilder {
        TmdbClientBuilder::default()
    }

    /// Fetches one of the plain paged listings (`language` + `page` only).
    async fn get_listing(&self, path: &str, params: &ListParams) -> Result<TvShowPage> {
        let query = [
            ("language", params.language.clone()),
            ("page", params.page.to_string()),
        ];
        self.get_json(path, &query).await
    }

    /// Sends a rate-limited GET and decodes the JSON body.
    #[instrument(skip_all, fields(path = path))]
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &Query<'_>,
    ) -> Result<T> {
        let url = self
            .base_url
            .join(path)
            .with_context(|| format!("failed to join URL path: {path}"))?;

        let response = self.send_with_retry(&url, path, query).await?;
        let status = response.status();
        let body = response
            .text()
            .await
            .with_context(|| format!("failed to read response body: {path}"))?;

        if !status.is_success() {
            return Err(upstream_error(status, &body));
        }

        serde_json::from_str(&body).with_context(|| format!("failed to decode JSON response: {path}"))
    }

    /// Executes the request, retrying up to `MAX_RETRIES` times on HTTP 429.
    async fn send_with_retry(&self, url: &Url, path: &str, query: &Query<'_>) -> Result<Response> {
        let mut attempt = 0u32;
        loop {
            self.limiter.lock().await.wait().await;

            let request = self
                .http
                .get(url.clone())
                .bearer_auth(&self.api_token)
                .query(query)
                .build()
                .with_context(|| format!("failed to build request: {path}"))?;

            tracing::debug!(url = %request.url(), "TMDB API request");

            let response = self
                .http
                .execute(request)
                .await
                .with_context(|| format!("request failed: {path}"))?;

            if response.status() != StatusCode::TOO_MANY_REQUESTS {
                return Ok(response);
            }

            attempt = attempt.saturating_add(1);
            if attempt > MAX_RETRIES {
                bail!("TMDB API rate limit exceeded after {MAX_RETRIES} retries: {path}");
            }
            tracing::warn!(
                retry = attempt,
                max_retries = MAX_RETRIES,
                "TMDB API rate limited (429). Retrying..."
            );
            tokio::time::sleep(RETRY_BACKOFF.saturating_mul(attempt)).await;
        }
    }
}

/// Builds the error for a non-success response, preferring TMDB's error body.
fn upstream_error(status: StatusCode, body: &str) -> anyhow::Error {
    match serde_json::from_str::<TmdbErrorResponse>(body) {
        Ok(err) => anyhow::anyhow!(
            "TMDB API error (HTTP {status}): code={}, message={}",
            err.status_code,
            err.status_message,
        ),
        Err(_) => anyhow::anyhow!("TMDB API error (HTTP {status}): {body}"),
    }
}

impl LocalTmdbApi for TmdbClient {
    #[instrument(skip_all)]
    async fn discover_tv(&self, params: &DiscoverTvParams) -> Result<TvShowPage> {
        let mut query: Vec<(&str, String)> = vec![
            ("language", params.language.clone()),
            ("page", params.page.to_string()),
        ];
        if !params.with_genres.is_empty() {
            query.push(("with_genres", params.with_genres.clone()));
        }

        self.get_json("discover/tv", &query).await
    }

    #[instrument(skip_all)]
    async fn trending_tv(
        &self,
        window: TrendingWindow,
        params: &ListParams,
    ) -> Result<TvShowPage> {
        let path = format!("trending/tv/{window}");
        self.get_listing(&path, params).await
    }

    #[instrument(skip_all)]
    async fn popular_tv(&self, params: &ListParams) -> Result<TvShowPage> {
        self.get_listing("tv/popular", params).await
    }

    #[instrument(skip_all)]
    async fn on_the_air_tv(&self, params: &ListParams) -> Result<TvShowPage> {
        self.get_listing("tv/on_the_air", params).await
    }

    #[instrument(skip_all)]
    async fn top_rated_tv(&self, params: &ListParams) -> Result<TvShowPage> {
        self.get_listing("tv/top_rated", params).await
    }

    #[instrument(skip_all)]
    async fn search_tv(&self, params: &SearchTvParams) -> Result<TvShowPage> {
        let mut query: Vec<(&str, String)> = vec![
            ("query", params.query.clone()),
            ("language", params.language.clone()),
            ("page", params.page.to_string()),
            ("include_adult", params.include_adult.to_string()),
        ];
        if let Some(year) = params.first_air_date_year {
            query.push(("first_air_date_year", year.to_string()));
        }

        self.get_json("search/tv", &query).await
    }

    #[instrument(skip_all)]
    async fn tv_details(&self, series_id: u64, language: &str) -> Result<TmdbTvDetails> {
        let path = format!("tv/{series_id}");
        // `null` keeps untagged images, which covers most backdrops.
        let image_language = language.split_once('-').map_or(language, |(lang, _)| lang);
        let query = [
            ("language", String::from(language)),
            ("append_to_response", String::from(DETAILS_APPEND)),
            ("include_image_language", format!("{image_language},null")),
        ];
        self.get_json(&path, &query).await
    }

    #[instrument(skip_all)]
    async fn tv_season(
        &self,
        series_id: u64,
        season_number: u32,
        language: &str,
    ) -> Result<TmdbTvSeason> {
        let path = format!("tv/{series_id}/season/{season_number}");
        let query = [("language", String::from(language))];
        self.get_json(&path, &query).await
    }

    #[instrument(skip_all)]
    async fn tv_genres(&self, language: &str) -> Result<TmdbGenreList> {
        let query = [("language", String::from(language))];
        self.get_json("genre/tv/list", &query).await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    /// Builds a client pointed at the mock server with rate limiting disabled.
    fn mock_client(server: &MockServer) -> TmdbClient {
        let base_url = format!("{}/3/", server.uri());
        TmdbClient::builder()
            .base_url(base_url.parse().unwrap())
            .api_token("test-token")
            .user_agent("test/0.0.0")
            .min_interval(Duration::from_millis(0))
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_requires_api_token() {
        // Arrange & Act
        let result = TmdbClient::builder().user_agent("test/0.0.0").build();

        // Assert
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("api_token is required")
        );
    }

    #[test]
    fn test_builder_requires_user_agent() {
        // Arrange & Act
        let result = TmdbClient::builder().api_token("test-token").build();

        // Assert
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("user_agent is required")
        );
    }

    #[test]
    fn test_builder_with_custom_base_url() {
        // Arrange
        let custom_url = Url::parse("http://localhost:8080/3/").unwrap();

        // Act
        let client = TmdbClient::builder()
            .base_url(custom_url.clone())
            .api_token("test-token")
            .user_agent("test/0.0.0")
            .build()
            .unwrap();

        // Assert
        assert_eq!(client.base_url, custom_url);
    }

    #[test]
    fn test_parse_listing_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/tmdb/tv_top_rated_page2.json");

        // Act
        let page: TvShowPage = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(page.page, 2);
        assert_eq!(page.results.len(), 3);
        assert_eq!(page.results[0].name, "Fullmetal Alchemist: Brotherhood");
        assert_eq!(page.total_pages, 108);
    }

    #[test]
    fn test_parse_trending_fixture_ignores_media_type() {
        // Arrange
        let json = include_str!("../../../../fixtures/tmdb/trending_tv_day.json");

        // Act
        let page: TvShowPage = serde_json::from_str(json).unwrap();

        // Assert
        assert!(!page.results.is_empty());
        assert_eq!(page.results[0].id, 94_997);
    }

    #[test]
    fn test_parse_tv_details_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/tmdb/tv_details_1399.json");

        // Act
        let details: TmdbTvDetails = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(details.id, 1399);
        assert_eq!(details.number_of_seasons, 8);
        assert_eq!(details.seasons.len(), 2);
        assert_eq!(details.genres[0].name, "Sci-Fi & Fantasy");
        assert_eq!(details.credits.cast[0].character, "Daenerys Targaryen");
        assert_eq!(details.videos.results[2].video_type, "Trailer");
        assert_eq!(details.images.backdrops.len(), 12);
        assert_eq!(details.recommendations.unwrap().results.len(), 12);
        assert_eq!(details.similar.unwrap().total_results, 3);
    }

    #[test]
    fn test_parse_error_response() {
        // Arrange
        let json = r#"{"status_code":7,"status_message":"Invalid API key: You must be granted a valid key.","success":false}"#;

        // Act
        let error: TmdbErrorResponse = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(error.status_code, 7);
        assert!(!error.success);
    }

    #[tokio::test]
    async fn test_discover_tv_sends_genre_filter() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/3/discover/tv"))
            .and(query_param("with_genres", "28,12"))
            .and(query_param("page", "1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(include_str!("../../../../fixtures/tmdb/discover_tv.json")),
            )
            .expect(1)
            .mount(&server)
            .await;
        let client = mock_client(&server);

        // Act
        let page = client
            .discover_tv(&DiscoverTvParams::new(1, "28,12"))
            .await
            .unwrap();

        // Assert
        assert_eq!(page.page, 1);
    }

    #[tokio::test]
    async fn test_discover_tv_without_genres_omits_filter() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/3/discover/tv"))
            .and(query_param_is_missing("with_genres"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(include_str!("../../../../fixtures/tmdb/discover_tv.json")),
            )
            .expect(1)
            .mount(&server)
            .await;
        let client = mock_client(&server);

        // Act & Assert (mock expect(1) verifies the filter is absent)
        client
            .discover_tv(&DiscoverTvParams::default())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_trending_tv_uses_window_segment() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/3/trending/tv/week"))
            .and(query_param("page", "4"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(include_str!("../../../../fixtures/tmdb/trending_tv_day.json")),
            )
            .expect(1)
            .mount(&server)
            .await;
        let client = mock_client(&server);

        // Act
        let page = client
            .trending_tv(TrendingWindow::Week, &ListParams::page(4))
            .await
            .unwrap();

        // Assert
        assert!(!page.results.is_empty());
    }

    #[tokio::test]
    async fn test_listing_endpoints_paths() {
        // Arrange
        let server = MockServer::start().await;
        let body = include_str!("../../../../fixtures/tmdb/tv_top_rated_page2.json");
        for p in ["/3/tv/popular", "/3/tv/on_the_air", "/3/tv/top_rated"] {
            Mock::given(method("GET"))
                .and(path(p))
                .respond_with(ResponseTemplate::new(200).set_body_string(body))
                .expect(1)
                .mount(&server)
                .await;
        }
        let client = mock_client(&server);
        let params = ListParams::page(2);

        // Act
        client.popular_tv(&params).await.unwrap();
        client.on_the_air_tv(&params).await.unwrap();
        let top = client.top_rated_tv(&params).await.unwrap();

        // Assert
        assert_eq!(top.page, 2);
    }

    #[tokio::test]
    async fn test_search_tv_via_http() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/3/search/tv"))
            .and(query_param("query", "andor"))
            .and(query_param("include_adult", "false"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(include_str!("../../../../fixtures/tmdb/search_tv_andor.json")),
            )
            .mount(&server)
            .await;
        let client = mock_client(&server);

        // Act
        let page = client
            .search_tv(&SearchTvParams::new("andor"))
            .await
            .unwrap();

        // Assert
        assert_eq!(page.results[0].name, "Andor");
    }

    #[tokio::test]
    async fn test_tv_season_via_http() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/3/tv/1399/season/1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(include_str!("../../../../fixtures/tmdb/tv_season_1399_1.json")),
            )
            .mount(&server)
            .await;
        let client = mock_client(&server);

        // Act
        let season = client.tv_season(1399, 1, "en-US").await.unwrap();

        // Assert
        assert_eq!(season.season_number, 1);
        assert_eq!(season.episodes.len(), 3);
    }

    #[tokio::test]
    async fn test_tv_details_appends_detail_sections() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/3/tv/1399"))
            .and(query_param("language", "ja-JP"))
            .and(query_param(
                "append_to_response",
                "credits,videos,images,recommendations,similar",
            ))
            .and(query_param("include_image_language", "ja,null"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(include_str!("../../../../fixtures/tmdb/tv_details_1399.json")),
            )
            .expect(1)
            .mount(&server)
            .await;
        let client = mock_client(&server);

        // Act
        let details = client.tv_details(1399, "ja-JP").await.unwrap();

        // Assert
        assert_eq!(details.name, "Game of Thrones");
        assert_eq!(details.credits.cast.len(), 22);
        assert_eq!(details.videos.results.len(), 4);
        assert!(details.images.backdrops.iter().all(|b| b.iso_639_1.is_none()));
        assert_eq!(details.recommendations.unwrap().results[0].id, 60_000);
    }

    #[tokio::test]
    async fn test_tv_genres_via_http() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/3/genre/tv/list"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(include_str!("../../../../fixtures/tmdb/genre_tv_list.json")),
            )
            .mount(&server)
            .await;
        let client = mock_client(&server);

        // Act
        let list = client.tv_genres("en-US").await.unwrap();

        // Assert
        assert!(list.genres.iter().any(|g| g.id == 16 && g.name == "Animation"));
    }

    #[tokio::test]
    async fn test_bearer_token_is_sent() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("Authorization", "Bearer test-token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(include_str!("../../../../fixtures/tmdb/search_tv_empty.json")),
            )
            .expect(1)
            .mount(&server)
            .await;
        let client = mock_client(&server);

        // Act & Assert (mock expect(1) verifies Authorization header)
        client
            .search_tv(&SearchTvParams::new("test"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_http_error_returns_tmdb_error() {
        // Arrange
        let server = MockServer::start().await;
        let error_body = r#"{"status_code":7,"status_message":"Invalid API key: You must be granted a valid key.","success":false}"#;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string(error_body))
            .mount(&server)
            .await;
        let client = mock_client(&server);

        // Act
        let result = client.popular_tv(&ListParams::default()).await;

        // Assert
        let err = result.unwrap_err().to_string();
        assert!(err.contains("TMDB API error"));
        assert!(err.contains("Invalid API key"));
    }

    #[tokio::test]
    async fn test_http_error_with_plain_body() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
            .mount(&server)
            .await;
        let client = mock_client(&server);

        // Act
        let result = client.top_rated_tv(&ListParams::default()).await;

        // Assert
        assert!(result.unwrap_err().to_string().contains("upstream down"));
    }

    #[tokio::test]
    async fn test_malformed_payload_is_an_error() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"page\": \"oops\"}"))
            .mount(&server)
            .await;
        let client = mock_client(&server);

        // Act
        let result = client.popular_tv(&ListParams::default()).await;

        // Assert
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("failed to decode JSON response")
        );
    }

    #[tokio::test]
    async fn test_http_429_retries() {
        // Arrange
        let server = MockServer::start().await;
        let error_body = r#"{"status_code":25,"status_message":"Your request count is over the allowed limit.","success":false}"#;

        // Return 429 for all requests: initial + MAX_RETRIES attempts
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429).set_body_string(error_body))
            .expect(u64::from(MAX_RETRIES) + 1)
            .mount(&server)
            .await;
        let client = mock_client(&server);

        // Act
        let result = client.search_tv(&SearchTvParams::new("test")).await;

        // Assert
        assert!(result.unwrap_err().to_string().contains("rate limit"));
    }
}
