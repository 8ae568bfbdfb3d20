//! Coordinator against a mocked TMDB server.
#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use showdeck_api::tmdb::{TmdbClient, TvShowPage};
use showdeck_catalog::{
    CatalogView, DiscoverQueryCoordinator, DiscoverUrlState, GenreFilter, LoadOutcome, ViewType,
};
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOP_RATED_PAGE_2: &str = include_str!("../../../fixtures/tmdb/tv_top_rated_page2.json");
const DISCOVER: &str = include_str!("../../../fixtures/tmdb/discover_tv.json");

fn client(server: &MockServer) -> Arc<TmdbClient> {
    let base_url = format!("{}/3/", server.uri());
    Arc::new(
        TmdbClient::builder()
            .base_url(base_url.parse().unwrap())
            .api_token("test-token")
            .user_agent("test/0.0.0")
            .min_interval(Duration::from_millis(0))
            .build()
            .unwrap(),
    )
}

#[tokio::test]
async fn test_top_rated_page_two_matches_upstream_payload() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/3/tv/top_rated"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TOP_RATED_PAGE_2))
        .expect(1)
        .mount(&server)
        .await;
    let state = DiscoverUrlState::from_href("/tv/discover?type=topRated&page=2")
        .unwrap()
        .into_state(GenreFilter::new());
    let coordinator = DiscoverQueryCoordinator::with_state(client(&server), state);

    // Act
    let outcome = coordinator.refresh().await;

    // Assert
    let expected: TvShowPage = serde_json::from_str(TOP_RATED_PAGE_2).unwrap();
    let LoadOutcome::Ready(view) = outcome else {
        panic!("expected a ready outcome");
    };
    assert_eq!(view, CatalogView::from_page(&expected));
    assert_eq!(view.items.len(), 3);
    assert_eq!(view.items.first().unwrap().id, 31911);
    assert_eq!(view.total_results, 2150);
    assert_eq!(view.total_pages, 108);
    assert!(!view.is_loading);
}

#[tokio::test]
async fn test_discover_sends_genre_filter_and_resets_page() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/3/discover/tv"))
        .and(query_param("with_genres", "28,12"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(DISCOVER))
        .expect(1)
        .mount(&server)
        .await;
    let coordinator = DiscoverQueryCoordinator::new(client(&server));
    coordinator.set_page(6);

    // Act
    coordinator.set_genres(["28", "12"].into_iter().collect());
    let outcome = coordinator.refresh().await;

    // Assert
    assert_eq!(coordinator.state().page(), 1);
    let LoadOutcome::Ready(view) = outcome else {
        panic!("expected a ready outcome");
    };
    assert_eq!(view.total_results, 812);
}

#[tokio::test]
async fn test_unfiltered_discover_omits_genre_param() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/3/discover/tv"))
        .and(query_param_is_missing("with_genres"))
        .respond_with(ResponseTemplate::new(200).set_body_string(DISCOVER))
        .expect(1)
        .mount(&server)
        .await;
    let coordinator = DiscoverQueryCoordinator::new(client(&server));

    // Act
    coordinator.refresh().await;
    coordinator.refresh().await;

    // Assert
    assert_eq!(coordinator.current_view().items.len(), 2);
}

#[tokio::test]
async fn test_upstream_error_settles_to_empty_view() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/3/tv/popular"))
        .respond_with(ResponseTemplate::new(500).set_body_string(
            r#"{"status_code":11,"status_message":"Internal error.","success":false}"#,
        ))
        .mount(&server)
        .await;
    let coordinator = DiscoverQueryCoordinator::new(client(&server));
    coordinator.set_view(ViewType::Popular);

    // Act
    let outcome = coordinator.refresh().await;

    // Assert
    let LoadOutcome::Failed(message) = outcome else {
        panic!("expected a failed outcome, got {outcome:?}");
    };
    assert!(message.contains("Internal error."));
    assert_eq!(coordinator.current_view(), CatalogView::empty());
}
