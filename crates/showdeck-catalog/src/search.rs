//! TV search session.

use std::fmt;
use std::sync::Arc;

use showdeck_api::tmdb::{LocalTmdbApi, SearchTvParams, TvShowPage};
use tokio::sync::watch;
use tracing::instrument;

use crate::cache::QueryCache;
use crate::coordinator::{CatalogView, DEFAULT_LANGUAGE, LoadOutcome};
use crate::state::FIRST_PAGE;

const SEARCH_KEY_NAME: &str = "search-tv-show";

/// Search text and page.
///
/// The text is stored trimmed. Changing it resets the page to 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState {
    query: String,
    page: u32,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            query: String::new(),
            page: FIRST_PAGE,
        }
    }
}

impl SearchState {
    /// Starts a session for `query` on page 1.
    #[must_use]
    pub fn new(query: &str) -> Self {
        Self {
            query: query.trim().to_owned(),
            page: FIRST_PAGE,
        }
    }

    /// Trimmed search text.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Active page.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Replaces the search text. The page resets only if the trimmed text
    /// actually changed.
    pub fn set_query(&mut self, query: &str) {
        let query = query.trim();
        if query != self.query {
            query.clone_into(&mut self.query);
            self.page = FIRST_PAGE;
        }
    }

    /// Moves to `page`. A page of 0 is lifted to 1.
    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(FIRST_PAGE);
    }

    /// A search is issued only for non-empty text.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !self.query.is_empty()
    }

    /// Cache key: `("search-tv-show", page, query)`.
    #[must_use]
    pub fn key(&self) -> SearchKey {
        SearchKey {
            page: self.page,
            query: self.query.clone(),
        }
    }
}

/// Cache key for a search page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchKey {
    /// Page number.
    pub page: u32,
    /// Trimmed search text.
    pub query: String,
}

impl fmt::Display for SearchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{SEARCH_KEY_NAME}, {}, {:?}]", self.page, self.query)
    }
}

/// Runs TV searches for a [`SearchState`] and publishes the results.
pub struct TvSearchCoordinator<A> {
    api: Arc<A>,
    language: String,
    cache: QueryCache<SearchKey, TvShowPage>,
    state: watch::Sender<SearchState>,
    view: watch::Sender<CatalogView>,
}

impl<A> fmt::Debug for TvSearchCoordinator<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TvSearchCoordinator")
            .field("language", &self.language)
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

impl<A: LocalTmdbApi> TvSearchCoordinator<A> {
    /// Creates a coordinator with empty search text.
    #[must_use]
    pub fn new(api: Arc<A>) -> Self {
        Self::with_state(api, SearchState::default())
    }

    /// Creates a coordinator starting from `state`.
    #[must_use]
    pub fn with_state(api: Arc<A>, state: SearchState) -> Self {
        Self {
            api,
            language: String::from(DEFAULT_LANGUAGE),
            cache: QueryCache::new(),
            state: watch::Sender::new(state),
            view: watch::Sender::new(CatalogView::empty()),
        }
    }

    /// Sets the response language.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    /// Snapshot of the last published view.
    #[must_use]
    pub fn current_view(&self) -> CatalogView {
        self.view.borrow().clone()
    }

    /// Receiver notified whenever a view is published.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CatalogView> {
        self.view.subscribe()
    }

    /// Replaces the search text.
    pub fn set_query(&self, query: &str) {
        self.state.send_if_modified(|s| {
            let before = s.clone();
            s.set_query(query);
            *s != before
        });
    }

    /// Moves to `page`.
    pub fn set_page(&self, page: u32) {
        self.state.send_modify(|s| s.set_page(page));
    }

    /// Runs the search for the current state.
    ///
    /// With empty text nothing is fetched and an empty view is published.
    #[allow(clippy::future_not_send)]
    #[instrument(skip_all)]
    pub async fn refresh(&self) -> LoadOutcome {
        let state = self.state();
        if !state.is_enabled() {
            let view = CatalogView::empty();
            self.view.send_replace(view.clone());
            return LoadOutcome::Ready(view);
        }

        let key = state.key();
        if self.cache.peek(&key).await.is_none() {
            self.view.send_replace(CatalogView::loading());
        }

        let result = self
            .cache
            .get_or_fetch(&key, || async {
                tracing::debug!(key = %key, "searching TV shows");
                let params = SearchTvParams::new(key.query.as_str())
                    .page(key.page)
                    .language(self.language.as_str());
                self.api.search_tv(&params).await
            })
            .await;

        if self.state.borrow().key() != key {
            tracing::debug!(key = %key, "discarding superseded search result");
            return LoadOutcome::Superseded;
        }

        match result {
            Ok(page) => {
                let view = CatalogView::from_page(&page);
                self.view.send_replace(view.clone());
                LoadOutcome::Ready(view)
            }
            Err(e) => {
                let message = format!("{e:#}");
                tracing::warn!(key = %key, error = %message, "TV search failed");
                self.view.send_replace(CatalogView::empty());
                LoadOutcome::Failed(message)
            }
        }
    }
}
