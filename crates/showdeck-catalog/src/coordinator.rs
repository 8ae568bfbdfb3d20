//! Discover query coordinator.
//!
//! Owns the `(view, page, genres)` state, maps it to exactly one upstream
//! listing, and publishes the resulting [`CatalogView`] on a watch channel.
//! Results are fetched through a [`QueryCache`] keyed by [`CatalogKey`], so
//! identical tuples share one in-flight request. A result whose key no longer
//! matches the current state when it arrives is discarded.

use std::sync::Arc;

use showdeck_api::tmdb::{LocalTmdbApi, TvShow, TvShowPage};
use tokio::sync::watch;
use tracing::instrument;

use crate::cache::QueryCache;
use crate::genres::GenreFilter;
use crate::query::CatalogKey;
use crate::state::DiscoverState;
use crate::view::ViewType;

/// Response language used when none is configured.
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// What the rendering layer sees for the active tuple.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogView {
    /// Show records in upstream order.
    pub items: Vec<TvShow>,
    /// Total matching records upstream.
    pub total_results: u32,
    /// Total pages upstream.
    pub total_pages: u32,
    /// `true` while the active tuple's fetch is pending.
    pub is_loading: bool,
}

impl CatalogView {
    /// Pending state: no items yet.
    #[must_use]
    pub fn loading() -> Self {
        Self {
            is_loading: true,
            ..Self::default()
        }
    }

    /// Settled state with no items. Used for failures.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Settled state built from an upstream page.
    #[must_use]
    pub fn from_page(page: &TvShowPage) -> Self {
        Self {
            items: page.results.clone(),
            total_results: page.total_results,
            total_pages: page.total_pages,
            is_loading: false,
        }
    }

    /// `true` only once settled with zero results. A pending view is never
    /// empty, even though it reports zero results.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !self.is_loading && self.total_results == 0
    }

    /// Page count for pagination controls, at least 1.
    #[must_use]
    pub fn page_count(&self) -> u32 {
        self.total_pages.max(1)
    }
}

/// Result of one [`DiscoverQueryCoordinator::refresh`].
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// The fetched tuple is still current; its view was published.
    Ready(CatalogView),
    /// The state changed while the fetch was pending; the result was dropped.
    Superseded,
    /// The fetch failed and an empty view was published. Carries the error
    /// chain for display.
    Failed(String),
}

/// Query-selection and pagination coordinator for the TV catalog.
pub struct DiscoverQueryCoordinator<A> {
    api: Arc<A>,
    language: String,
    cache: QueryCache<CatalogKey, TvShowPage>,
    state: watch::Sender<DiscoverState>,
    view: watch::Sender<CatalogView>,
}

impl<A> std::fmt::Debug for DiscoverQueryCoordinator<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscoverQueryCoordinator")
            .field("language", &self.language)
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

impl<A: LocalTmdbApi> DiscoverQueryCoordinator<A> {
    /// Creates a coordinator in the default state (discover, page 1, no genres).
    #[must_use]
    pub fn new(api: Arc<A>) -> Self {
        Self::with_state(api, DiscoverState::default())
    }

    /// Creates a coordinator starting from `state`, e.g. one read from a URL.
    #[must_use]
    pub fn with_state(api: Arc<A>, state: DiscoverState) -> Self {
        Self {
            api,
            language: String::from(DEFAULT_LANGUAGE),
            cache: QueryCache::new(),
            state: watch::Sender::new(state),
            view: watch::Sender::new(CatalogView::loading()),
        }
    }

    /// Sets the response language. Not part of the cache key.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> DiscoverState {
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

    /// Receiver notified whenever the state changes.
    #[must_use]
    pub fn subscribe_state(&self) -> watch::Receiver<DiscoverState> {
        self.state.subscribe()
    }

    /// Switches view; resets to page 1.
    pub fn set_view(&self, view: ViewType) {
        self.state.send_modify(|s| s.set_view(view));
    }

    /// Replaces the genre filter; resets to page 1.
    pub fn set_genres(&self, genres: GenreFilter) {
        self.state.send_modify(|s| s.set_genres(genres));
    }

    /// Toggles one genre; resets to page 1.
    pub fn toggle_genre(&self, id: &str) {
        self.state.send_modify(|s| s.toggle_genre(id));
    }

    /// Moves to `page`, keeping view and genres.
    pub fn set_page(&self, page: u32) {
        self.state.send_modify(|s| s.set_page(page));
    }

    /// Fetches the current tuple and publishes its view.
    ///
    /// Publishes a loading view first. Upstream failures publish an empty,
    /// settled view, are logged, and come back as [`LoadOutcome::Failed`]
    /// rather than as errors.
    #[allow(clippy::future_not_send)]
    #[instrument(skip_all)]
    pub async fn refresh(&self) -> LoadOutcome {
        let state = self.state();
        let key = state.key();
        let query = state.query();

        if self.cache.peek(&key).await.is_none() {
            self.view.send_replace(CatalogView::loading());
        }

        let result = self
            .cache
            .get_or_fetch(&key, || {
                tracing::debug!(key = %key, path = %query.path(), "fetching catalog page");
                query.execute(self.api.as_ref(), key.page, &self.language)
            })
            .await;

        if self.state.borrow().key() != key {
            tracing::debug!(key = %key, "discarding superseded catalog result");
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
                tracing::warn!(key = %key, error = %message, "catalog query failed");
                self.view.send_replace(CatalogView::empty());
                LoadOutcome::Failed(message)
            }
        }
    }
}
