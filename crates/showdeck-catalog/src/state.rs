//! Pagination and filter state for the discover coordinator.

use crate::genres::GenreFilter;
use crate::query::{CatalogKey, ListingQuery};
use crate::view::ViewType;

/// First page of every listing.
pub const FIRST_PAGE: u32 = 1;

/// `(view, page, genres)` tuple driving the active catalog query.
///
/// Changing the view or the genre filter resets the page to [`FIRST_PAGE`].
/// Changing the page leaves the view and the genres untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoverState {
    view: ViewType,
    page: u32,
    genres: GenreFilter,
}

impl Default for DiscoverState {
    fn default() -> Self {
        Self {
            view: ViewType::default(),
            page: FIRST_PAGE,
            genres: GenreFilter::new(),
        }
    }
}

impl DiscoverState {
    /// Builds a state from explicit parts. A page of 0 is lifted to 1.
    #[must_use]
    pub fn new(view: ViewType, page: u32, genres: GenreFilter) -> Self {
        Self {
            view,
            page: page.max(FIRST_PAGE),
            genres,
        }
    }

    /// Active view.
    #[must_use]
    pub const fn view(&self) -> ViewType {
        self.view
    }

    /// Active page.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Active genre filter.
    #[must_use]
    pub const fn genres(&self) -> &GenreFilter {
        &self.genres
    }

    /// Switches view and resets to the first page.
    pub fn set_view(&mut self, view: ViewType) {
        self.view = view;
        self.page = FIRST_PAGE;
    }

    /// Replaces the genre filter and resets to the first page.
    pub fn set_genres(&mut self, genres: GenreFilter) {
        self.genres = genres;
        self.page = FIRST_PAGE;
    }

    /// Toggles one genre and resets to the first page.
    pub fn toggle_genre(&mut self, id: &str) {
        self.genres.toggle(id);
        self.page = FIRST_PAGE;
    }

    /// Moves to `page`. A page of 0 is lifted to 1.
    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(FIRST_PAGE);
    }

    /// Upstream query for the current view.
    #[must_use]
    pub fn query(&self) -> ListingQuery {
        ListingQuery::for_view(self.view, &self.genres)
    }

    /// Cache key for the current tuple.
    #[must_use]
    pub fn key(&self) -> CatalogKey {
        CatalogKey::new(self.view, self.page, &self.genres)
    }
}
