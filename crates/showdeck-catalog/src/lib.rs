//! Catalog layer for showdeck.
//!
//! Maps a requested TV catalog view, page and genre filter onto exactly one
//! TMDB listing query, executes it through a keyed query cache, and exposes
//! the resulting page to a renderer. Also carries the navigable URL state
//! adapter, the TV search session, the episode picker and display helpers.

/// Keyed, deduplicating query cache.
pub mod cache;
/// Discover query coordinator and its render-facing view.
pub mod coordinator;
/// Display helpers for show records.
pub mod display;
/// Season/episode selection.
pub mod episodes;
/// Genre filter set.
pub mod genres;
/// Upstream query descriptors and cache keys.
pub mod query;
/// TV search session.
pub mod search;
/// Discover pagination/filter state machine.
pub mod state;
/// Navigable URL state adapter.
pub mod url_state;
/// Catalog view enumeration.
pub mod view;

#[cfg(test)]
mod test_support;

pub use cache::QueryCache;
pub use coordinator::{CatalogView, DiscoverQueryCoordinator, LoadOutcome};
pub use episodes::EpisodePicker;
pub use genres::GenreFilter;
pub use query::{CatalogKey, ListingQuery};
pub use search::{SearchKey, SearchState, TvSearchCoordinator};
pub use state::DiscoverState;
pub use url_state::{DiscoverUrlState, SearchUrlState};
pub use view::ViewType;
