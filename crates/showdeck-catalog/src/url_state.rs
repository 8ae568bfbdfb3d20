//! Navigable URL adapters.
//!
//! The discover listing keeps `page` and `type` in the URL query so a view can
//! be shared or restored by back/forward navigation. The search listing does
//! the same with `q` and `page`. Unknown parameters are preserved on write.

use anyhow::{Context, Result};
use url::Url;

use crate::genres::GenreFilter;
use crate::search::SearchState;
use crate::state::{DiscoverState, FIRST_PAGE};
use crate::view::ViewType;

/// Path of the discover listing.
pub const DISCOVER_PATH: &str = "/tv/discover";

/// Path of the search listing.
pub const SEARCH_PATH: &str = "/tv/search";

const PAGE_PARAM: &str = "page";
const TYPE_PARAM: &str = "type";
const QUERY_PARAM: &str = "q";

/// Base used to resolve path-only hrefs such as `/tv/discover?page=2`.
const RELATIVE_BASE: &str = "http://localhost/";

/// Parses an absolute URL or a path-only href.
///
/// # Errors
///
/// Returns an error if `href` is neither.
pub fn parse_href(href: &str) -> Result<Url> {
    match Url::parse(href) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(RELATIVE_BASE)
            .and_then(|base| base.join(href))
            .with_context(|| format!("invalid href: {href}")),
        Err(e) => Err(e).with_context(|| format!("invalid URL: {href}")),
    }
}

/// "See All" link for a home shelf: `/tv/discover?type=<view>`.
#[must_use]
pub fn see_all_href(view: ViewType) -> String {
    format!("{DISCOVER_PATH}?{TYPE_PARAM}={view}")
}

fn first_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
}

fn parse_page(raw: Option<&str>) -> u32 {
    raw.and_then(|p| p.trim().parse::<u32>().ok())
        .filter(|p| *p >= FIRST_PAGE)
        .unwrap_or(FIRST_PAGE)
}

/// Rewrites `url` so that `params` replace any existing values of the same
/// names; every other parameter keeps its position.
fn with_params(url: &Url, params: &[(&str, String)]) -> Url {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| !params.iter().any(|(name, _)| k == name))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let mut out = url.clone();
    {
        let mut query = out.query_pairs_mut();
        query.clear();
        for (k, v) in &kept {
            query.append_pair(k, v);
        }
        for (name, value) in params {
            query.append_pair(name, value);
        }
    }
    out
}

/// `page` and `type` as carried in the discover URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoverUrlState {
    /// Page number, at least 1.
    pub page: u32,
    /// Active view.
    pub view: ViewType,
}

impl Default for DiscoverUrlState {
    fn default() -> Self {
        Self {
            page: FIRST_PAGE,
            view: ViewType::default(),
        }
    }
}

impl DiscoverUrlState {
    /// Reads `page` and `type` from `url`.
    ///
    /// A missing, non-numeric or zero page reads as 1. A missing or unknown
    /// type reads as `discover`.
    #[must_use]
    pub fn from_url(url: &Url) -> Self {
        let page = parse_page(first_param(url, PAGE_PARAM).as_deref());
        let view = first_param(url, TYPE_PARAM)
            .and_then(|t| t.parse::<ViewType>().ok())
            .unwrap_or_default();
        Self { page, view }
    }

    /// Reads the state from an absolute URL or a path-only href.
    ///
    /// # Errors
    ///
    /// Returns an error if `href` cannot be parsed as a URL.
    pub fn from_href(href: &str) -> Result<Self> {
        Ok(Self::from_url(&parse_href(href)?))
    }

    /// Captures the URL-persisted half of a coordinator state.
    #[must_use]
    pub const fn from_state(state: &DiscoverState) -> Self {
        Self {
            page: state.page(),
            view: state.view(),
        }
    }

    /// Combines with a genre filter into a full coordinator state.
    #[must_use]
    pub fn into_state(self, genres: GenreFilter) -> DiscoverState {
        DiscoverState::new(self.view, self.page, genres)
    }

    /// Returns `url` with `page` and `type` written.
    #[must_use]
    pub fn apply(&self, url: &Url) -> Url {
        with_params(
            url,
            &[
                (PAGE_PARAM, self.page.to_string()),
                (TYPE_PARAM, self.view.as_str().to_owned()),
            ],
        )
    }

    /// Query string for this state, e.g. `page=2&type=topRated`.
    #[must_use]
    pub fn to_query(&self) -> String {
        format!("{PAGE_PARAM}={}&{TYPE_PARAM}={}", self.page, self.view)
    }

    /// Path-only href for this state.
    #[must_use]
    pub fn to_href(&self) -> String {
        format!("{DISCOVER_PATH}?{}", self.to_query())
    }
}

/// `q` and `page` as carried in the search URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchUrlState {
    /// Search text as written in the URL.
    pub query: String,
    /// Page number, at least 1.
    pub page: u32,
}

impl Default for SearchUrlState {
    fn default() -> Self {
        Self {
            query: String::new(),
            page: FIRST_PAGE,
        }
    }
}

impl SearchUrlState {
    /// Reads `q` and `page` from `url`. Missing `q` reads as empty.
    #[must_use]
    pub fn from_url(url: &Url) -> Self {
        Self {
            query: first_param(url, QUERY_PARAM).unwrap_or_default(),
            page: parse_page(first_param(url, PAGE_PARAM).as_deref()),
        }
    }

    /// Captures a search session.
    #[must_use]
    pub fn from_state(state: &SearchState) -> Self {
        Self {
            query: state.query().to_owned(),
            page: state.page(),
        }
    }

    /// Restores a search session.
    #[must_use]
    pub fn into_state(self) -> SearchState {
        let mut state = SearchState::new(&self.query);
        state.set_page(self.page);
        state
    }

    /// Returns `url` with `q` and `page` written.
    #[must_use]
    pub fn apply(&self, url: &Url) -> Url {
        with_params(
            url,
            &[
                (QUERY_PARAM, self.query.clone()),
                (PAGE_PARAM, self.page.to_string()),
            ],
        )
    }
}
