//! Catalog view enumeration.

use std::fmt;
use std::str::FromStr;

/// One of the six TV catalog listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewType {
    /// Genre-filterable discovery listing.
    #[default]
    Discover,
    /// Trending over the last day.
    TodayTrending,
    /// Trending over the last week.
    ThisWeekTrending,
    /// Popular shows.
    Popular,
    /// Shows currently on the air.
    OnTheAir,
    /// Top rated shows.
    TopRated,
}

impl ViewType {
    /// All views in display order.
    pub const ALL: [Self; 6] = [
        Self::Discover,
        Self::TodayTrending,
        Self::ThisWeekTrending,
        Self::Popular,
        Self::OnTheAir,
        Self::TopRated,
    ];

    /// Name used in navigable URLs (`?type=`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Discover => "discover",
            Self::TodayTrending => "todayTrending",
            Self::ThisWeekTrending => "thisWeekTrending",
            Self::Popular => "popular",
            Self::OnTheAir => "onTheAir",
            Self::TopRated => "topRated",
        }
    }

    /// Kebab-cased name, used in cache keys and on the command line.
    #[must_use]
    pub const fn kebab(self) -> &'static str {
        match self {
            Self::Discover => "discover",
            Self::TodayTrending => "today-trending",
            Self::ThisWeekTrending => "this-week-trending",
            Self::Popular => "popular",
            Self::OnTheAir => "on-the-air",
            Self::TopRated => "top-rated",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Discover => "Discover",
            Self::TodayTrending => "Today's Trending",
            Self::ThisWeekTrending => "This Week's Trending",
            Self::Popular => "Popular",
            Self::OnTheAir => "On The Air",
            Self::TopRated => "Top Rated",
        }
    }

    /// Whether the genre filter applies to this view.
    #[must_use]
    pub const fn accepts_genres(self) -> bool {
        matches!(self, Self::Discover)
    }

    /// Next view in display order, wrapping around.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Discover => Self::TodayTrending,
            Self::TodayTrending => Self::ThisWeekTrending,
            Self::ThisWeekTrending => Self::Popular,
            Self::Popular => Self::OnTheAir,
            Self::OnTheAir => Self::TopRated,
            Self::TopRated => Self::Discover,
        }
    }

    /// Previous view in display order, wrapping around.
    #[must_use]
    pub const fn prev(self) -> Self {
        match self {
            Self::Discover => Self::TopRated,
            Self::TodayTrending => Self::Discover,
            Self::ThisWeekTrending => Self::TodayTrending,
            Self::Popular => Self::ThisWeekTrending,
            Self::OnTheAir => Self::Popular,
            Self::TopRated => Self::OnTheAir,
        }
    }
}

impl fmt::Display for ViewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no known view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseViewTypeError(String);

impl fmt::Display for ParseViewTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown view type '{}' (expected one of: discover, todayTrending, \
             thisWeekTrending, popular, onTheAir, topRated)",
            self.0
        )
    }
}

impl std::error::Error for ParseViewTypeError {}

impl FromStr for ViewType {
    type Err = ParseViewTypeError;

    /// Accepts both the URL name (`topRated`) and the kebab name (`top-rated`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s || v.kebab() == s)
            .ok_or_else(|| ParseViewTypeError(String::from(s)))
    }
}
