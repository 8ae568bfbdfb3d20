//! Genre filter set.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Set of upstream genre identifiers restricting the discover view.
///
/// Deduplicated, with blank identifiers dropped. Iteration follows
/// insertion order so the joined filter string keeps the selection order.
/// An empty filter means "unfiltered".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct GenreFilter {
    ids: Vec<String>,
}

impl GenreFilter {
    /// Creates an empty filter.
    #[must_use]
    pub const fn new() -> Self {
        Self { ids: Vec::new() }
    }

    /// Adds a genre. Returns `false` if it was blank or already present.
    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        let id = id.trim();
        if id.is_empty() || self.contains(id) {
            return false;
        }
        self.ids.push(String::from(id));
        true
    }

    /// Removes a genre. Returns `false` if it was not present.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.ids.len();
        self.ids.retain(|g| g != id);
        self.ids.len() != before
    }

    /// Adds the genre if absent, removes it otherwise.
    /// Returns whether the genre is selected afterwards.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.remove(id) {
            false
        } else {
            self.insert(id)
        }
    }

    /// Returns `true` if the genre is selected.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|g| g == id)
    }

    /// Returns `true` if no genre is selected.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Number of selected genres.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.ids.len()
    }

    /// Iterates selected genres in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Comma-joined identifiers as sent upstream. Empty when unfiltered.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        self.ids.join(",")
    }
}

impl<S: Into<String>> FromIterator<S> for GenreFilter {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut filter = Self::new();
        for id in iter {
            filter.insert(id);
        }
        filter
    }
}

impl FromStr for GenreFilter {
    type Err = Infallible;

    /// Parses a comma-separated list, skipping blanks and duplicates.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.split(',').collect())
    }
}

impl fmt::Display for GenreFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}
