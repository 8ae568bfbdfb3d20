//! TMDB API rate limiter.

use std::time::{Duration, Instant};

/// Default minimum interval between requests (~40 req/s).
const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(25);

/// Single-tier rate limiter for TMDB API.
///
/// TMDB enforces roughly 40 requests per second. The limiter keeps the
/// earliest instant at which the next request may start.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbRateLimiter {
    /// Minimum interval between request starts.
    min_interval: Duration,
    /// Earliest start of the next request, `None` before the first one.
    next_allowed: Option<Instant>,
}

impl TmdbRateLimiter {
    /// Creates a new rate limiter with the given minimum interval.
    pub(crate) const fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            next_allowed: None,
        }
    }

    /// Creates a new rate limiter with the default interval (25ms).
    pub(crate) const fn default_interval() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }

    /// Waits until the next request is allowed, then reserves the slot.
    pub async fn wait(&mut self) {
        if let Some(next) = self.next_allowed {
            let remaining = next.saturating_duration_since(Instant::now());
            if !remaining.is_zero() {
                tokio::time::sleep(remaining).await;
            }
        }

        let now = Instant::now();
        self.next_allowed = Some(now.checked_add(self.min_interval).unwrap_or(now));
    }
}
