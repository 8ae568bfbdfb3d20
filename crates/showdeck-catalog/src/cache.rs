//! Keyed, deduplicating query cache.
//!
//! Each key owns a once-cell. The first caller for a key runs the fetch;
//! concurrent callers for the same key wait on that fetch instead of issuing
//! their own. Successful results stay cached until invalidated. A failed
//! fetch drops its cell, so the next caller fetches again and failed keys do
//! not pile up in the map.

use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::{Mutex, OnceCell};

/// Query result cache keyed by `K`.
#[derive(Debug)]
pub struct QueryCache<K, V> {
    entries: Mutex<HashMap<K, Arc<OnceCell<Arc<V>>>>>,
}

impl<K, V> Default for QueryCache<K, V> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<K, V> QueryCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
{
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value for `key`, running `fetch` only when no value
    /// is cached and no fetch for `key` is already in flight.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `fetch`. The failure is not cached.
    #[allow(clippy::future_not_send)]
    pub async fn get_or_fetch<F, Fut>(&self, key: &K, fetch: F) -> Result<Arc<V>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        let cell = {
            let mut entries = self.entries.lock().await;
            Arc::clone(entries.entry(key.clone()).or_default())
        };

        if let Some(value) = cell.get() {
            tracing::debug!(?key, "query cache hit");
            return Ok(Arc::clone(value));
        }

        let result = cell
            .get_or_try_init(|| async {
                tracing::debug!(?key, "query cache miss, fetching");
                fetch().await.map(Arc::new)
            })
            .await
            .map(Arc::clone);

        if result.is_err() {
            self.discard_empty(key, &cell).await;
        }
        result
    }

    /// Removes `cell` from the map if it is still the entry for `key` and
    /// holds no value. A concurrent caller may have filled it after our
    /// failure, in which case it stays.
    async fn discard_empty(&self, key: &K, cell: &Arc<OnceCell<Arc<V>>>) {
        let mut entries = self.entries.lock().await;
        if entries
            .get(key)
            .is_some_and(|current| Arc::ptr_eq(current, cell) && !current.initialized())
        {
            entries.remove(key);
        }
    }

    /// Returns the cached value for `key` without fetching.
    pub async fn peek(&self, key: &K) -> Option<Arc<V>> {
        let entries = self.entries.lock().await;
        entries.get(key).and_then(|cell| cell.get().cloned())
    }

    /// Drops the entry for `key`. Returns `true` if a value was cached.
    pub async fn invalidate(&self, key: &K) -> bool {
        let mut entries = self.entries.lock().await;
        entries
            .remove(key)
            .is_some_and(|cell| cell.initialized())
    }

    /// Drops every entry.
    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }

    /// Number of keys holding a value.
    pub async fn len(&self) -> usize {
        let entries = self.entries.lock().await;
        entries.values().filter(|cell| cell.initialized()).count()
    }

    /// Returns `true` if no key holds a value.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
