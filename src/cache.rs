//! In-memory observation cache keyed by spot id
//!
//! Backed by a moka cache with a cache-wide time-to-live. Expired entries
//! are never returned and are evicted by moka's housekeeping.

use moka::sync::Cache;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::weather::Observation;

/// Time-to-live applied when nothing else is configured.
pub const DEFAULT_TTL: Duration = Duration::from_secs(10 * 60);

/// Upper bound on stored observations; the catalog is far smaller.
const MAX_ENTRIES: u64 = 10_000;

pub struct WeatherCache {
    ttl: Duration,
    entries: Cache<String, Observation>,
}

impl std::fmt::Debug for WeatherCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherCache")
            .field("ttl", &self.ttl)
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}

impl Default for WeatherCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl WeatherCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        let entries = Cache::builder()
            .max_capacity(MAX_ENTRIES)
            .time_to_live(ttl)
            .build();
        Self { ttl, entries }
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the cached observation if it is younger than the TTL.
    #[instrument(name = "query_cache", level = "debug", skip(self))]
    pub fn get(&self, key: &str) -> Option<Observation> {
        let hit = self.entries.get(key);
        if hit.is_some() {
            debug!("Cache hit");
        } else {
            debug!("Cache miss");
        }
        hit
    }

    /// Stores an observation, replacing any previous entry for the key and
    /// restarting its TTL.
    #[instrument(name = "put_cache", level = "debug", skip(self, observation))]
    pub fn insert(&self, key: &str, observation: Observation) {
        self.entries.insert(key.to_string(), observation);
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.entries.invalidate_all();
        self.entries.run_pending_tasks();
    }

    /// Number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.run_pending_tasks();
        usize::try_from(self.entries.entry_count()).unwrap_or(usize::MAX)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
