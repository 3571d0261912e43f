//! Time-boxed catalog cache with stale-on-error fallback.
//!
//! A value younger than the TTL is served without touching the network. Once it
//! ages out the next lookup refreshes it; if that refresh fails the previous
//! value is served as-is (however old), and with no previous value the lookup
//! yields an empty catalog. Lookups never fail.

use crate::catalog::fetcher::RemoteCatalogFetcher;
use crate::clock::Clock;
use crate::error::FetchError;
use crate::types::{CatalogEntry, EpochMs};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Default catalog TTL (5 minutes)
pub const DEFAULT_CATALOG_TTL: Duration = Duration::from_secs(5 * 60);

struct CacheEntry<T> {
    value: T,
    fetched_at_epoch_ms: EpochMs,
}

/// Where a lookup's value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheSource {
    /// Served from a value still inside the TTL window.
    Cached,
    /// Fetched by this lookup.
    Refreshed,
    /// Refresh failed; the previous value was served.
    Stale(FetchError),
    /// Refresh failed with nothing cached; an empty catalog was served.
    Unavailable(FetchError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CacheLookup {
    pub value: Vec<CatalogEntry>,
    pub source: CacheSource,
}

pub struct TtlResourceCache {
    name: String,
    fetcher: Arc<dyn RemoteCatalogFetcher>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    entry: RwLock<Option<CacheEntry<Vec<CatalogEntry>>>>,
    /// Held for the duration of a refresh so concurrent misses share one fetch.
    refresh: Mutex<()>,
}

impl TtlResourceCache {
    pub fn new(
        name: impl Into<String>,
        fetcher: Arc<dyn RemoteCatalogFetcher>,
        clock: Arc<dyn Clock>,
        ttl: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            fetcher,
            clock,
            ttl,
            entry: RwLock::new(None),
            refresh: Mutex::new(()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Current catalog, refreshing if missing or expired.
    pub async fn get(&self) -> Vec<CatalogEntry> {
        self.lookup().await.value
    }

    /// Like [`get`](Self::get), but reports how the value was obtained.
    pub async fn lookup(&self) -> CacheLookup {
        if let Some(value) = self.fresh_value() {
            return CacheLookup {
                value,
                source: CacheSource::Cached,
            };
        }

        let _refresh = self.refresh.lock().await;

        // Another caller may have completed a refresh while we waited.
        if let Some(value) = self.fresh_value() {
            return CacheLookup {
                value,
                source: CacheSource::Cached,
            };
        }

        match self.fetcher.fetch_catalog().await {
            Ok(value) => {
                let fetched_at_epoch_ms = self.clock.now_epoch_ms();
                *self.entry.write() = Some(CacheEntry {
                    value: value.clone(),
                    fetched_at_epoch_ms,
                });
                info!(cache = %self.name, entries = value.len(), "Catalog cache refreshed");
                CacheLookup {
                    value,
                    source: CacheSource::Refreshed,
                }
            }
            Err(err) => self.degrade(err),
        }
    }

    /// Drop the cached value so the next lookup refreshes.
    pub fn invalidate(&self) {
        *self.entry.write() = None;
        debug!(cache = %self.name, "Catalog cache invalidated");
    }

    fn degrade(&self, err: FetchError) -> CacheLookup {
        match self.entry.read().as_ref() {
            Some(stale) => {
                warn!(
                    cache = %self.name,
                    error = %err,
                    entries = stale.value.len(),
                    "Catalog refresh failed, serving stale value"
                );
                CacheLookup {
                    value: stale.value.clone(),
                    source: CacheSource::Stale(err),
                }
            }
            None => {
                warn!(
                    cache = %self.name,
                    error = %err,
                    "Catalog refresh failed with nothing cached, serving empty catalog"
                );
                CacheLookup {
                    value: Vec::new(),
                    source: CacheSource::Unavailable(err),
                }
            }
        }
    }

    fn fresh_value(&self) -> Option<Vec<CatalogEntry>> {
        let now = self.clock.now_epoch_ms();
        let ttl_ms = self.ttl.as_millis() as i64;
        let entry = self.entry.read();
        entry
            .as_ref()
            .filter(|e| now.saturating_sub(e.fetched_at_epoch_ms) < ttl_ms)
            .map(|e| e.value.clone())
    }
}
