//! Rate resolution: cache check, coalesced upstream fetch, serve-stale.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use fxrates_shared::{CurrencyCode, RateError, RateResult};

use super::cache::SnapshotCache;
use super::provider::{ProviderError, RateProvider};
use super::snapshot::RateSnapshot;

/// Resolves exchange rate snapshots for a base currency.
///
/// Owns the injected process-wide snapshot cache. A resolve call touches
/// the upstream provider only on a cache miss or after the freshness
/// window, and concurrent misses for the same base collapse into a single
/// fetch.
pub struct RateResolver {
    provider: Arc<dyn RateProvider>,
    cache: SnapshotCache,
    // Per-base fetch locks; concurrent misses serialize here.
    fetch_locks: DashMap<CurrencyCode, Arc<Mutex<()>>>,
}

impl RateResolver {
    /// Creates a resolver around a provider and a cache.
    #[must_use]
    pub fn new(provider: Arc<dyn RateProvider>, cache: SnapshotCache) -> Self {
        Self {
            provider,
            cache,
            fetch_locks: DashMap::new(),
        }
    }

    /// Read access to the snapshot cache.
    #[must_use]
    pub fn cache(&self) -> &SnapshotCache {
        &self.cache
    }

    /// Resolves current rates for `base`, narrowed to `quotes`.
    ///
    /// An empty `quotes` slice returns the full snapshot.
    ///
    /// # Errors
    ///
    /// - `RateError::QuoteNotFound` when a requested quote is absent
    /// - `RateError::UpstreamUnavailable` when the fetch fails and no
    ///   cached snapshot exists for `base`
    pub async fn resolve(
        &self,
        base: &CurrencyCode,
        quotes: &[CurrencyCode],
    ) -> RateResult<Arc<RateSnapshot>> {
        if let Some(snapshot) = self.cache.fresh(base) {
            debug!(base = %base, "cache hit");
            return Self::narrowed(&snapshot, quotes);
        }

        let lock = self.fetch_lock(base);
        let _guard = lock.lock().await;

        // Double-check: a concurrent miss may have refreshed the entry
        // while we waited for the lock.
        if let Some(snapshot) = self.cache.fresh(base) {
            debug!(base = %base, "cache refreshed while waiting");
            return Self::narrowed(&snapshot, quotes);
        }

        match self.refresh(base).await {
            Ok(snapshot) => {
                info!(base = %base, quotes = snapshot.rates().len(), "snapshot refreshed");
                Self::narrowed(&snapshot, quotes)
            }
            Err(err) => match self.cache.any(base) {
                Some(stale) => {
                    warn!(
                        base = %base,
                        error = %err,
                        as_of = %stale.as_of(),
                        "upstream fetch failed, serving stale snapshot"
                    );
                    Self::narrowed(&stale, quotes)
                }
                None => Err(RateError::UpstreamUnavailable(err.to_string())),
            },
        }
    }

    /// Fetches a fresh table and stores it in the cache.
    ///
    /// The fetch runs in a spawned task: if the caller aborts mid-request,
    /// the table still lands in the cache, it just is not delivered to the
    /// cancelled caller. The fetch is retried at most once.
    async fn refresh(&self, base: &CurrencyCode) -> Result<Arc<RateSnapshot>, ProviderError> {
        let provider = Arc::clone(&self.provider);
        let cache = self.cache.clone();
        let base = base.clone();

        let handle = tokio::spawn(async move {
            let snapshot = match provider.fetch_table(&base).await {
                Ok(snapshot) => snapshot,
                Err(err) => {
                    warn!(base = %base, error = %err, "upstream fetch failed, retrying once");
                    provider.fetch_table(&base).await?
                }
            };

            if snapshot.is_empty() {
                return Err(ProviderError::EmptyTable(base.to_string()));
            }

            let snapshot = Arc::new(snapshot);
            cache.store(&base, Arc::clone(&snapshot));
            Ok(snapshot)
        });

        handle
            .await
            .map_err(|err| ProviderError::Request(format!("fetch task failed: {err}")))?
    }

    fn narrowed(
        snapshot: &Arc<RateSnapshot>,
        quotes: &[CurrencyCode],
    ) -> RateResult<Arc<RateSnapshot>> {
        if quotes.is_empty() {
            return Ok(Arc::clone(snapshot));
        }
        snapshot.subset(quotes).map(Arc::new)
    }

    fn fetch_lock(&self, base: &CurrencyCode) -> Arc<Mutex<()>> {
        self.fetch_locks
            .entry(base.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
