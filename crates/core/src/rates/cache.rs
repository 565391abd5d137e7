//! Process-wide snapshot cache using Moka.
//!
//! One entry per base currency. Entries are replaced on refresh and never
//! expired by the cache itself: a snapshot past its freshness window must
//! stay available so the resolver can serve it stale when the upstream
//! source is down.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use moka::sync::Cache;

use fxrates_shared::CurrencyCode;
use fxrates_shared::config::CacheConfig;

use super::snapshot::RateSnapshot;

/// A cached snapshot plus the end of its freshness window.
#[derive(Debug, Clone)]
struct CacheEntry {
    snapshot: Arc<RateSnapshot>,
    expires_at: DateTime<Utc>,
}

impl CacheEntry {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Cache of rate snapshots keyed by base currency.
///
/// Thread-safe and cheap to clone; clones share the underlying store.
#[derive(Clone)]
pub struct SnapshotCache {
    cache: Cache<CurrencyCode, CacheEntry>,
    ttl: TimeDelta,
}

impl SnapshotCache {
    /// Creates a snapshot cache from configuration.
    #[must_use]
    pub fn new(config: &CacheConfig) -> Self {
        // No time_to_live here: expiry is checked explicitly so stale
        // entries survive for the serve-stale fallback.
        let cache = Cache::builder().max_capacity(config.max_bases).build();

        let secs = i64::try_from(config.ttl_secs).unwrap_or(i64::MAX);
        Self {
            cache,
            ttl: TimeDelta::try_seconds(secs).unwrap_or(TimeDelta::MAX),
        }
    }

    /// Returns the snapshot for `base` if one exists and is still fresh.
    #[must_use]
    pub fn fresh(&self, base: &CurrencyCode) -> Option<Arc<RateSnapshot>> {
        self.cache
            .get(base)
            .filter(|entry| entry.is_fresh(Utc::now()))
            .map(|entry| entry.snapshot)
    }

    /// Returns the snapshot for `base` regardless of freshness.
    #[must_use]
    pub fn any(&self, base: &CurrencyCode) -> Option<Arc<RateSnapshot>> {
        self.cache.get(base).map(|entry| entry.snapshot)
    }

    /// Stores a freshly fetched snapshot, replacing any previous entry.
    pub fn store(&self, base: &CurrencyCode, snapshot: Arc<RateSnapshot>) {
        let entry = CacheEntry {
            snapshot,
            expires_at: Utc::now()
                .checked_add_signed(self.ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        };
        self.cache.insert(base.clone(), entry);
    }

    /// Returns the number of base currencies currently cached.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;

    fn code(s: &str) -> CurrencyCode {
        CurrencyCode::new(s).unwrap()
    }

    fn snapshot(base: &str) -> Arc<RateSnapshot> {
        let rates = BTreeMap::from([(code("EUR"), dec!(0.92))]);
        Arc::new(RateSnapshot::from_rates(code(base), Utc::now(), rates))
    }

    fn config(ttl_secs: u64) -> CacheConfig {
        CacheConfig {
            ttl_secs,
            max_bases: 8,
        }
    }

    #[test]
    fn test_miss_on_empty_cache() {
        let cache = SnapshotCache::new(&config(3600));
        assert!(cache.fresh(&code("USD")).is_none());
        assert!(cache.any(&code("USD")).is_none());
    }

    #[test]
    fn test_store_then_fresh_hit() {
        let cache = SnapshotCache::new(&config(3600));
        let snap = snapshot("USD");
        cache.store(&code("USD"), Arc::clone(&snap));

        let hit = cache.fresh(&code("USD")).unwrap();
        assert_eq!(hit.as_of(), snap.as_of());
        assert_eq!(cache.entry_count(), 1);
    }

    #[test]
    fn test_expired_entry_is_stale_but_retained() {
        let cache = SnapshotCache::new(&config(0));
        let snap = snapshot("USD");
        cache.store(&code("USD"), Arc::clone(&snap));

        assert!(cache.fresh(&code("USD")).is_none());
        // Still reachable for the serve-stale fallback.
        let stale = cache.any(&code("USD")).unwrap();
        assert_eq!(stale.as_of(), snap.as_of());
    }

    #[test]
    fn test_store_replaces_previous_entry() {
        let cache = SnapshotCache::new(&config(3600));
        let first = snapshot("USD");
        let second = snapshot("USD");
        cache.store(&code("USD"), first);
        cache.store(&code("USD"), Arc::clone(&second));

        let hit = cache.fresh(&code("USD")).unwrap();
        assert_eq!(hit.as_of(), second.as_of());
        assert_eq!(cache.entry_count(), 1);
    }

    #[test]
    fn test_bases_are_independent() {
        let cache = SnapshotCache::new(&config(3600));
        cache.store(&code("USD"), snapshot("USD"));

        assert!(cache.fresh(&code("EUR")).is_none());
        assert!(cache.fresh(&code("USD")).is_some());
    }
}
