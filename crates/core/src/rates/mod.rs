//! Exchange rate snapshots, caching, and resolution.

pub mod cache;
pub mod provider;
pub mod resolver;
pub mod snapshot;

#[cfg(test)]
mod props;

pub use cache::SnapshotCache;
pub use provider::{ProviderError, RateProvider};
pub use resolver::RateResolver;
pub use snapshot::{ExchangeRate, RateSnapshot};
