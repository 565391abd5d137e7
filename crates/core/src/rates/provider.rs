//! Upstream rate provider seam.

use async_trait::async_trait;
use thiserror::Error;

use fxrates_shared::CurrencyCode;

use super::snapshot::RateSnapshot;

/// Errors from an upstream rate provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The request could not be sent or the connection failed.
    #[error("request failed: {0}")]
    Request(String),

    /// The request exceeded the configured timeout.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// The upstream answered with an unexpected HTTP status.
    #[error("unexpected upstream status: {0}")]
    Status(u16),

    /// The response body could not be decoded into a rate table.
    #[error("malformed upstream response: {0}")]
    Decode(String),

    /// The upstream returned an empty rate table for the base.
    #[error("empty rate table for base {0}")]
    EmptyTable(String),
}

/// Source of full rate tables, one table per base currency.
///
/// Implemented over HTTP in `fxrates-provider`; tests substitute in-memory
/// fakes so resolution logic runs without a network.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Fetches the full rate table for `base`.
    async fn fetch_table(&self, base: &CurrencyCode) -> Result<RateSnapshot, ProviderError>;
}
