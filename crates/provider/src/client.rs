//! Reqwest-backed rate table client.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use fxrates_core::rates::{ProviderError, RateProvider, RateSnapshot};
use fxrates_shared::CurrencyCode;
use fxrates_shared::config::UpstreamConfig;

/// Rate table payload as served by exchangerate.host-style APIs.
///
/// Unknown fields (motd, success flags, provider metadata) are ignored.
#[derive(Debug, Deserialize)]
struct WireTable {
    rates: BTreeMap<String, Decimal>,
}

/// HTTP implementation of `RateProvider`.
pub struct HttpRateProvider {
    client: reqwest::Client,
    base_url: String,
    timeout_secs: u64,
}

impl HttpRateProvider {
    /// Builds a provider client with a bounded request timeout.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Request` if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(config: &UpstreamConfig) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| ProviderError::Request(err.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout_secs: config.timeout_secs,
        })
    }

    /// Converts a wire table into a snapshot stamped with the fetch time.
    ///
    /// Quote codes that fail ISO 4217 validation are dropped: upstream
    /// tables carry metals and funds codes we never serve.
    fn into_snapshot(base: &CurrencyCode, wire: WireTable) -> RateSnapshot {
        let mut rates = BTreeMap::new();
        for (quote, rate) in wire.rates {
            match CurrencyCode::new(&quote) {
                Ok(code) => {
                    rates.insert(code, rate);
                }
                Err(_) => {
                    debug!(quote = %quote, "skipping non-ISO quote from upstream table");
                }
            }
        }

        RateSnapshot::from_rates(base.clone(), Utc::now(), rates)
    }
}

#[async_trait]
impl RateProvider for HttpRateProvider {
    async fn fetch_table(&self, base: &CurrencyCode) -> Result<RateSnapshot, ProviderError> {
        let url = format!("{}/latest", self.base_url);
        debug!(base = %base, url = %url, "fetching rate table");

        let response = self
            .client
            .get(&url)
            .query(&[("base", base.as_str())])
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    ProviderError::Timeout(self.timeout_secs)
                } else {
                    ProviderError::Request(err.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        let wire: WireTable = response
            .json()
            .await
            .map_err(|err| ProviderError::Decode(err.to_string()))?;

        Ok(Self::into_snapshot(base, wire))
    }
}
