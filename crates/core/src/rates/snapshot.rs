//! Exchange rate and snapshot types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use fxrates_shared::{CurrencyCode, RateError, RateResult};

use crate::conversion::{AMOUNT_DECIMAL_PLACES, convert_amount};

/// Exchange rate between two currencies.
///
/// Invariants: `rate > 0` and `base != quote`. Both are enforced at
/// snapshot construction; a rate never exists outside a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExchangeRate {
    /// Base currency code.
    pub base: CurrencyCode,
    /// Quote currency code.
    pub quote: CurrencyCode,
    /// Exchange rate (1 base = rate quote).
    pub rate: Decimal,
    /// Timestamp this rate is valid as of.
    pub as_of: DateTime<Utc>,
}

impl ExchangeRate {
    /// Converts an amount of the base currency into the quote currency,
    /// rounded with banker's rounding.
    #[must_use]
    pub fn convert(&self, amount: Decimal) -> Decimal {
        convert_amount(amount, self.rate, AMOUNT_DECIMAL_PLACES)
    }

    /// Returns the inverse rate.
    #[must_use]
    pub fn inverse(&self) -> Self {
        Self {
            base: self.quote.clone(),
            quote: self.base.clone(),
            rate: Decimal::ONE / self.rate,
            as_of: self.as_of,
        }
    }
}

/// A consistent set of rates sharing one base and one timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateSnapshot {
    base: CurrencyCode,
    as_of: DateTime<Utc>,
    rates: BTreeMap<CurrencyCode, Decimal>,
}

impl RateSnapshot {
    /// Builds a snapshot from a raw rate table.
    ///
    /// Entries violating the rate invariants (non-positive rate, or a quote
    /// equal to the base) are dropped rather than failing the whole table.
    #[must_use]
    pub fn from_rates(
        base: CurrencyCode,
        as_of: DateTime<Utc>,
        rates: BTreeMap<CurrencyCode, Decimal>,
    ) -> Self {
        let rates = rates
            .into_iter()
            .filter(|(quote, rate)| *quote != base && rate.is_sign_positive() && !rate.is_zero())
            .collect();

        Self { base, as_of, rates }
    }

    /// The base currency all rates are expressed against.
    #[must_use]
    pub fn base(&self) -> &CurrencyCode {
        &self.base
    }

    /// Timestamp the snapshot is valid as of.
    #[must_use]
    pub fn as_of(&self) -> DateTime<Utc> {
        self.as_of
    }

    /// All quote rates, keyed by quote currency.
    #[must_use]
    pub fn rates(&self) -> &BTreeMap<CurrencyCode, Decimal> {
        &self.rates
    }

    /// Returns true when the snapshot holds no rates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Looks up the full rate for a single quote currency.
    #[must_use]
    pub fn rate_for(&self, quote: &CurrencyCode) -> Option<ExchangeRate> {
        self.rates.get(quote).map(|rate| ExchangeRate {
            base: self.base.clone(),
            quote: quote.clone(),
            rate: *rate,
            as_of: self.as_of,
        })
    }

    /// Narrows the snapshot down to exactly the requested quotes.
    ///
    /// # Errors
    ///
    /// Returns `RateError::QuoteNotFound` naming the first requested quote
    /// absent from the snapshot.
    pub fn subset(&self, quotes: &[CurrencyCode]) -> RateResult<Self> {
        let mut rates = BTreeMap::new();
        for quote in quotes {
            let rate = self
                .rates
                .get(quote)
                .ok_or_else(|| RateError::QuoteNotFound(quote.to_string()))?;
            rates.insert(quote.clone(), *rate);
        }

        Ok(Self {
            base: self.base.clone(),
            as_of: self.as_of,
            rates,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn code(s: &str) -> CurrencyCode {
        CurrencyCode::new(s).unwrap()
    }

    fn snapshot() -> RateSnapshot {
        let rates = BTreeMap::from([
            (code("EUR"), dec!(0.92)),
            (code("GBP"), dec!(0.79)),
            (code("JPY"), dec!(151.4)),
        ]);
        RateSnapshot::from_rates(code("USD"), Utc::now(), rates)
    }

    #[test]
    fn test_from_rates_drops_invalid_entries() {
        let rates = BTreeMap::from([
            (code("EUR"), dec!(0.92)),
            (code("USD"), dec!(1)),   // quote == base
            (code("GBP"), dec!(0)),   // zero rate
            (code("JPY"), dec!(-1.5)), // negative rate
        ]);
        let snapshot = RateSnapshot::from_rates(code("USD"), Utc::now(), rates);

        assert_eq!(snapshot.rates().len(), 1);
        assert!(snapshot.rates().contains_key(&code("EUR")));
    }

    #[test]
    fn test_subset_returns_exactly_requested_keys() {
        let full = snapshot();
        let narrowed = full.subset(&[code("EUR"), code("JPY")]).unwrap();

        assert_eq!(narrowed.rates().len(), 2);
        assert_eq!(narrowed.rates().get(&code("EUR")), Some(&dec!(0.92)));
        assert_eq!(narrowed.rates().get(&code("JPY")), Some(&dec!(151.4)));
        assert!(!narrowed.rates().contains_key(&code("GBP")));
        assert_eq!(narrowed.base(), full.base());
        assert_eq!(narrowed.as_of(), full.as_of());
    }

    #[test]
    fn test_subset_missing_quote_fails() {
        let result = snapshot().subset(&[code("EUR"), code("CHF")]);
        assert!(matches!(result, Err(RateError::QuoteNotFound(q)) if q == "CHF"));
    }

    #[test]
    fn test_subset_empty_request_is_empty() {
        let narrowed = snapshot().subset(&[]).unwrap();
        assert!(narrowed.is_empty());
    }

    #[rstest]
    #[case(dec!(100), dec!(0.92), dec!(92.0000))]
    #[case(dec!(1), dec!(151.4), dec!(151.4000))]
    #[case(dec!(0.5), dec!(0.79), dec!(0.3950))]
    fn test_rate_for_and_convert(
        #[case] amount: Decimal,
        #[case] rate: Decimal,
        #[case] expected: Decimal,
    ) {
        let rates = BTreeMap::from([(code("EUR"), rate)]);
        let snapshot = RateSnapshot::from_rates(code("USD"), Utc::now(), rates);

        let fx = snapshot.rate_for(&code("EUR")).unwrap();
        assert_eq!(fx.base, code("USD"));
        assert_eq!(fx.quote, code("EUR"));
        assert_eq!(fx.convert(amount), expected);
    }

    #[test]
    fn test_inverse_swaps_pair() {
        let rates = BTreeMap::from([(code("EUR"), dec!(0.8))]);
        let snapshot = RateSnapshot::from_rates(code("USD"), Utc::now(), rates);

        let inverse = snapshot.rate_for(&code("EUR")).unwrap().inverse();
        assert_eq!(inverse.base, code("EUR"));
        assert_eq!(inverse.quote, code("USD"));
        assert_eq!(inverse.rate, dec!(1.25));
    }
}
