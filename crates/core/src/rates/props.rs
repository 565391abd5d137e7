//! Property-based tests for snapshot filtering and conversion arithmetic.

use std::collections::BTreeMap;

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;

use fxrates_shared::CurrencyCode;

use super::snapshot::RateSnapshot;
use crate::conversion::{AMOUNT_DECIMAL_PLACES, convert_amount};

const QUOTE_POOL: &[&str] = &[
    "AUD", "CAD", "CHF", "CNY", "EUR", "GBP", "IDR", "JPY", "KRW", "SEK",
];

fn code(s: &str) -> CurrencyCode {
    CurrencyCode::new(s).unwrap()
}

/// Strategy to generate positive rates (0.0001 to 10000.0000).
fn positive_rate() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|v| Decimal::new(v, 4))
}

/// Strategy to generate positive amounts (0.01 to 1,000,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a non-empty quote table over the pool.
fn rate_table() -> impl Strategy<Value = BTreeMap<CurrencyCode, Decimal>> {
    prop::collection::btree_map(
        prop::sample::select(QUOTE_POOL).prop_map(code),
        positive_rate(),
        1..QUOTE_POOL.len(),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Narrowing a snapshot returns exactly the requested keys, no extras.
    #[test]
    fn prop_subset_returns_exactly_requested_keys(table in rate_table()) {
        let snapshot = RateSnapshot::from_rates(code("USD"), Utc::now(), table.clone());
        let requested: Vec<CurrencyCode> = table.keys().cloned().collect();

        for take in 0..=requested.len() {
            let quotes = &requested[..take];
            let narrowed = snapshot.subset(quotes).unwrap();

            prop_assert_eq!(narrowed.rates().len(), take);
            for quote in quotes {
                prop_assert_eq!(narrowed.rates().get(quote), table.get(quote));
            }
        }
    }

    /// Narrowing preserves base and timestamp.
    #[test]
    fn prop_subset_preserves_base_and_as_of(table in rate_table()) {
        let snapshot = RateSnapshot::from_rates(code("USD"), Utc::now(), table.clone());
        let quotes: Vec<CurrencyCode> = table.keys().take(1).cloned().collect();

        let narrowed = snapshot.subset(&quotes).unwrap();
        prop_assert_eq!(narrowed.base(), snapshot.base());
        prop_assert_eq!(narrowed.as_of(), snapshot.as_of());
    }

    /// A snapshot never stores its own base as a quote.
    #[test]
    fn prop_snapshot_never_quotes_its_base(mut table in rate_table(), rate in positive_rate()) {
        table.insert(code("USD"), rate);
        let snapshot = RateSnapshot::from_rates(code("USD"), Utc::now(), table);

        prop_assert!(!snapshot.rates().contains_key(&code("USD")));
    }

    /// Converted amounts carry at most 4 decimal places.
    #[test]
    fn prop_convert_rounds_to_4_decimals(amount in positive_amount(), rate in positive_rate()) {
        let converted = convert_amount(amount, rate, AMOUNT_DECIMAL_PLACES);
        prop_assert_eq!(converted, converted.round_dp(AMOUNT_DECIMAL_PLACES));
    }

    /// Conversion is monotone in the amount for a fixed rate.
    #[test]
    fn prop_convert_is_monotone(amount in positive_amount(), rate in positive_rate()) {
        let bigger = amount + Decimal::ONE;
        let a = convert_amount(amount, rate, AMOUNT_DECIMAL_PLACES);
        let b = convert_amount(bigger, rate, AMOUNT_DECIMAL_PLACES);
        prop_assert!(a <= b);
    }
}
