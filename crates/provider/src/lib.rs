//! HTTP client for the upstream exchange rate provider.
//!
//! Implements the `RateProvider` seam from `fxrates-core` against an
//! exchangerate.host-compatible API serving full rate tables per base.

pub mod client;

pub use client::HttpRateProvider;
