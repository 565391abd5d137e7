//! Shared types, errors, and configuration for Fxrates.
//!
//! This crate provides common types used across all other crates:
//! - Validated ISO 4217 currency codes
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{RateError, RateResult};
pub use types::CurrencyCode;
