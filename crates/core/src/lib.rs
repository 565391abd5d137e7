//! Core rate resolution logic for Fxrates.
//!
//! This crate contains pure resolution logic with ZERO web dependencies.
//! All domain types, cache policy, and conversion arithmetic live here.
//!
//! # Modules
//!
//! - `rates` - Snapshot cache, provider seam, and the resolver
//! - `conversion` - Amount conversion with banker's rounding

pub mod conversion;
pub mod rates;
