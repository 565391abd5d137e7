//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `RateError`.
pub type RateResult<T> = Result<T, RateError>;

/// Rate resolution error taxonomy.
///
/// Every variant is recoverable at the request boundary and maps
/// deterministically to an HTTP status; none is process-fatal.
#[derive(Debug, Error)]
pub enum RateError {
    /// Malformed or unknown currency code.
    #[error("invalid currency code: {0}")]
    InvalidCurrency(String),

    /// Requested quote currency is absent from an otherwise valid snapshot.
    #[error("quote currency not available: {0}")]
    QuoteNotFound(String),

    /// Upstream fetch failed and no cached fallback exists.
    #[error("upstream rate source unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RateError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidCurrency(_) | Self::QuoteNotFound(_) => 400,
            Self::UpstreamUnavailable(_) => 502,
            Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for structured log fields.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidCurrency(_) => "INVALID_CURRENCY_CODE",
            Self::QuoteNotFound(_) => "QUOTE_NOT_FOUND",
            Self::UpstreamUnavailable(_) => "UPSTREAM_UNAVAILABLE",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
