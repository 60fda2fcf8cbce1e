//! Error types for the upstream exchange client.
//!
//! Every failure surfaced by a [`StockDataProvider`](crate::StockDataProvider)
//! is a [`MarketDataError`]. Callers treat all of them as skippable for the
//! stock (or run) that triggered the call. [`MarketDataError::is_transient`]
//! picks the log level for a skipped stock. Nothing here retries.

use thiserror::Error;

/// Errors that can occur while talking to the upstream exchange API.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The exchange does not know the requested ticker (HTTP 404).
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// The exchange rate limited the request (HTTP 429).
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The request exceeded the client timeout.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// Any other non-2xx response.
    #[error("HTTP {status} from {provider}: {message}")]
    Http {
        provider: String,
        status: u16,
        message: String,
    },

    /// The response body could not be decoded into the expected shape.
    #[error("Failed to decode response from {provider}: {message}")]
    Decode { provider: String, message: String },

    /// The configured base URL cannot carry a request path.
    #[error("Invalid upstream URL: {0}")]
    InvalidUrl(String),

    /// A network error occurred before a response was received.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MarketDataError {
    /// Whether the next scheduled run has a reasonable chance of succeeding
    /// where this one failed.
    pub fn is_transient(&self) -> bool {
        match self {
            MarketDataError::RateLimited { .. }
            | MarketDataError::Timeout { .. }
            | MarketDataError::Network(_) => true,
            MarketDataError::Http { status, .. } => *status >= 500,
            MarketDataError::SymbolNotFound(_)
            | MarketDataError::Decode { .. }
            | MarketDataError::InvalidUrl(_) => false,
        }
    }
}
