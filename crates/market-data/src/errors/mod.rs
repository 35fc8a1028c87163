//! Error types for the market data crate.
//!
//! Per-ticker source errors are absorbed by the enricher, which leaves the
//! affected fields empty. [`MarketDataError::ListingUnavailable`] is the only
//! error that aborts a pipeline run.

use thiserror::Error;

/// Errors that can occur while talking to market data sources.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The request did not complete within the configured timeout.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// The provider answered with a non-success HTTP status.
    #[error("HTTP {status} from {provider}")]
    HttpStatus {
        /// The provider that returned the status
        provider: String,
        /// The HTTP status code
        status: u16,
    },

    /// A provider-specific failure (connection refused, body unreadable, ...).
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that failed
        provider: String,
        /// Description of the failure
        message: String,
    },

    /// The provider answered, but the payload could not be interpreted.
    #[error("Failed to parse {provider} response: {message}")]
    ParseError {
        /// The provider whose payload was malformed
        provider: String,
        /// Description of the parse failure
        message: String,
    },

    /// The provider has no record for the requested ticker.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// The full ticker listing could not be fetched. Aborts the pipeline run.
    #[error("Listing unavailable for {market}: {message}")]
    ListingUnavailable {
        /// Market the listing was requested for (shares or bonds)
        market: String,
        /// The underlying failure
        message: String,
    },
}

impl MarketDataError {
    /// Builds a [`MarketDataError`] from a reqwest failure for a given provider.
    pub fn from_reqwest(provider: &str, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout {
                provider: provider.to_string(),
            }
        } else {
            Self::ProviderError {
                provider: provider.to_string(),
                message: error.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_error_names_market() {
        let error = MarketDataError::ListingUnavailable {
            market: "bonds".to_string(),
            message: "connection refused".to_string(),
        };
        assert_eq!(
            format!("{}", error),
            "Listing unavailable for bonds: connection refused"
        );
    }

    #[test]
    fn test_error_display() {
        let error = MarketDataError::HttpStatus {
            provider: "SMART_LAB".to_string(),
            status: 404,
        };
        assert_eq!(format!("{}", error), "HTTP 404 from SMART_LAB");

        let error = MarketDataError::ProviderError {
            provider: "MOEX_ISS".to_string(),
            message: "connection reset".to_string(),
        };
        assert_eq!(
            format!("{}", error),
            "Provider error: MOEX_ISS - connection reset"
        );
    }
}
