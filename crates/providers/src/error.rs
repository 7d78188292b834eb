//! Errors from remote provider calls.

/// Errors from a single provider round-trip.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, body decode).
    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("Provider API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The provider answered 2xx but reported a failure in its envelope.
    #[error("Provider rejected request ({code}): {message}")]
    Rejected { code: i64, message: String },

    /// A required field was absent from the provider response.
    #[error("Provider response is missing '{0}'")]
    MissingField(&'static str),

    /// A configured base URL could not be parsed or extended.
    #[error("Invalid provider URL: {0}")]
    InvalidUrl(String),

    /// Local placeholder synthesis failed.
    #[error("Placeholder synthesis failed: {0}")]
    Placeholder(#[from] wallmania_core::error::CoreError),
}

impl ProviderError {
    /// HTTP status reported by the provider, if the failure carried one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::Api { status, .. } => Some(*status),
            ProviderError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
