//! Probe error taxonomy

use probe_domain::DomainError;
use thiserror::Error;

use crate::ports::HttpClientError;

/// Everything that can abort a probe scenario.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The request could not be built (bad path, unserializable payload).
    #[error("invalid request: {0}")]
    Request(#[from] DomainError),

    /// The configuration is unusable.
    #[error("configuration error: {0}")]
    Config(String),

    /// Network or transport failure; no response was received.
    #[error("transport error: {0}")]
    Transport(#[from] HttpClientError),

    /// The response status is outside the 2xx range.
    #[error("response status {status} {reason} is not a success status: {body_preview}")]
    Status {
        /// Status code received.
        status: u16,
        /// Reason phrase.
        reason: String,
        /// Start of the response body.
        body_preview: String,
    },

    /// The response body is not valid JSON.
    #[error("response body is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The response did not match an expectation.
    #[error("expectation failed: {0}")]
    Expectation(String),
}

impl ProbeError {
    /// Creates an expectation-mismatch error.
    #[must_use]
    pub fn expectation(message: impl Into<String>) -> Self {
        Self::Expectation(message.into())
    }
}

/// Result type alias for probe operations.
pub type ProbeResult<T> = Result<T, ProbeError>;
