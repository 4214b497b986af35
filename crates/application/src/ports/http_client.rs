//! HTTP Client port

use std::future::Future;

use probe_domain::{request::RequestSpec, response::ResponseSpec};
use thiserror::Error;
use url::Url;

/// Transport-level failures. A completed response with any status code is
/// never an `HttpClientError`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpClientError {
    /// The resolved URL could not be used.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The request body was rejected before sending.
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    /// The host name could not be resolved.
    #[error("could not resolve host '{host}': {message}")]
    DnsError {
        /// Host that failed to resolve.
        host: String,
        /// Underlying error message.
        message: String,
    },

    /// The remote end refused the connection.
    #[error("connection refused by {host}:{port}")]
    ConnectionRefused {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
    },

    /// Connecting failed for another reason (TLS, reset, ...).
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The configured client timeout elapsed.
    #[error("request timed out")]
    Timeout,

    /// Redirect limit reached.
    #[error("too many redirects (max {max})")]
    TooManyRedirects {
        /// Redirect limit.
        max: usize,
    },

    /// The response body could not be read.
    #[error("failed to read response body: {0}")]
    BodyRead(String),

    /// Any other client failure.
    #[error("{0}")]
    Other(String),
}

/// Port for executing HTTP requests.
///
/// This trait abstracts the HTTP client implementation, allowing
/// the application layer to be independent of specific HTTP libraries.
pub trait HttpClient: Send + Sync {
    /// Sends `request` to the already resolved `url` and returns the
    /// response whatever its status code.
    ///
    /// # Errors
    ///
    /// Returns an error only if no response was received (network
    /// failure, timeout, unreadable body).
    fn execute(
        &self,
        url: &Url,
        request: &RequestSpec,
    ) -> impl Future<Output = Result<ResponseSpec, HttpClientError>> + Send;
}
