//! REST Probe use case
//!
//! Sends one request per call to a preconfigured base address and hands
//! back the raw response. Checking the status and decoding the body are
//! separate, explicit steps so a scenario decides which ones it needs.

use std::sync::Arc;

use probe_domain::{DomainError, Envelope, HttpMethod, RequestSpec, ResponseSpec};
use serde::Serialize;
use url::Url;

use crate::config::ProbeConfig;
use crate::error::{ProbeError, ProbeResult};
use crate::ports::HttpClient;

const BODY_PREVIEW_CHARS: usize = 200;

/// Use case for probing a REST API relative to a fixed base address.
///
/// # Example
///
/// ```ignore
/// let probe = RestProbe::from_config(Arc::new(ReqwestHttpClient::new(&config)?), &config)?;
///
/// let response = probe.post("posts", &json!({"title": "foo"})).await?;
/// let created = RestProbe::<ReqwestHttpClient>::read_envelope(&response)?;
/// assert_eq!(created.str_field("title"), Some("foo"));
/// ```
pub struct RestProbe<C: HttpClient> {
    client: Arc<C>,
    base_url: Url,
}

impl<C: HttpClient> RestProbe<C> {
    /// Creates a probe that resolves paths against `base_url`.
    pub const fn new(client: Arc<C>, base_url: Url) -> Self {
        Self { client, base_url }
    }

    /// Creates a probe from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `ProbeError::Config` if the base address is invalid.
    pub fn from_config(client: Arc<C>, config: &ProbeConfig) -> ProbeResult<Self> {
        Ok(Self::new(client, config.base_url()?))
    }

    /// The base address every path is resolved against.
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves the request path against the base address.
    ///
    /// # Errors
    ///
    /// Returns `ProbeError::Request` for empty or absolute paths and for
    /// paths that resolve outside the base address.
    pub fn resolve(&self, request: &RequestSpec) -> ProbeResult<Url> {
        let relative = request.relative_path()?;
        let invalid = |reason: String| {
            ProbeError::Request(DomainError::InvalidPath(format!("'{relative}': {reason}")))
        };

        let url = self.base_url.join(relative).map_err(|e| invalid(e.to_string()))?;
        if url.origin() != self.base_url.origin() || !url.path().starts_with(self.base_url.path()) {
            return Err(invalid(format!("resolves to {url}, outside {}", self.base_url)));
        }
        Ok(url)
    }

    /// Sends the request and returns the response with any status code.
    ///
    /// Performs exactly one network call; there are no retries.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is invalid or no response was received.
    pub async fn execute(&self, request: &RequestSpec) -> ProbeResult<ResponseSpec> {
        let url = self.resolve(request)?;
        tracing::debug!(method = %request.method, url = %url, "sending request");

        let response = self.client.execute(&url, request).await?;

        tracing::debug!(
            method = %request.method,
            url = %url,
            status = response.status,
            elapsed_ms = u64::try_from(response.duration.as_millis()).unwrap_or(u64::MAX),
            "received response"
        );
        Ok(response)
    }

    /// Builds and sends a request with an optional JSON payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be serialized, the path is
    /// invalid, or no response was received.
    pub async fn send<T: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        payload: Option<&T>,
    ) -> ProbeResult<ResponseSpec> {
        let mut request = RequestSpec::new(method, path);
        if let Some(payload) = payload {
            request = request.with_payload(payload)?;
        }
        self.execute(&request).await
    }

    /// Sends a GET request.
    ///
    /// # Errors
    ///
    /// See [`RestProbe::execute`].
    pub async fn get(&self, path: &str) -> ProbeResult<ResponseSpec> {
        self.execute(&RequestSpec::get(path)).await
    }

    /// Sends a POST request with a JSON payload.
    ///
    /// # Errors
    ///
    /// See [`RestProbe::send`].
    pub async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
    ) -> ProbeResult<ResponseSpec> {
        self.send(HttpMethod::Post, path, Some(payload)).await
    }

    /// Sends a PUT request with a JSON payload.
    ///
    /// # Errors
    ///
    /// See [`RestProbe::send`].
    pub async fn put<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
    ) -> ProbeResult<ResponseSpec> {
        self.send(HttpMethod::Put, path, Some(payload)).await
    }

    /// Sends a DELETE request.
    ///
    /// # Errors
    ///
    /// See [`RestProbe::execute`].
    pub async fn delete(&self, path: &str) -> ProbeResult<ResponseSpec> {
        self.execute(&RequestSpec::delete(path)).await
    }

    /// Fails unless the status is in the 2xx range.
    ///
    /// # Errors
    ///
    /// Returns `ProbeError::Status` for any non-2xx status.
    pub fn ensure_success(response: &ResponseSpec) -> ProbeResult<()> {
        if response.is_success() {
            return Ok(());
        }
        Err(ProbeError::Status {
            status: response.status,
            reason: response.status_text.clone(),
            body_preview: response.body_preview(BODY_PREVIEW_CHARS),
        })
    }

    /// Checks the status and returns the body text.
    ///
    /// # Errors
    ///
    /// Returns `ProbeError::Status` for any non-2xx status.
    pub fn read_content(response: ResponseSpec) -> ProbeResult<String> {
        Self::ensure_success(&response)?;
        Ok(response.body)
    }

    /// Checks the status and parses the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns `ProbeError::Status` for any non-2xx status and
    /// `ProbeError::Json` when the body is not JSON.
    pub fn read_envelope(response: &ResponseSpec) -> ProbeResult<Envelope> {
        Self::ensure_success(response)?;
        Ok(Envelope::parse(&response.body)?)
    }
}
