//! HTTP Client implementation using reqwest.
//!
//! This adapter implements the `HttpClient` port using the reqwest library.
//! One `reqwest::Client` (and its connection pool) is reused for every call.

use std::collections::HashMap;
use std::error::Error as _;
use std::time::{Duration, Instant};

use probe_application::ports::{HttpClient, HttpClientError};
use probe_application::ProbeConfig;
use probe_domain::{
    request::{HttpMethod, RequestBody, RequestBodyKind, RequestSpec},
    response::ResponseSpec,
};
use reqwest::header::HeaderMap;
use reqwest::{Client, Method};
use url::Url;

const MAX_REDIRECTS: usize = 10;

/// HTTP client implementation using reqwest.
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    /// Creates a client from the probe configuration.
    ///
    /// Configuration applied:
    /// - User-Agent from `config.user_agent`
    /// - Follow redirects: up to 10
    /// - TLS verification: enabled
    /// - Timeout: only when `config.timeout_ms` is set
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new(config: &ProbeConfig) -> Result<Self, HttpClientError> {
        let mut builder = Client::builder()
            .user_agent(config.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS));

        if let Some(timeout_ms) = config.timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }

        let client = builder
            .build()
            .map_err(|e| HttpClientError::Other(e.to_string()))?;

        Ok(Self { client })
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    /// Attaches the request body, rejecting JSON bodies that do not parse.
    fn build_body(
        builder: reqwest::RequestBuilder,
        body: &RequestBody,
    ) -> Result<reqwest::RequestBuilder, HttpClientError> {
        match body.kind {
            RequestBodyKind::None => Ok(builder),
            RequestBodyKind::Json => {
                if !body.content.is_empty() {
                    let _: serde_json::Value = serde_json::from_str(&body.content)
                        .map_err(|e| HttpClientError::InvalidBody(format!("Invalid JSON: {e}")))?;
                }
                Ok(builder.body(body.content.clone()))
            }
        }
    }

    fn host_of(error: &reqwest::Error) -> String {
        error
            .url()
            .and_then(Url::host_str)
            .unwrap_or("unknown")
            .to_string()
    }

    /// Joins the error with its sources; reqwest keeps the useful part
    /// (refused, DNS failure) in the source chain.
    fn error_chain(error: &reqwest::Error) -> String {
        let mut message = error.to_string();
        let mut source = error.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        message
    }

    /// Maps reqwest errors to the port's `HttpClientError`.
    fn map_error(error: &reqwest::Error) -> HttpClientError {
        if error.is_timeout() {
            return HttpClientError::Timeout;
        }

        if error.is_connect() {
            let message = Self::error_chain(error);
            let lower = message.to_lowercase();
            if lower.contains("dns") || lower.contains("resolve") {
                return HttpClientError::DnsError {
                    host: Self::host_of(error),
                    message,
                };
            }
            if lower.contains("refused") {
                return HttpClientError::ConnectionRefused {
                    host: Self::host_of(error),
                    port: error
                        .url()
                        .and_then(Url::port_or_known_default)
                        .unwrap_or(80),
                };
            }
            return HttpClientError::ConnectionFailed(message);
        }

        if error.is_redirect() {
            return HttpClientError::TooManyRedirects { max: MAX_REDIRECTS };
        }

        if error.is_body() || error.is_decode() {
            return HttpClientError::BodyRead(Self::error_chain(error));
        }

        HttpClientError::Other(Self::error_chain(error))
    }
}

impl HttpClient for ReqwestHttpClient {
    async fn execute(
        &self,
        url: &Url,
        request: &RequestSpec,
    ) -> Result<ResponseSpec, HttpClientError> {
        let start = Instant::now();

        let mut builder = self
            .client
            .request(Self::to_reqwest_method(request.method), url.clone());

        for header in request.headers.iter() {
            builder = builder.header(&header.name, &header.value);
        }

        if let Some(content_type) = request.body.content_type()
            && !request.headers.contains("content-type")
        {
            builder = builder.header("Content-Type", content_type);
        }

        builder = Self::build_body(builder, &request.body)?;

        let response = builder.send().await.map_err(|e| Self::map_error(&e))?;

        let status = response.status().as_u16();
        let headers = collect_headers(response.headers());

        let body_bytes = response
            .bytes()
            .await
            .map_err(|e| HttpClientError::BodyRead(Self::error_chain(&e)))?
            .to_vec();

        Ok(ResponseSpec::new(status, headers, body_bytes, start.elapsed()))
    }
}

/// Flattens response headers into one entry per name.
///
/// Repeated headers (`Set-Cookie`, `Vary`, ...) keep every value, joined
/// with `", "` in arrival order. Values that are not UTF-8 are decoded
/// lossily.
fn collect_headers(map: &HeaderMap) -> HashMap<String, String> {
    let mut headers: HashMap<String, String> = HashMap::with_capacity(map.keys_len());
    for (name, value) in map {
        let value = String::from_utf8_lossy(value.as_bytes());
        headers
            .entry(name.to_string())
            .and_modify(|joined| {
                joined.push_str(", ");
                joined.push_str(&value);
            })
            .or_insert_with(|| value.into_owned());
    }
    headers
}
