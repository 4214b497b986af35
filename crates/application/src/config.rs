//! Probe configuration

use serde::Deserialize;
use url::Url;

use crate::error::{ProbeError, ProbeResult};

/// Base address of the public placeholder API.
pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com/";

/// Default `User-Agent` header sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("placeholder-probe/", env!("CARGO_PKG_VERSION"));

/// Settings shared by every scenario in a session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Absolute http(s) URL all scenario paths are resolved against.
    pub base_url: String,
    /// `User-Agent` header value.
    pub user_agent: String,
    /// Overall request timeout; `None` keeps the HTTP client default.
    pub timeout_ms: Option<u64>,
    /// Stop a suite run at the first failed scenario, and a scenario at its
    /// first failed assertion.
    pub stop_on_failure: bool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_ms: None,
            stop_on_failure: false,
        }
    }
}

impl ProbeConfig {
    /// Creates a configuration pointing at `base_url` with default settings.
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Parses and normalizes the base address.
    ///
    /// The result always ends with `/`, so joining `posts/1` keeps the
    /// last path segment of the base instead of replacing it.
    ///
    /// # Errors
    ///
    /// Returns `ProbeError::Config` if the URL is malformed or not http(s).
    pub fn base_url(&self) -> ProbeResult<Url> {
        let mut url = Url::parse(self.base_url.trim())
            .map_err(|e| ProbeError::Config(format!("invalid base_url '{}': {e}", self.base_url)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ProbeError::Config(format!(
                "base_url must use http or https, got '{}'",
                url.scheme()
            )));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(ProbeError::Config(
                "base_url must not carry a query or fragment".to_string(),
            ));
        }

        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    /// Validates every field.
    ///
    /// # Errors
    ///
    /// Returns `ProbeError::Config` describing the first invalid field.
    pub fn validate(&self) -> ProbeResult<()> {
        self.base_url()?;
        if self.user_agent.trim().is_empty() {
            return Err(ProbeError::Config("user_agent must not be empty".to_string()));
        }
        if self.timeout_ms == Some(0) {
            return Err(ProbeError::Config("timeout_ms must be greater than 0".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_points_at_placeholder_api() {
        let config = ProbeConfig::default();
        assert_eq!(
            config.base_url().unwrap().as_str(),
            "https://jsonplaceholder.typicode.com/"
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let config = ProbeConfig::with_base_url("http://127.0.0.1:8080/api/v1");
        let url = config.base_url().unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/api/v1/");
        assert_eq!(
            url.join("posts/1").unwrap().as_str(),
            "http://127.0.0.1:8080/api/v1/posts/1"
        );
    }

    #[test]
    fn test_rejects_bad_base_urls() {
        for bad in ["not a url", "ftp://example.com/", "https://example.com/?x=1"] {
            let result = ProbeConfig::with_base_url(bad).base_url();
            assert!(matches!(result, Err(ProbeError::Config(_))), "{bad}");
        }
    }

    #[test]
    fn test_validate_fields() {
        let mut config = ProbeConfig::default();
        config.timeout_ms = Some(0);
        assert!(config.validate().is_err());

        config.timeout_ms = Some(5_000);
        config.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }
}
