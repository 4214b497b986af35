//! Request specification type

use serde::{Deserialize, Serialize};
use url::Url;

use super::{Header, Headers, HttpMethod, RequestBody};
use crate::error::{DomainError, DomainResult};

/// One HTTP call relative to the probe's base address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestSpec {
    /// HTTP method
    pub method: HttpMethod,
    /// Relative path, optionally with a query string (e.g. `comments?postId=1`)
    pub path: String,
    /// Extra HTTP headers
    #[serde(default)]
    pub headers: Headers,
    /// Request body
    #[serde(default)]
    pub body: RequestBody,
}

impl RequestSpec {
    /// Creates a request with no body.
    #[must_use]
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Headers::new(),
            body: RequestBody::none(),
        }
    }

    /// Creates a GET request for the given path.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    /// Creates a DELETE request for the given path.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    /// Creates a POST request carrying `payload` as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be serialized to JSON.
    pub fn post<T: Serialize + ?Sized>(path: impl Into<String>, payload: &T) -> DomainResult<Self> {
        Self::new(HttpMethod::Post, path).with_payload(payload)
    }

    /// Creates a PUT request carrying `payload` as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be serialized to JSON.
    pub fn put<T: Serialize + ?Sized>(path: impl Into<String>, payload: &T) -> DomainResult<Self> {
        Self::new(HttpMethod::Put, path).with_payload(payload)
    }

    /// Attaches a JSON payload to the request.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be serialized to JSON.
    pub fn with_payload<T: Serialize + ?Sized>(mut self, payload: &T) -> DomainResult<Self> {
        self.body = RequestBody::from_payload(payload)?;
        Ok(self)
    }

    /// Adds a header (builder pattern).
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.add(Header::new(name, value));
        self
    }

    /// Returns the path with any leading `/` removed, so it resolves
    /// underneath the base address instead of replacing its path.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPath` if the path is empty, already an
    /// absolute URL, or names another authority (`//host`, `\\host`).
    pub fn relative_path(&self) -> DomainResult<&str> {
        let trimmed = self.path.trim();
        let relative = trimmed.trim_start_matches('/');
        if trimmed.starts_with("//") || relative.starts_with('\\') || Url::parse(relative).is_ok() {
            return Err(DomainError::InvalidPath(format!(
                "'{}' is absolute, expected a path relative to the base address",
                self.path
            )));
        }

        if relative.is_empty() {
            return Err(DomainError::InvalidPath("path is empty".to_string()));
        }
        Ok(relative)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_get_request() {
        let req = RequestSpec::get("posts");
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "posts");
        assert!(req.body.is_empty());
    }

    #[test]
    fn test_post_request_carries_json() {
        let req = RequestSpec::post("posts", &json!({"title": "foo"})).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.body.content_type(), Some("application/json"));
        assert_eq!(req.body.content, r#"{"title":"foo"}"#);
    }

    #[test]
    fn test_relative_path() {
        assert_eq!(RequestSpec::get("posts/1").relative_path().unwrap(), "posts/1");
        assert_eq!(RequestSpec::get("/posts").relative_path().unwrap(), "posts");
        assert_eq!(
            RequestSpec::get("comments?postId=1").relative_path().unwrap(),
            "comments?postId=1"
        );
    }

    #[test]
    fn test_relative_path_rejects_absolute_and_empty() {
        assert!(RequestSpec::get("https://example.com/posts").relative_path().is_err());
        assert!(RequestSpec::get("//example.com/posts").relative_path().is_err());
        assert!(RequestSpec::get("  ").relative_path().is_err());
        assert!(RequestSpec::get("/").relative_path().is_err());
    }

    #[test]
    fn test_relative_path_rejects_other_authorities() {
        for path in [
            "http:evil.example.com/posts",
            "\\\\evil.example.com/posts",
            "\\evil.example.com/posts",
            "/\\\\evil.example.com/posts",
            "/http:evil.example.com/posts",
            "mailto:someone@example.com",
        ] {
            assert!(
                matches!(RequestSpec::get(path).relative_path(), Err(DomainError::InvalidPath(_))),
                "{path}"
            );
        }
    }

    #[test]
    fn test_relative_path_allows_url_in_query() {
        assert_eq!(
            RequestSpec::get("comments?next=https://x.y/z").relative_path().unwrap(),
            "comments?next=https://x.y/z"
        );
    }
}
