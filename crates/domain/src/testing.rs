//! Response testing and assertions.
//!
//! This module provides the vocabulary for checking HTTP responses returned
//! by the remote API, plus the records produced when those checks run.

use serde::{Deserialize, Serialize};

/// A check to run against a response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Assertion {
    /// Check response status code.
    StatusCode {
        /// Expected status code or range.
        expected: StatusExpectation,
    },
    /// Check body is valid JSON.
    IsJson,
    /// Check body text is not empty.
    BodyNotEmpty,
    /// Check body is a JSON array with at least one element.
    NonEmptyArray,
    /// Check at least one array element has a non-null field.
    AnyElementHas {
        /// Field name looked up on each element.
        field: String,
    },
    /// Check the value at a path equals an expected literal.
    FieldEquals {
        /// Path expression (e.g., "$.title" or "title").
        path: String,
        /// Expected value (as JSON).
        expected: serde_json::Value,
    },
    /// Check a path resolves to a non-null value.
    FieldPresent {
        /// Path expression.
        path: String,
    },
    /// Check the value at a path satisfies a comparison.
    FieldCompare {
        /// Path expression.
        path: String,
        /// Comparison operator.
        operator: ComparisonOperator,
        /// Value to compare against.
        value: serde_json::Value,
    },
    /// Check content type.
    ContentType {
        /// Expected content type (partial match).
        expected: String,
    },
    /// Check header exists and optionally its value.
    HeaderExists {
        /// Header name (case-insensitive).
        name: String,
        /// Optional expected value.
        value: Option<String>,
    },
}

impl Assertion {
    /// Status must be in 200..=299.
    #[must_use]
    pub const fn success() -> Self {
        Self::StatusCode {
            expected: StatusExpectation::success(),
        }
    }

    /// Status must equal `code`.
    #[must_use]
    pub const fn status(code: u16) -> Self {
        Self::StatusCode {
            expected: StatusExpectation::exact(code),
        }
    }

    /// Value at `path` must equal `expected`.
    #[must_use]
    pub fn field_equals(path: impl Into<String>, expected: impl Into<serde_json::Value>) -> Self {
        Self::FieldEquals {
            path: path.into(),
            expected: expected.into(),
        }
    }

    /// Value at `path` must compare to `value` with `operator`.
    #[must_use]
    pub fn field_compare(
        path: impl Into<String>,
        operator: ComparisonOperator,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        Self::FieldCompare {
            path: path.into(),
            operator,
            value: value.into(),
        }
    }

    /// Some array element must have a non-null `field`.
    #[must_use]
    pub fn any_element_has(field: impl Into<String>) -> Self {
        Self::AnyElementHas {
            field: field.into(),
        }
    }

    /// Get a human-readable description of this assertion.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::StatusCode { expected } => format!("Status code {}", expected.description()),
            Self::IsJson => "Body is valid JSON".to_string(),
            Self::BodyNotEmpty => "Body is not empty".to_string(),
            Self::NonEmptyArray => "Body is a non-empty array".to_string(),
            Self::AnyElementHas { field } => format!("Some element has non-null '{field}'"),
            Self::FieldEquals { path, expected } => format!("JSON {path} equals {expected}"),
            Self::FieldPresent { path } => format!("JSON {path} is present"),
            Self::FieldCompare {
                path,
                operator,
                value,
            } => format!("JSON {path} {} {value}", operator.symbol()),
            Self::ContentType { expected } => format!("Content-Type contains '{expected}'"),
            Self::HeaderExists {
                name,
                value: Some(v),
            } => format!("Header '{name}' equals '{v}'"),
            Self::HeaderExists { name, value: None } => format!("Header '{name}' exists"),
        }
    }
}

/// Expected status code value or range.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum StatusExpectation {
    /// Exact status code.
    Exact(u16),
    /// Range of status codes (e.g., 200-299).
    Range {
        /// Minimum status code (inclusive).
        min: u16,
        /// Maximum status code (inclusive).
        max: u16,
    },
    /// One of multiple status codes.
    OneOf(Vec<u16>),
}

impl StatusExpectation {
    /// Check if a status code matches this expectation.
    #[must_use]
    pub fn matches(&self, status: u16) -> bool {
        match self {
            Self::Exact(expected) => status == *expected,
            Self::Range { min, max } => (*min..=*max).contains(&status),
            Self::OneOf(codes) => codes.contains(&status),
        }
    }

    /// Get description of the expectation.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::Exact(code) => format!("= {code}"),
            Self::Range { min, max } => format!("in {min}-{max}"),
            Self::OneOf(codes) => {
                let codes_str: Vec<_> = codes.iter().map(ToString::to_string).collect();
                format!("in [{}]", codes_str.join(", "))
            }
        }
    }

    /// Create a "success" expectation (200-299).
    #[must_use]
    pub const fn success() -> Self {
        Self::Range { min: 200, max: 299 }
    }

    /// Create an exact status expectation.
    #[must_use]
    pub const fn exact(code: u16) -> Self {
        Self::Exact(code)
    }
}

impl Default for StatusExpectation {
    fn default() -> Self {
        Self::success()
    }
}

/// Comparison operators for value assertions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOperator {
    /// Equal to.
    Equals,
    /// Not equal to.
    NotEquals,
    /// Greater than.
    GreaterThan,
    /// Greater than or equal to.
    GreaterThanOrEqual,
    /// Less than.
    LessThan,
    /// Less than or equal to.
    LessThanOrEqual,
    /// Contains (for strings/arrays).
    Contains,
    /// Matches regex pattern.
    Matches,
}

impl ComparisonOperator {
    /// Get the symbol for this operator.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Equals => "==",
            Self::NotEquals => "!=",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
            Self::Contains => "contains",
            Self::Matches => "matches",
        }
    }
}

/// Result of running a single assertion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssertionResult {
    /// The assertion that was run.
    pub assertion: Assertion,
    /// Whether the assertion passed.
    pub passed: bool,
    /// Actual value found (for display).
    pub actual: Option<String>,
    /// Error message if failed.
    pub error: Option<String>,
}

impl AssertionResult {
    /// Create a passed result.
    #[must_use]
    pub const fn pass(assertion: Assertion) -> Self {
        Self {
            assertion,
            passed: true,
            actual: None,
            error: None,
        }
    }

    /// Create a passed result with actual value.
    #[must_use]
    pub fn pass_with_value(assertion: Assertion, actual: impl Into<String>) -> Self {
        Self {
            assertion,
            passed: true,
            actual: Some(actual.into()),
            error: None,
        }
    }

    /// Create a failed result.
    #[must_use]
    pub fn fail(assertion: Assertion, error: impl Into<String>) -> Self {
        Self {
            assertion,
            passed: false,
            actual: None,
            error: Some(error.into()),
        }
    }

    /// Create a failed result with actual value.
    #[must_use]
    pub fn fail_with_value(
        assertion: Assertion,
        actual: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            assertion,
            passed: false,
            actual: Some(actual.into()),
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_status_expectation_exact() {
        let exp = StatusExpectation::exact(200);
        assert!(exp.matches(200));
        assert!(!exp.matches(201));
    }

    #[test]
    fn test_status_expectation_range() {
        let exp = StatusExpectation::success();
        assert!(exp.matches(200));
        assert!(exp.matches(201));
        assert!(exp.matches(299));
        assert!(!exp.matches(300));
        assert!(!exp.matches(199));
    }

    #[test]
    fn test_status_expectation_one_of() {
        let exp = StatusExpectation::OneOf(vec![200, 201, 204]);
        assert!(exp.matches(204));
        assert!(!exp.matches(202));
        assert_eq!(exp.description(), "in [200, 201, 204]");
    }

    #[test]
    fn test_assertion_description() {
        assert_eq!(Assertion::status(200).description(), "Status code = 200");
        assert_eq!(
            Assertion::field_equals("title", "foo").description(),
            r#"JSON title equals "foo""#
        );
        assert_eq!(
            Assertion::field_compare("id", ComparisonOperator::GreaterThan, 0).description(),
            "JSON id > 0"
        );
        assert_eq!(
            Assertion::any_element_has("body").description(),
            "Some element has non-null 'body'"
        );
    }

    #[test]
    fn test_assertion_serde_shape() {
        let assertion = Assertion::field_equals("userId", 1);
        let value = serde_json::to_value(&assertion).unwrap_or_default();
        assert_eq!(
            value,
            json!({"type": "field_equals", "path": "userId", "expected": 1})
        );
    }
}
