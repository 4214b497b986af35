//! Test runner implementation.
//!
//! Executes assertions against HTTP responses and produces assertion results.

use probe_domain::response::{Envelope, ResponseSpec};
use probe_domain::testing::{Assertion, AssertionResult, ComparisonOperator, StatusExpectation};
use regex::Regex;
use serde_json::Value;

const PREVIEW_CHARS: usize = 100;

/// Test runner that executes assertions against responses.
#[derive(Debug, Default)]
pub struct TestRunner {
    /// Whether to stop on first failure.
    stop_on_failure: bool,
}

impl TestRunner {
    /// Create a new test runner.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            stop_on_failure: false,
        }
    }

    /// Set whether to stop on first failure.
    #[must_use]
    pub const fn with_stop_on_failure(mut self, stop: bool) -> Self {
        self.stop_on_failure = stop;
        self
    }

    /// Run assertions in order against a response.
    #[must_use]
    pub fn run(&self, assertions: &[Assertion], response: &ResponseSpec) -> Vec<AssertionResult> {
        let envelope = Envelope::parse(&response.body);
        let mut results = Vec::with_capacity(assertions.len());

        for assertion in assertions {
            let result = self.evaluate(assertion, response, envelope.as_ref());
            let failed = !result.passed;
            results.push(result);

            if failed && self.stop_on_failure {
                break;
            }
        }

        results
    }

    /// Run a single assertion against a response.
    #[must_use]
    pub fn run_assertion(&self, assertion: &Assertion, response: &ResponseSpec) -> AssertionResult {
        let envelope = Envelope::parse(&response.body);
        self.evaluate(assertion, response, envelope.as_ref())
    }

    fn evaluate(
        &self,
        assertion: &Assertion,
        response: &ResponseSpec,
        envelope: Result<&Envelope, &serde_json::Error>,
    ) -> AssertionResult {
        match assertion {
            Assertion::StatusCode { expected } => check_status_code(assertion, response, expected),
            Assertion::IsJson => match envelope {
                Ok(_) => AssertionResult::pass(assertion.clone()),
                Err(e) => {
                    AssertionResult::fail(assertion.clone(), format!("Body is not valid JSON: {e}"))
                }
            },
            Assertion::BodyNotEmpty => {
                if response.body.trim().is_empty() {
                    AssertionResult::fail(assertion.clone(), "Body is empty")
                } else {
                    AssertionResult::pass_with_value(assertion.clone(), format!("{} bytes", response.size()))
                }
            }
            Assertion::ContentType { expected } => {
                check_content_type(assertion, response, expected)
            }
            Assertion::HeaderExists { name, value } => {
                check_header_exists(assertion, response, name, value.as_deref())
            }
            Assertion::NonEmptyArray
            | Assertion::AnyElementHas { .. }
            | Assertion::FieldEquals { .. }
            | Assertion::FieldPresent { .. }
            | Assertion::FieldCompare { .. } => match envelope {
                Ok(envelope) => check_envelope(assertion, envelope),
                Err(e) => AssertionResult::fail_with_value(
                    assertion.clone(),
                    response.body_preview(PREVIEW_CHARS),
                    format!("Failed to parse body as JSON: {e}"),
                ),
            },
        }
    }
}

fn check_status_code(
    assertion: &Assertion,
    response: &ResponseSpec,
    expected: &StatusExpectation,
) -> AssertionResult {
    let actual = response.status;
    if expected.matches(actual) {
        AssertionResult::pass_with_value(assertion.clone(), actual.to_string())
    } else {
        AssertionResult::fail_with_value(
            assertion.clone(),
            actual.to_string(),
            format!("Expected status {}, got {}", expected.description(), actual),
        )
    }
}

fn check_content_type(
    assertion: &Assertion,
    response: &ResponseSpec,
    expected: &str,
) -> AssertionResult {
    match &response.content_type {
        Some(actual) if actual.contains(expected) => {
            AssertionResult::pass_with_value(assertion.clone(), actual.clone())
        }
        Some(actual) => AssertionResult::fail_with_value(
            assertion.clone(),
            actual.clone(),
            format!("Content-Type '{actual}' does not contain '{expected}'"),
        ),
        None => AssertionResult::fail(assertion.clone(), "No Content-Type header present"),
    }
}

fn check_header_exists(
    assertion: &Assertion,
    response: &ResponseSpec,
    name: &str,
    expected_value: Option<&str>,
) -> AssertionResult {
    match (response.get_header(name), expected_value) {
        (Some(actual), Some(expected)) if actual != expected => AssertionResult::fail_with_value(
            assertion.clone(),
            actual.clone(),
            format!("Header '{name}' value mismatch: expected '{expected}', got '{actual}'"),
        ),
        (Some(actual), _) => AssertionResult::pass_with_value(assertion.clone(), actual.clone()),
        (None, _) => AssertionResult::fail(assertion.clone(), format!("Header '{name}' not found")),
    }
}

fn check_envelope(assertion: &Assertion, envelope: &Envelope) -> AssertionResult {
    match assertion {
        Assertion::NonEmptyArray => match envelope.elements() {
            Some(items) if !items.is_empty() => {
                AssertionResult::pass_with_value(assertion.clone(), format!("{} elements", items.len()))
            }
            Some(_) => AssertionResult::fail_with_value(assertion.clone(), "[]", "Array is empty"),
            None => AssertionResult::fail_with_value(
                assertion.clone(),
                json_kind(envelope.value()),
                "Body is not a JSON array",
            ),
        },
        Assertion::AnyElementHas { field } => {
            if envelope.any_element_has(field) {
                AssertionResult::pass(assertion.clone())
            } else {
                AssertionResult::fail(
                    assertion.clone(),
                    format!("No element has a non-null '{field}'"),
                )
            }
        }
        Assertion::FieldEquals { path, expected } => {
            with_path_value(assertion, envelope, path, |value| {
                if json_equals(value, expected) {
                    Ok(())
                } else {
                    Err(format!(
                        "JSON path '{path}' value mismatch: expected {expected}, got {value}"
                    ))
                }
            })
        }
        Assertion::FieldPresent { path } => with_path_value(assertion, envelope, path, |value| {
            if value.is_null() {
                Err(format!("JSON path '{path}' is null"))
            } else {
                Ok(())
            }
        }),
        Assertion::FieldCompare {
            path,
            operator,
            value: expected,
        } => with_path_value(assertion, envelope, path, |value| {
            compare_json_values(value, *operator, expected).map_err(|detail| {
                format!(
                    "JSON path '{path}' comparison failed: {value} {} {expected}{detail}",
                    operator.symbol()
                )
            })
        }),
        _ => AssertionResult::fail(assertion.clone(), "Assertion does not inspect the body"),
    }
}

/// Resolves `path` and hands the value to `check`, recording the outcome.
fn with_path_value(
    assertion: &Assertion,
    envelope: &Envelope,
    path: &str,
    check: impl FnOnce(&Value) -> Result<(), String>,
) -> AssertionResult {
    match envelope.query(path) {
        Ok(Some(value)) => match check(value) {
            Ok(()) => AssertionResult::pass_with_value(assertion.clone(), value.to_string()),
            Err(error) => {
                AssertionResult::fail_with_value(assertion.clone(), value.to_string(), error)
            }
        },
        Ok(None) => AssertionResult::fail(assertion.clone(), format!("JSON path '{path}' not found")),
        Err(e) => AssertionResult::fail(assertion.clone(), format!("Invalid JSON path '{path}': {e}")),
    }
}

/// Equality that treats `1` and `1.0` as the same number.
fn json_equals(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Number(a), Value::Number(b)) => match (a.as_i64(), b.as_i64()) {
            (Some(a), Some(b)) => a == b,
            _ => a.as_f64() == b.as_f64(),
        },
        _ => actual == expected,
    }
}

/// Compare two JSON values using the given operator.
///
/// The error carries extra detail for the failure message (may be empty).
fn compare_json_values(
    actual: &Value,
    operator: ComparisonOperator,
    expected: &Value,
) -> Result<(), String> {
    let passed = match operator {
        ComparisonOperator::Equals => json_equals(actual, expected),
        ComparisonOperator::NotEquals => !json_equals(actual, expected),
        ComparisonOperator::GreaterThan => compare_numeric(actual, expected, |a, b| a > b)?,
        ComparisonOperator::GreaterThanOrEqual => compare_numeric(actual, expected, |a, b| a >= b)?,
        ComparisonOperator::LessThan => compare_numeric(actual, expected, |a, b| a < b)?,
        ComparisonOperator::LessThanOrEqual => compare_numeric(actual, expected, |a, b| a <= b)?,
        ComparisonOperator::Contains => match (actual, expected) {
            (Value::String(s), Value::String(needle)) => s.contains(needle.as_str()),
            (Value::Array(arr), _) => arr.iter().any(|item| json_equals(item, expected)),
            _ => false,
        },
        ComparisonOperator::Matches => match (actual, expected) {
            (Value::String(s), Value::String(pattern)) => Regex::new(pattern)
                .map_err(|e| format!(" (invalid regex: {e})"))?
                .is_match(s),
            _ => false,
        },
    };

    if passed { Ok(()) } else { Err(String::new()) }
}

fn compare_numeric<F>(actual: &Value, expected: &Value, cmp: F) -> Result<bool, String>
where
    F: Fn(f64, f64) -> bool,
{
    match (actual.as_f64(), expected.as_f64()) {
        (Some(a), Some(b)) => Ok(cmp(a, b)),
        _ => Err(" (both sides must be numbers)".to_string()),
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
