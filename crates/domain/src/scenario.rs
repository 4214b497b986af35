//! Probe scenarios and their outcomes.
//!
//! A scenario is a single linear request/assert sequence:
//! build request, send, check status, parse body, check fields.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::request::RequestSpec;
use crate::testing::{Assertion, AssertionResult};

/// A single request/assert probe against the remote API.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    /// Scenario name, used in reports.
    pub name: String,
    /// The request to send.
    pub request: RequestSpec,
    /// Assertions evaluated in order against the response.
    pub assertions: Vec<Assertion>,
    /// Fail before evaluating assertions when the status is not 2xx.
    pub ensure_success: bool,
}

impl Scenario {
    /// Creates a scenario that requires a 2xx status.
    #[must_use]
    pub fn new(name: impl Into<String>, request: RequestSpec) -> Self {
        Self {
            name: name.into(),
            request,
            assertions: Vec::new(),
            ensure_success: true,
        }
    }

    /// Add an assertion (builder pattern).
    #[must_use]
    pub fn with_assertion(mut self, assertion: Assertion) -> Self {
        self.assertions.push(assertion);
        self
    }

    /// Add several assertions (builder pattern).
    #[must_use]
    pub fn with_assertions(mut self, assertions: impl IntoIterator<Item = Assertion>) -> Self {
        self.assertions.extend(assertions);
        self
    }

    /// Evaluate assertions even when the status is not 2xx.
    #[must_use]
    pub const fn allow_any_status(mut self) -> Self {
        self.ensure_success = false;
        self
    }
}

/// Outcome of one scenario run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScenarioReport {
    /// Scenario name.
    pub name: String,
    /// Status code received, if the request completed.
    pub status: Option<u16>,
    /// Individual assertion results (empty when the request itself failed).
    pub results: Vec<AssertionResult>,
    /// Error that aborted the scenario before assertions ran.
    pub error: Option<String>,
    /// Wall-clock time for the whole scenario in milliseconds.
    pub duration_ms: u64,
}

impl ScenarioReport {
    /// Creates a report for a scenario whose assertions ran.
    #[must_use]
    pub fn completed(
        name: impl Into<String>,
        status: u16,
        results: Vec<AssertionResult>,
        duration: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            status: Some(status),
            results,
            error: None,
            duration_ms: duration_millis(duration),
        }
    }

    /// Creates a report for a scenario aborted by an error.
    #[must_use]
    pub fn aborted(
        name: impl Into<String>,
        status: Option<u16>,
        error: impl Into<String>,
        duration: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            status,
            results: Vec::new(),
            error: Some(error.into()),
            duration_ms: duration_millis(duration),
        }
    }

    /// True when no error occurred and every assertion passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.error.is_none() && self.results.iter().all(|r| r.passed)
    }

    /// First failure message, if any.
    #[must_use]
    pub fn failure_message(&self) -> Option<String> {
        if let Some(error) = &self.error {
            return Some(error.clone());
        }
        self.results.iter().find(|r| !r.passed).map(|r| {
            format!(
                "{}: {}",
                r.assertion.description(),
                r.error.as_deref().unwrap_or("failed")
            )
        })
    }
}

/// Results from running a list of scenarios.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SuiteReport {
    /// Suite name.
    pub suite_name: String,
    /// Per-scenario reports in execution order.
    pub scenarios: Vec<ScenarioReport>,
    /// Total number of scenarios.
    pub total: usize,
    /// Number of passed scenarios.
    pub passed: usize,
    /// Number of failed scenarios.
    pub failed: usize,
    /// Execution time in milliseconds.
    pub duration_ms: u64,
}

impl SuiteReport {
    /// Create a new suite report.
    #[must_use]
    pub fn new(
        suite_name: impl Into<String>,
        scenarios: Vec<ScenarioReport>,
        duration: Duration,
    ) -> Self {
        let total = scenarios.len();
        let passed = scenarios.iter().filter(|s| s.passed()).count();

        Self {
            suite_name: suite_name.into(),
            scenarios,
            total,
            passed,
            failed: total - passed,
            duration_ms: duration_millis(duration),
        }
    }

    /// Check if all scenarios passed.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Reports for the scenarios that failed.
    pub fn failures(&self) -> impl Iterator<Item = &ScenarioReport> {
        self.scenarios.iter().filter(|s| !s.passed())
    }
}

fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
