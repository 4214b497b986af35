//! Suite report output.
//!
//! Reports are logged through `tracing` and can be written to disk as
//! stable JSON (2-space indentation, trailing newline) for CI artefacts.

use std::io;
use std::path::Path;

use probe_domain::SuiteReport;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

/// Error type for report output.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// JSON serialization failed.
    #[error("JSON serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// UTF-8 encoding error.
    #[error("UTF-8 encoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Serializes a value to stable, pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json_stable<T: Serialize>(value: &T) -> Result<String, ReportError> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"  ");
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;

    let mut json = String::from_utf8(buffer)?;
    json.push('\n');
    Ok(json)
}

/// Writes the report as JSON to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn write_json_report(path: &Path, report: &SuiteReport) -> Result<(), ReportError> {
    std::fs::write(path, to_json_stable(report)?)?;
    Ok(())
}

/// Logs one line per scenario plus a summary line.
pub fn log_suite_report(report: &SuiteReport) {
    for scenario in &report.scenarios {
        match scenario.failure_message() {
            None => tracing::info!(
                scenario = %scenario.name,
                status = scenario.status,
                duration_ms = scenario.duration_ms,
                "PASS"
            ),
            Some(message) => tracing::warn!(
                scenario = %scenario.name,
                status = scenario.status,
                duration_ms = scenario.duration_ms,
                error = %message,
                "FAIL"
            ),
        }
    }

    tracing::info!(
        suite = %report.suite_name,
        total = report.total,
        passed = report.passed,
        failed = report.failed,
        duration_ms = report.duration_ms,
        "suite finished"
    );
}
