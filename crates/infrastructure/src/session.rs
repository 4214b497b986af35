//! Probe session: runs scenarios end to end.
//!
//! Each scenario is one linear sequence: send, check status, evaluate
//! assertions. Any error aborts that scenario only; the session itself
//! keeps the HTTP client and base address for the next one.

use std::sync::Arc;
use std::time::Instant;

use probe_application::{HttpClient, ProbeConfig, ProbeError, ProbeResult, RestProbe};
use probe_domain::{Scenario, ScenarioReport, SuiteReport};
use tracing::Instrument;

use crate::adapters::ReqwestHttpClient;
use crate::testing::TestRunner;

/// A configured probe plus the assertion runner.
pub struct ProbeSession<C: HttpClient> {
    probe: RestProbe<C>,
    runner: TestRunner,
    stop_on_failure: bool,
}

impl ProbeSession<ReqwestHttpClient> {
    /// Builds a session backed by reqwest from the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be created.
    pub fn connect(config: &ProbeConfig) -> ProbeResult<Self> {
        config.validate()?;
        let client = Arc::new(ReqwestHttpClient::new(config)?);
        Ok(Self::new(
            RestProbe::from_config(client, config)?,
            config.stop_on_failure,
        ))
    }
}

impl<C: HttpClient> ProbeSession<C> {
    /// Creates a session around an existing probe.
    ///
    /// `stop_on_failure` ends a suite at the first failed scenario and a
    /// scenario at its first failed assertion.
    #[must_use]
    pub const fn new(probe: RestProbe<C>, stop_on_failure: bool) -> Self {
        Self {
            probe,
            runner: TestRunner::new().with_stop_on_failure(stop_on_failure),
            stop_on_failure,
        }
    }

    /// The underlying probe, for ad-hoc requests.
    pub const fn probe(&self) -> &RestProbe<C> {
        &self.probe
    }

    /// Runs one scenario and reports the outcome; never fails itself.
    pub async fn run_scenario(&self, scenario: &Scenario) -> ScenarioReport {
        let span = tracing::info_span!(
            "scenario",
            name = %scenario.name,
            method = %scenario.request.method,
            path = %scenario.request.path
        );
        self.run_scenario_inner(scenario).instrument(span).await
    }

    async fn run_scenario_inner(&self, scenario: &Scenario) -> ScenarioReport {
        let start = Instant::now();

        let response = match self.probe.execute(&scenario.request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "request failed");
                return ScenarioReport::aborted(&scenario.name, None, e.to_string(), start.elapsed());
            }
        };

        if scenario.ensure_success
            && let Err(e) = RestProbe::<C>::ensure_success(&response)
        {
            tracing::warn!(status = response.status, "non-success status");
            return ScenarioReport::aborted(
                &scenario.name,
                Some(response.status),
                e.to_string(),
                start.elapsed(),
            );
        }

        let results = self.runner.run(&scenario.assertions, &response);
        let report =
            ScenarioReport::completed(&scenario.name, response.status, results, start.elapsed());

        match report.failure_message() {
            None => tracing::info!(status = response.status, "scenario passed"),
            Some(message) => tracing::warn!(status = response.status, error = %message, "scenario failed"),
        }
        report
    }

    /// Runs one scenario and turns any failure into an error.
    ///
    /// # Errors
    ///
    /// Returns the transport or status error that aborted the scenario, or
    /// `ProbeError::Expectation` naming the first failed assertion.
    pub async fn verify(&self, scenario: &Scenario) -> ProbeResult<ScenarioReport> {
        let report = self.run_scenario(scenario).await;
        match report.failure_message() {
            None => Ok(report),
            Some(message) => Err(ProbeError::expectation(format!(
                "{}: {message}",
                scenario.name
            ))),
        }
    }

    /// Runs scenarios one after another and collects the reports.
    ///
    /// With `stop_on_failure` the run ends after the first failed scenario.
    pub async fn run_suite(&self, name: &str, scenarios: &[Scenario]) -> SuiteReport {
        let start = Instant::now();
        let mut reports = Vec::with_capacity(scenarios.len());

        for scenario in scenarios {
            let report = self.run_scenario(scenario).await;
            let failed = !report.passed();
            reports.push(report);

            if failed && self.stop_on_failure {
                tracing::info!(suite = name, "stopping after first failure");
                break;
            }
        }

        SuiteReport::new(name, reports, start.elapsed())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use probe_application::HttpClientError;
    use probe_domain::{Assertion, RequestSpec, ResponseSpec};
    use url::Url;

    /// Answers by path; unknown paths fail at the transport level.
    struct CannedClient {
        routes: HashMap<String, (u16, String)>,
    }

    impl CannedClient {
        fn new(routes: &[(&str, u16, &str)]) -> Self {
            Self {
                routes: routes
                    .iter()
                    .map(|(path, status, body)| ((*path).to_string(), (*status, (*body).to_string())))
                    .collect(),
            }
        }
    }

    impl HttpClient for CannedClient {
        async fn execute(
            &self,
            url: &Url,
            _request: &RequestSpec,
        ) -> Result<ResponseSpec, HttpClientError> {
            self.routes
                .get(url.path().trim_start_matches('/'))
                .map(|(status, body)| {
                    ResponseSpec::new(
                        *status,
                        HashMap::new(),
                        body.as_bytes().to_vec(),
                        Duration::from_millis(1),
                    )
                })
                .ok_or_else(|| HttpClientError::ConnectionFailed("no route".to_string()))
        }
    }

    fn session(routes: &[(&str, u16, &str)], stop_on_failure: bool) -> ProbeSession<CannedClient> {
        let probe = RestProbe::new(
            Arc::new(CannedClient::new(routes)),
            Url::parse("https://api.example.com/").unwrap(),
        );
        ProbeSession::new(probe, stop_on_failure)
    }

    fn title_scenario(path: &str) -> Scenario {
        Scenario::new(path, RequestSpec::get(path))
            .with_assertion(Assertion::field_equals("title", "foo"))
    }

    #[tokio::test]
    async fn test_passing_scenario() {
        let session = session(&[("posts/1", 200, r#"{"title": "foo"}"#)], false);

        let report = session.run_scenario(&title_scenario("posts/1")).await;
        assert!(report.passed());
        assert_eq!(report.status, Some(200));
        assert_eq!(report.results.len(), 1);
    }

    #[tokio::test]
    async fn test_non_success_aborts_before_assertions() {
        let session = session(&[("posts/1", 404, "{}")], false);

        let report = session.run_scenario(&title_scenario("posts/1")).await;
        assert!(!report.passed());
        assert_eq!(report.status, Some(404));
        assert!(report.results.is_empty());
        assert!(report.error.unwrap().contains("404"));
    }

    #[tokio::test]
    async fn test_allow_any_status_evaluates_assertions() {
        let session = session(&[("posts/0", 404, "{}")], false);
        let scenario = Scenario::new("missing", RequestSpec::get("posts/0"))
            .allow_any_status()
            .with_assertion(Assertion::status(404));

        assert!(session.run_scenario(&scenario).await.passed());
    }

    #[tokio::test]
    async fn test_transport_failure_is_reported() {
        let session = session(&[], false);

        let report = session.run_scenario(&title_scenario("posts")).await;
        assert_eq!(report.status, None);
        assert_eq!(
            report.error.as_deref(),
            Some("transport error: connection failed: no route")
        );
    }

    #[tokio::test]
    async fn test_verify_maps_mismatch_to_error() {
        let session = session(&[("posts/1", 200, r#"{"title": "bar"}"#)], false);

        let err = session.verify(&title_scenario("posts/1")).await.unwrap_err();
        assert!(matches!(err, ProbeError::Expectation(ref msg) if msg.starts_with("posts/1: ")));
    }

    #[tokio::test]
    async fn test_stop_on_failure_skips_remaining_assertions() {
        let routes = [("posts/1", 200, r#"{"title": "bar", "userId": 1}"#)];
        let scenario = title_scenario("posts/1").with_assertion(Assertion::field_equals("userId", 1));

        let report = session(&routes, false).run_scenario(&scenario).await;
        assert_eq!(report.results.len(), 2);

        let report = session(&routes, true).run_scenario(&scenario).await;
        assert_eq!(report.results.len(), 1);
        assert!(!report.results[0].passed);
    }

    #[tokio::test]
    async fn test_run_suite_and_stop_on_failure() {
        let routes = [
            ("a", 200, r#"{"title": "foo"}"#),
            ("b", 500, "oops"),
            ("c", 200, r#"{"title": "foo"}"#),
        ];
        let scenarios = [title_scenario("a"), title_scenario("b"), title_scenario("c")];

        let report = session(&routes, false).run_suite("all", &scenarios).await;
        assert_eq!((report.total, report.passed, report.failed), (3, 2, 1));

        let report = session(&routes, true).run_suite("stop", &scenarios).await;
        assert_eq!((report.total, report.passed, report.failed), (2, 1, 1));
    }
}
