//! Probe Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus the session that runs
//! scenarios against a live endpoint.

pub mod adapters;
pub mod report;
pub mod session;
pub mod settings;
pub mod telemetry;
pub mod testing;

pub use adapters::ReqwestHttpClient;
pub use report::{ReportError, log_suite_report, to_json_stable, write_json_report};
pub use session::ProbeSession;
pub use settings::{SettingsError, load_config, load_config_with_env};
pub use telemetry::init_tracing;
pub use testing::TestRunner;
