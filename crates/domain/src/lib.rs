//! Probe Domain - Core types
//!
//! This crate defines the domain model for the placeholder REST probe.
//! All types here are pure Rust with no I/O dependencies.

pub mod error;
pub mod request;
pub mod response;
pub mod scenario;
pub mod testing;

pub use error::{DomainError, DomainResult};
pub use request::{HttpMethod, RequestBody, RequestSpec};
pub use response::{Envelope, PathError, ResponseSpec, StatusCode};
pub use scenario::{Scenario, ScenarioReport, SuiteReport};
pub use testing::{Assertion, AssertionResult, ComparisonOperator, StatusExpectation};
