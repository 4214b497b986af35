//! Probe Application - Use cases and ports
//!
//! This crate defines the application layer with:
//! - Port traits (interfaces for external dependencies)
//! - The REST probe use case and its configuration
//! - The scenario catalogue for the placeholder API
//! - Application-level error handling

pub mod config;
pub mod error;
pub mod ports;
pub mod rest_probe;
pub mod suite;

pub use config::{DEFAULT_BASE_URL, ProbeConfig};
pub use error::{ProbeError, ProbeResult};
pub use ports::{HttpClient, HttpClientError};
pub use rest_probe::RestProbe;
pub use suite::placeholder_suite;
