//! HTTP Response domain types

mod envelope;
mod spec;

pub use envelope::{Envelope, PathError};
pub use spec::{ResponseSpec, StatusCode};
