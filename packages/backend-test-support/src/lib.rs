//! Test utilities shared by the gateway's integration tests: logging
//! bootstrap, error-envelope assertions and unique test data.

pub mod error_envelope;
pub mod logging;
pub mod unique_helpers;
