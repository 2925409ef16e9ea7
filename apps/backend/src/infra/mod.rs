//! Infrastructure layer: the backend HTTP client and state assembly.

pub mod backend_api;
pub mod state;
