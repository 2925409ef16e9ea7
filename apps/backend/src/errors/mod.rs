//! Error handling for the hotel gateway.

pub mod error_code;

pub use error_code::ErrorCode;
