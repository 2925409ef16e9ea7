//! Rate limit settings, keyed by client IP.
//!
//! Login endpoints get a tight budget against credential stuffing; the rest
//! of `/api` a generous one. `/health` and page routes are not limited.

use std::time::Duration;

use actix_extensible_rate_limit::backend::SimpleInputFunctionBuilder;

pub const LOGIN_REQUESTS_PER_MINUTE: u64 = 5;
pub const API_REQUESTS_PER_MINUTE: u64 = 100;

const WINDOW: Duration = Duration::from_secs(60);

/// `/api/auth/login` and `/api/superadmin/login`.
pub fn login_rate_limit_config() -> SimpleInputFunctionBuilder {
    SimpleInputFunctionBuilder::new(WINDOW, LOGIN_REQUESTS_PER_MINUTE).real_ip_key()
}

/// Every other `/api` route.
pub fn api_rate_limit_config() -> SimpleInputFunctionBuilder {
    SimpleInputFunctionBuilder::new(WINDOW, API_REQUESTS_PER_MINUTE).real_ip_key()
}
