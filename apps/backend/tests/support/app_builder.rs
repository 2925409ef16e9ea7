use std::sync::Arc;

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App, Error};
use hotel_gateway::config::app::AppConfig;
use hotel_gateway::infra::state::build_state;
use hotel_gateway::middleware::{RequestTrace, SecurityHeaders, StructuredLogger, TraceSpan};
use hotel_gateway::routes;
use hotel_gateway::services::response_cache::ResponseCache;
use hotel_gateway::state::app_state::AppState;

pub const TEST_SECRET: &[u8] = b"integration-test-session-secret";

/// Gateway state pointed at `backend_url`.
pub fn test_state(backend_url: &str) -> AppState {
    build_state()
        .with_config(AppConfig::for_backend(backend_url, TEST_SECRET))
        .build()
        .expect("build test state")
}

/// Gateway state pointed at `backend_url`, sharing `cache` with the caller.
pub fn test_state_with_cache(backend_url: &str, cache: Arc<ResponseCache>) -> AppState {
    build_state()
        .with_config(AppConfig::for_backend(backend_url, TEST_SECRET))
        .with_cache(cache)
        .build()
        .expect("build test state")
}

/// Builder for the gateway service with production routes and middleware,
/// minus the rate limiters (covered by their own suite).
pub struct TestAppBuilder {
    state: AppState,
}

impl TestAppBuilder {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub async fn build(
        self,
    ) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = Error> {
        test::init_service(
            App::new()
                .wrap(SecurityHeaders)
                .wrap(StructuredLogger)
                .wrap(TraceSpan)
                .wrap(RequestTrace)
                .app_data(web::Data::new(self.state))
                .configure(routes::configure),
        )
        .await
    }
}

pub fn create_test_app(state: AppState) -> TestAppBuilder {
    TestAppBuilder::new(state)
}
