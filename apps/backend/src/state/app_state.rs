use std::sync::Arc;

use super::security_config::SecurityConfig;
use crate::config::app::AppConfig;
use crate::infra::backend_api::BackendApi;
use crate::services::response_cache::ResponseCache;

/// Shared resources handed to every handler through `web::Data`.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// Session signing and cookie settings
    pub security: SecurityConfig,
    /// Client for the hotel-management API
    pub backend: BackendApi,
    /// Reference-data cache; one instance per process
    pub cache: Arc<ResponseCache>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        security: SecurityConfig,
        backend: BackendApi,
        cache: Arc<ResponseCache>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            security,
            backend,
            cache,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
