use std::sync::Arc;

use crate::config::app::AppConfig;
use crate::error::AppError;
use crate::infra::backend_api::BackendApi;
use crate::services::response_cache::ResponseCache;
use crate::state::app_state::AppState;
use crate::state::security_config::SecurityConfig;

/// Builder for `AppState`, used by `main` and by the integration tests.
pub struct StateBuilder {
    config: Option<AppConfig>,
    security_config: Option<SecurityConfig>,
    cache: Option<Arc<ResponseCache>>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            security_config: None,
            cache: None,
        }
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Override the security settings derived from the config.
    pub fn with_security(mut self, security_config: SecurityConfig) -> Self {
        self.security_config = Some(security_config);
        self
    }

    /// Share an existing cache instead of starting empty.
    pub fn with_cache(mut self, cache: Arc<ResponseCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn build(self) -> Result<AppState, AppError> {
        let config = match self.config {
            Some(config) => config,
            None => AppConfig::from_env()?,
        };
        let security = self
            .security_config
            .unwrap_or_else(|| SecurityConfig::from_config(&config));
        let backend = BackendApi::new(&config.backend_api_url, config.backend_timeout)?;
        let cache = self.cache.unwrap_or_default();
        Ok(AppState::new(config, security, backend, cache))
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
