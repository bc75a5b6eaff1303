use launchlog_core::{Config, LaunchService, SanitizedConfig};

/// Shared application state
pub struct AppState {
    config: Config,
    launches: LaunchService,
}

impl AppState {
    pub fn new(config: Config, launches: LaunchService) -> Self {
        Self { config, launches }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn launches(&self) -> &LaunchService {
        &self.launches
    }
}
