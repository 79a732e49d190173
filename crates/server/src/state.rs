use std::sync::Arc;

use cabinet_core::{
    Authenticator, Catalog, Config, LaunchGateway, LaunchStore, SanitizedConfig,
};

/// Shared application state
pub struct AppState {
    config: Config,
    authenticator: Arc<dyn Authenticator>,
    catalog: Arc<Catalog>,
    /// Absent when no game server is configured
    gateway: Option<Arc<dyn LaunchGateway>>,
    launch_store: Arc<dyn LaunchStore>,
}

impl AppState {
    pub fn new(
        config: Config,
        authenticator: Arc<dyn Authenticator>,
        catalog: Arc<Catalog>,
        gateway: Option<Arc<dyn LaunchGateway>>,
        launch_store: Arc<dyn LaunchStore>,
    ) -> Self {
        Self {
            config,
            authenticator,
            catalog,
            gateway,
            launch_store,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn authenticator(&self) -> &dyn Authenticator {
        self.authenticator.as_ref()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn gateway(&self) -> Option<&Arc<dyn LaunchGateway>> {
        self.gateway.as_ref()
    }

    pub fn launch_store(&self) -> &dyn LaunchStore {
        self.launch_store.as_ref()
    }
}
