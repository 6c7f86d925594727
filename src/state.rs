use std::sync::Arc;
use std::time::Duration;

use crate::auth::session::SessionGuard;
use crate::config::AppConfig;
use crate::registry::TenantRegistry;
use crate::store::memory::MemoryEngine;
use crate::store::TableStore;

/// Shared application state: the explicit wiring of config, store engine,
/// tenant registry and session table handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub engine: Arc<dyn TableStore>,
    pub registry: Arc<TenantRegistry>,
    pub sessions: Arc<SessionGuard>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let ttl = Duration::from_secs(config.session.unlock_ttl_secs);
        Self {
            config: Arc::new(config),
            engine: Arc::new(MemoryEngine::new()),
            registry: Arc::new(TenantRegistry::new()),
            sessions: Arc::new(SessionGuard::new(ttl)),
        }
    }
}
