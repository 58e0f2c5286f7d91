use std::sync::Arc;

use gradebook_core::{AccountStore, HashVerifier, LoginAttemptGuard, LoginFlow};

use crate::config::ServerConfig;
use crate::db::PgStore;
use crate::store::{DashboardProvider, HealthCheck, RecordCommands};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub login: LoginFlow,
    pub dashboards: Arc<dyn DashboardProvider>,
    pub records: Arc<dyn RecordCommands>,
    pub health: Arc<dyn HealthCheck>,
}

impl AppState {
    /// Wires every collaborator to one PostgreSQL store.
    pub fn with_pg_store(
        config: ServerConfig,
        guard: Arc<LoginAttemptGuard>,
        store: PgStore,
    ) -> Self {
        let store = Arc::new(store);
        let accounts: Arc<dyn AccountStore> = store.clone();
        Self {
            config: Arc::new(config),
            login: LoginFlow::new(guard, accounts, Arc::new(HashVerifier)),
            dashboards: store.clone(),
            records: store.clone(),
            health: store,
        }
    }
}
