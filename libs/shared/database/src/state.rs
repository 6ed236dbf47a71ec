use std::sync::Arc;

use shared_config::AppConfig;

use crate::store::StoreClient;

/// Shared application state: configuration plus the row-store client, opened
/// once at startup and injected into every cell router.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<StoreClient>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let store = Arc::new(StoreClient::new(&config));
        Self { config, store }
    }
}
