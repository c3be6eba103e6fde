use property_registry_api::{ApiResult, ConnectivityMonitor};
use property_registry_db::repository::PropertyStore;
use std::sync::Arc;

use crate::config::Config;

#[derive(Clone)]
pub struct ApiContext {
    pub store: Arc<dyn PropertyStore>,
    pub monitor: Arc<ConnectivityMonitor>,
    pub config: Arc<Config>,
}

impl ApiContext {
    pub fn new(store: Arc<dyn PropertyStore>, config: Config) -> Self {
        Self {
            store,
            monitor: Arc::new(ConnectivityMonitor::new(config.backend_failure_threshold)),
            config: Arc::new(config),
        }
    }

    /// Feeds the outcome of a storage operation to the connectivity monitor
    pub fn observe<T>(&self, result: ApiResult<T>) -> ApiResult<T> {
        self.monitor.observe(&result);
        result
    }
}
