use crate::service::SpendService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<SpendService>,
    /// Workspace URL handed to the frontend for deep links into Databricks.
    pub databricks_host: String,
}

impl AppState {
    pub fn new(service: SpendService, databricks_host: String) -> Arc<Self> {
        Arc::new(Self {
            service: Arc::new(service),
            databricks_host,
        })
    }
}
