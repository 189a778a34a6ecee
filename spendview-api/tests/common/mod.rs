// Common test utilities and fixtures
use axum::Router;
use spendview_api::app::{create_cors, AppState};
use spendview_api::routes::create_router;
use spendview_api::service::SpendService;
use spendview_common::CloudPlatform;
use spendview_warehouse::mock::{MockJobs, MockWarehouse};
use std::sync::Arc;

/// Handles to the mock collaborators behind a test app.
pub struct TestContext {
    pub warehouse: Arc<MockWarehouse>,
    pub jobs: Arc<MockJobs>,
}

/// Create a test application router backed by mock collaborators.
pub fn create_test_app() -> (Router, TestContext) {
    let warehouse = Arc::new(MockWarehouse::new());
    let jobs = Arc::new(MockJobs::new());
    let service = SpendService::new(
        warehouse.clone(),
        jobs.clone(),
        "test_catalog.dashboard.job_spends".to_string(),
        CloudPlatform::Aws,
    );
    let state = AppState::new(service, "https://test.cloud.databricks.com".to_string());
    let app = create_router().layer(create_cors()).with_state(state);
    (app, TestContext { warehouse, jobs })
}
