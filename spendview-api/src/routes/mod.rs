// Routes module - Centralizes all route definitions
pub mod dashboard;

use crate::app::AppState;
use axum::Router;
use std::sync::Arc;

/// Build the main application router
pub fn create_router() -> Router<Arc<AppState>> {
    Router::new().merge(dashboard::create_dashboard_routes())
}
