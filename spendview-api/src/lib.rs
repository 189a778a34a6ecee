// Library entry point for tests and external usage

pub mod api_docs;
pub mod app;
pub mod config;
pub mod error;
pub mod routes;
pub mod service;

// Re-export commonly used types
pub use app::AppState;
pub use error::ApiError;
pub use service::SpendService;
