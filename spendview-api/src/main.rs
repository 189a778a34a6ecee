use spendview_api::api_docs;
use spendview_api::app::{create_cors, AppState};
use spendview_api::config::AppConfig;
use spendview_api::routes::create_router;
use spendview_api::service::SpendService;
use spendview_warehouse::DatabricksClient;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();
    dotenv::dotenv().ok();

    let config = AppConfig::from_env().expect("invalid configuration");

    // One client serves both the statement-execution and jobs APIs.
    let client = Arc::new(DatabricksClient::new(
        config.databricks_host.clone(),
        config.databricks_token.clone(),
        config.warehouse_id.clone(),
    ));
    let service = SpendService::new(
        client.clone(),
        client,
        config.spends_table.clone(),
        config.cloud_platform,
    );
    let state = AppState::new(service, config.databricks_host.clone());

    let app = create_router()
        .merge(
            SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api_docs::ApiDoc::openapi()),
        )
        .layer(create_cors())
        .with_state(state);

    tracing::info!(
        "spendview-api listening on {} (table {}, platform {:?})",
        config.bind_addr,
        config.spends_table,
        config.cloud_platform
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("failed to bind listener");
    axum::serve(listener, app).await.expect("server error");
}
