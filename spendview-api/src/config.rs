use anyhow::{Context, Result};
use spendview_common::CloudPlatform;

/// Application configuration, read from the environment after `dotenv`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub databricks_host: String,
    pub databricks_token: String,
    pub warehouse_id: String,
    pub spends_table: String,
    pub cloud_platform: CloudPlatform,
    pub bind_addr: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let databricks_host =
            std::env::var("DATABRICKS_HOST").context("DATABRICKS_HOST must be set")?;
        let databricks_token =
            std::env::var("DATABRICKS_TOKEN").context("DATABRICKS_TOKEN must be set")?;
        let warehouse_id =
            std::env::var("WAREHOUSE_ID").context("WAREHOUSE_ID must be set")?;
        let spends_table = std::env::var("SPENDS_TABLE")
            .unwrap_or_else(|_| "finops.dashboard.job_spends".to_string());
        let cloud_platform = CloudPlatform::parse(
            &std::env::var("CLOUD_PLATFORM").unwrap_or_else(|_| "AWS".to_string()),
        );
        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
        Ok(Self {
            databricks_host,
            databricks_token,
            warehouse_id,
            spends_table,
            cloud_platform,
            bind_addr,
        })
    }
}
