use anyhow::Result;
use async_trait::async_trait;

pub mod databricks;
pub mod mock;

pub use databricks::DatabricksClient;

/// One result row: column values in statement order, null as `None`.
pub type Row = Vec<Option<String>>;

/// Executes a SQL statement against the configured warehouse and returns the
/// result set. An empty result is `Ok(vec![])`, never an error; transport and
/// statement failures propagate to the caller.
#[async_trait]
pub trait StatementExecutor: Send + Sync {
    async fn execute(&self, statement: &str) -> Result<Vec<Row>>;
}

/// Looks up a job's display name from the job-metadata source.
/// `Ok(None)` means the job is unknown or unnamed; `Err` covers transport and
/// permission failures. Callers are expected to degrade both to a fallback.
#[async_trait]
pub trait JobMetadata: Send + Sync {
    async fn fetch_name(&self, job_id: &str) -> Result<Option<String>>;
}
