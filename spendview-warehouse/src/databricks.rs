use crate::{JobMetadata, Row, StatementExecutor};
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tokio::time::sleep;

/// Client for the Databricks SQL statement-execution and jobs REST APIs.
pub struct DatabricksClient {
    client: Client,
    host: String,
    token: String,
    warehouse_id: String,
}

const POLL_INTERVAL: Duration = Duration::from_secs(1);
const MAX_POLLS: u32 = 60;

#[derive(Deserialize)]
struct StatementResponse {
    statement_id: Option<String>,
    status: Option<StatementStatus>,
    result: Option<StatementResult>,
}

#[derive(Deserialize)]
struct StatementStatus {
    state: Option<String>,
    error: Option<StatementError>,
}

#[derive(Deserialize)]
struct StatementError {
    message: Option<String>,
}

#[derive(Deserialize)]
struct StatementResult {
    data_array: Option<Vec<Row>>,
}

#[derive(Deserialize)]
struct JobResponse {
    settings: Option<JobSettings>,
}

#[derive(Deserialize)]
struct JobSettings {
    name: Option<String>,
}

impl DatabricksClient {
    pub fn new(host: String, token: String, warehouse_id: String) -> Self {
        // Default reqwest client has no overall timeout. If the warehouse
        // stalls, a dashboard request would hang forever.
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");
        let host = host.trim().trim_end_matches('/').to_string();
        let token = token.trim().to_string();
        Self {
            client,
            host,
            token,
            warehouse_id,
        }
    }

    async fn fetch_statement(&self, statement_id: &str) -> Result<StatementResponse> {
        let url = format!("{}/api/2.0/sql/statements/{}", self.host, statement_id);
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "statement poll failed: {} {}",
                status,
                body
            ));
        }
        Ok(resp.json().await?)
    }

    fn finish(response: StatementResponse) -> Result<Option<Vec<Row>>> {
        let state = response
            .status
            .as_ref()
            .and_then(|s| s.state.clone())
            .unwrap_or_default();
        match state.as_str() {
            "SUCCEEDED" => Ok(Some(
                response
                    .result
                    .and_then(|r| r.data_array)
                    .unwrap_or_default(),
            )),
            "PENDING" | "RUNNING" => Ok(None),
            _ => {
                let message = response
                    .status
                    .and_then(|s| s.error)
                    .and_then(|e| e.message)
                    .unwrap_or_else(|| format!("statement ended in state {state:?}"));
                Err(anyhow::anyhow!("statement execution failed: {message}"))
            }
        }
    }
}

#[async_trait]
impl StatementExecutor for DatabricksClient {
    async fn execute(&self, statement: &str) -> Result<Vec<Row>> {
        let url = format!("{}/api/2.0/sql/statements", self.host);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&serde_json::json!({
                "warehouse_id": self.warehouse_id,
                "statement": statement,
                "wait_timeout": "30s",
                "on_wait_timeout": "CONTINUE",
            }))
            .send()
            .await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "statement submission failed: {} {}",
                status,
                body
            ));
        }
        let mut response: StatementResponse = resp.json().await?;

        // Long statements come back PENDING/RUNNING; poll until terminal.
        let mut polls = 0;
        loop {
            let statement_id = response.statement_id.clone();
            match Self::finish(response)? {
                Some(rows) => return Ok(rows),
                None => {
                    polls += 1;
                    if polls > MAX_POLLS {
                        return Err(anyhow::anyhow!(
                            "statement did not reach a terminal state after {MAX_POLLS} polls"
                        ));
                    }
                    let statement_id = statement_id.ok_or_else(|| {
                        anyhow::anyhow!("non-terminal statement response missing statement_id")
                    })?;
                    tracing::debug!("statement {statement_id} still running, poll {polls}");
                    sleep(POLL_INTERVAL).await;
                    response = self.fetch_statement(&statement_id).await?;
                }
            }
        }
    }
}

#[async_trait]
impl JobMetadata for DatabricksClient {
    async fn fetch_name(&self, job_id: &str) -> Result<Option<String>> {
        // The jobs API addresses jobs by numeric id.
        let numeric_id: i64 = job_id
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("job id {job_id:?} is not numeric"))?;
        let url = format!("{}/api/2.1/jobs/get", self.host);
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .query(&[("job_id", numeric_id)])
            .send()
            .await?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("jobs lookup failed: {} {}", status, body));
        }
        let job: JobResponse = resp.json().await?;
        Ok(job.settings.and_then(|s| s.name))
    }
}
