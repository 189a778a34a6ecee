//! In-memory stand-ins for the warehouse and jobs APIs, used by unit and
//! integration tests.

use crate::{JobMetadata, Row, StatementExecutor};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Serves queued result sets in FIFO order and records every executed
/// statement. An exhausted queue yields empty result sets, matching a
/// warehouse with no matching rows.
#[derive(Default)]
pub struct MockWarehouse {
    results: Mutex<VecDeque<Vec<Row>>>,
    statements: Mutex<Vec<String>>,
    fail: AtomicBool,
}

impl MockWarehouse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the result set for the next unmatched `execute` call.
    pub fn push_rows(&self, rows: Vec<Row>) {
        self.results.lock().unwrap().push_back(rows);
    }

    /// Make every subsequent `execute` call fail.
    pub fn fail_from_now_on(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    /// Statements executed so far, in order.
    pub fn executed(&self) -> Vec<String> {
        self.statements.lock().unwrap().clone()
    }
}

/// Build a row from column values; `""` stays a value, use `null_row` cells
/// via `None` where needed.
pub fn row(cells: &[&str]) -> Row {
    cells.iter().map(|c| Some((*c).to_string())).collect()
}

#[async_trait]
impl StatementExecutor for MockWarehouse {
    async fn execute(&self, statement: &str) -> Result<Vec<Row>> {
        self.statements.lock().unwrap().push(statement.to_string());
        if self.fail.load(Ordering::SeqCst) {
            return Err(anyhow::anyhow!("mock warehouse failure"));
        }
        Ok(self
            .results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default())
    }
}

/// Name table with a failure switch and per-job call accounting.
#[derive(Default)]
pub struct MockJobs {
    names: Mutex<HashMap<String, String>>,
    calls: Mutex<Vec<String>>,
    fail: AtomicBool,
}

impl MockJobs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_name(&self, job_id: &str, name: &str) {
        self.names
            .lock()
            .unwrap()
            .insert(job_id.to_string(), name.to_string());
    }

    pub fn fail_from_now_on(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    /// Job ids fetched so far, one entry per external call.
    pub fn fetch_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobMetadata for MockJobs {
    async fn fetch_name(&self, job_id: &str) -> Result<Option<String>> {
        self.calls.lock().unwrap().push(job_id.to_string());
        if self.fail.load(Ordering::SeqCst) {
            return Err(anyhow::anyhow!("mock jobs API failure"));
        }
        Ok(self.names.lock().unwrap().get(job_id).cloned())
    }
}
