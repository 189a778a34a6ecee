//! Typed extraction from warehouse result rows. Column order is fixed per
//! statement; any null in a required column is a mapping defect (aggregation
//! statements coalesce nullable sums before rows get here).

use crate::error::ApiError;
use chrono::NaiveDate;
use spendview_common::{ClusterDetails, JobRun, JobSpend, SummaryMetrics};
use spendview_warehouse::Row;

fn required<'a>(row: &'a Row, idx: usize, column: &str) -> Result<&'a str, ApiError> {
    row.get(idx)
        .and_then(|cell| cell.as_deref())
        .ok_or_else(|| ApiError::Mapping(format!("column '{column}' is null or absent")))
}

fn f64_col(row: &Row, idx: usize, column: &str) -> Result<f64, ApiError> {
    required(row, idx, column)?
        .parse()
        .map_err(|_| ApiError::Mapping(format!("column '{column}' is not numeric")))
}

fn i64_col(row: &Row, idx: usize, column: &str) -> Result<i64, ApiError> {
    required(row, idx, column)?
        .parse()
        .map_err(|_| ApiError::Mapping(format!("column '{column}' is not an integer")))
}

fn date_col(row: &Row, idx: usize, column: &str) -> Result<NaiveDate, ApiError> {
    required(row, idx, column)?
        .parse()
        .map_err(|_| ApiError::Mapping(format!("column '{column}' is not an ISO-8601 date")))
}

fn optional(row: &Row, idx: usize) -> Option<String> {
    row.get(idx).and_then(|cell| cell.clone())
}

fn opt_i64(row: &Row, idx: usize, column: &str) -> Result<Option<i64>, ApiError> {
    match optional(row, idx) {
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ApiError::Mapping(format!("column '{column}' is not an integer"))),
        None => Ok(None),
    }
}

fn opt_bool(row: &Row, idx: usize) -> Option<bool> {
    optional(row, idx).and_then(|value| value.parse().ok())
}

/// JSON columns come back as text; unparseable payloads are kept raw rather
/// than failing the whole query.
fn opt_json(row: &Row, idx: usize) -> Option<serde_json::Value> {
    optional(row, idx).map(|value| {
        serde_json::from_str(&value).unwrap_or_else(|_| serde_json::json!({ "raw": value }))
    })
}

/// Columns: cluster_id, compute_cost, job_id, run_id, usage_date,
/// platform_cost. Name enrichment happens after mapping.
pub fn spend(row: &Row) -> Result<JobSpend, ApiError> {
    Ok(JobSpend::new(
        required(row, 0, "cluster_id")?.to_string(),
        f64_col(row, 1, "compute_cost")?,
        required(row, 2, "job_id")?.to_string(),
        required(row, 3, "run_id")?.to_string(),
        date_col(row, 4, "usage_date")?,
        f64_col(row, 5, "platform_cost")?,
    ))
}

/// One grouped-spend row before name resolution and run assembly.
pub struct JobGroup {
    pub job_id: String,
    pub total_compute_cost: f64,
    pub total_platform_cost: f64,
    pub run_count: i64,
}

pub fn group(row: &Row) -> Result<JobGroup, ApiError> {
    Ok(JobGroup {
        job_id: required(row, 0, "job_id")?.to_string(),
        total_compute_cost: f64_col(row, 1, "total_compute_cost")?,
        total_platform_cost: f64_col(row, 2, "total_platform_cost")?,
        run_count: i64_col(row, 3, "run_count")?,
    })
}

pub fn run(row: &Row) -> Result<JobRun, ApiError> {
    Ok(JobRun::new(
        required(row, 0, "run_id")?.to_string(),
        required(row, 1, "cluster_id")?.to_string(),
        date_col(row, 2, "usage_date")?,
        f64_col(row, 3, "total_compute_cost")?,
        f64_col(row, 4, "total_platform_cost")?,
    ))
}

pub fn summary(
    row: &Row,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<SummaryMetrics, ApiError> {
    Ok(SummaryMetrics {
        total_jobs: i64_col(row, 0, "total_jobs")?,
        total_spend: f64_col(row, 1, "total_spend")?,
        average_cost: f64_col(row, 2, "avg_cost")?,
        max_cost: f64_col(row, 3, "max_cost")?,
        min_cost: f64_col(row, 4, "min_cost")?,
        total_compute_cost: f64_col(row, 5, "total_compute_cost")?,
        total_platform_cost: f64_col(row, 6, "total_platform_cost")?,
        date_range_days: spendview_common::models::date_range_days(start_date, end_date),
    })
}

/// Columns: job_id, run_id, cluster_id, usage_date, compute_cost,
/// platform_cost.
pub struct BreakdownRow {
    pub job_id: String,
    pub run_id: String,
    pub cluster_id: String,
    pub usage_date: NaiveDate,
    pub compute_cost: f64,
    pub platform_cost: f64,
}

pub fn breakdown(row: &Row) -> Result<BreakdownRow, ApiError> {
    Ok(BreakdownRow {
        job_id: required(row, 0, "job_id")?.to_string(),
        run_id: required(row, 1, "run_id")?.to_string(),
        cluster_id: required(row, 2, "cluster_id")?.to_string(),
        usage_date: date_col(row, 3, "usage_date")?,
        compute_cost: f64_col(row, 4, "compute_cost")?,
        platform_cost: f64_col(row, 5, "platform_cost")?,
    })
}

pub fn cluster(row: &Row) -> Result<ClusterDetails, ApiError> {
    Ok(ClusterDetails {
        cluster_id: required(row, 0, "cluster_id")?.to_string(),
        owned_by: optional(row, 1),
        create_time: optional(row, 2),
        driver_node_type: optional(row, 3),
        worker_node_type: optional(row, 4),
        worker_count: opt_i64(row, 5, "worker_count")?,
        min_autoscale_workers: opt_i64(row, 6, "min_autoscale_workers")?,
        max_autoscale_workers: opt_i64(row, 7, "max_autoscale_workers")?,
        auto_termination_minutes: opt_i64(row, 8, "auto_termination_minutes")?,
        enable_elastic_disk: opt_bool(row, 9),
        tags: opt_json(row, 10),
        cloud_attributes: opt_json(row, 11),
        runtime_version: optional(row, 12),
        data_security_mode: optional(row, 13),
    })
}

/// First column of the first row as a count; an empty result set means zero
/// matching rows, not an error.
pub fn scalar_count(rows: &[Row]) -> Result<i64, ApiError> {
    match rows.first() {
        Some(row) => i64_col(row, 0, "total_count"),
        None => Ok(0),
    }
}
