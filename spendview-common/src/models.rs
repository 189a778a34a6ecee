use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Share of `part` in `total`, as a percentage. Zero-cost rows yield 0.0
/// rather than NaN.
fn percentage(part: f64, total: f64) -> f64 {
    if total == 0.0 {
        0.0
    } else {
        (part / total) * 100.0
    }
}

// --- Filters ---

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct SpendFilter {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Case-insensitive substring match against resolved job names.
    pub job_name: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum FilterError {
    #[error("start date must be before or equal to end date")]
    InvertedDateRange,
    #[error("limit must be between 1 and 1000")]
    LimitOutOfRange,
    #[error("offset must be non-negative")]
    NegativeOffset,
}

impl SpendFilter {
    pub const DEFAULT_LIMIT: i64 = 50;
    pub const MAX_LIMIT: i64 = 1000;

    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
            job_name: None,
            limit: Self::DEFAULT_LIMIT,
            offset: 0,
        }
    }

    /// Checked before any statement is sent to the warehouse.
    pub fn validate(&self) -> Result<(), FilterError> {
        if self.start_date > self.end_date {
            return Err(FilterError::InvertedDateRange);
        }
        if self.limit < 1 || self.limit > Self::MAX_LIMIT {
            return Err(FilterError::LimitOutOfRange);
        }
        if self.offset < 0 {
            return Err(FilterError::NegativeOffset);
        }
        Ok(())
    }
}

// --- Spend records ---

/// One raw spend row, enriched with a resolved job name and derived
/// percentage fields. Immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct JobSpend {
    pub cluster_id: String,
    pub compute_cost: f64,
    pub job_id: String,
    pub job_name: Option<String>,
    pub run_id: String,
    pub usage_date: NaiveDate,
    pub platform_cost: f64,
    pub total_cost: f64,
    pub compute_percentage: f64,
    pub platform_percentage: f64,
}

impl JobSpend {
    pub fn new(
        cluster_id: String,
        compute_cost: f64,
        job_id: String,
        run_id: String,
        usage_date: NaiveDate,
        platform_cost: f64,
    ) -> Self {
        let total_cost = compute_cost + platform_cost;
        Self {
            cluster_id,
            compute_cost,
            job_id,
            job_name: None,
            run_id,
            usage_date,
            platform_cost,
            total_cost,
            compute_percentage: percentage(compute_cost, total_cost),
            platform_percentage: percentage(platform_cost, total_cost),
        }
    }

    pub fn with_name(mut self, job_name: String) -> Self {
        self.job_name = Some(job_name);
        self
    }
}

/// Per-run aggregate: cost columns summed over duplicate rows sharing
/// run_id/cluster_id/usage_date.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct JobRun {
    pub run_id: String,
    pub cluster_id: String,
    pub usage_date: NaiveDate,
    pub compute_cost: f64,
    pub platform_cost: f64,
    pub total_cost: f64,
    pub compute_percentage: f64,
    pub platform_percentage: f64,
}

impl JobRun {
    pub fn new(
        run_id: String,
        cluster_id: String,
        usage_date: NaiveDate,
        compute_cost: f64,
        platform_cost: f64,
    ) -> Self {
        let total_cost = compute_cost + platform_cost;
        Self {
            run_id,
            cluster_id,
            usage_date,
            compute_cost,
            platform_cost,
            total_cost,
            compute_percentage: percentage(compute_cost, total_cost),
            platform_percentage: percentage(platform_cost, total_cost),
        }
    }
}

/// A job's aggregated spend across runs in the filter window.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct GroupedJob {
    pub job_id: String,
    pub job_name: Option<String>,
    /// Warehouse-reported row count for this job in the window. Raw rows can
    /// be duplicated per run, so this may exceed both `runs.len()` (runs are
    /// capped for display) and the distinct run_id count.
    pub run_count: i64,
    pub total_compute_cost: f64,
    pub total_platform_cost: f64,
    pub total_cost: f64,
    pub compute_percentage: f64,
    pub platform_percentage: f64,
    pub runs: Vec<JobRun>,
}

impl GroupedJob {
    pub fn new(
        job_id: String,
        job_name: Option<String>,
        run_count: i64,
        total_compute_cost: f64,
        total_platform_cost: f64,
        runs: Vec<JobRun>,
    ) -> Self {
        let total_cost = total_compute_cost + total_platform_cost;
        Self {
            job_id,
            job_name,
            run_count,
            total_compute_cost,
            total_platform_cost,
            total_cost,
            compute_percentage: percentage(total_compute_cost, total_cost),
            platform_percentage: percentage(total_platform_cost, total_cost),
            runs,
        }
    }
}

// --- Summary & drill-down ---

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SummaryMetrics {
    pub total_jobs: i64,
    pub total_spend: f64,
    pub average_cost: f64,
    pub max_cost: f64,
    pub min_cost: f64,
    pub total_compute_cost: f64,
    pub total_platform_cost: f64,
    pub date_range_days: i64,
}

impl SummaryMetrics {
    pub fn empty(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            total_jobs: 0,
            total_spend: 0.0,
            average_cost: 0.0,
            max_cost: 0.0,
            min_cost: 0.0,
            total_compute_cost: 0.0,
            total_platform_cost: 0.0,
            date_range_days: date_range_days(start_date, end_date),
        }
    }
}

/// Inclusive day span of a date range.
pub fn date_range_days(start_date: NaiveDate, end_date: NaiveDate) -> i64 {
    (end_date - start_date).num_days() + 1
}

/// One labeled slice of a cost pie chart.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CostSlice {
    pub name: String,
    pub value: f64,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CostBreakdown {
    pub job_id: String,
    pub run_id: String,
    pub cluster_id: String,
    pub usage_date: NaiveDate,
    pub compute_cost: f64,
    pub platform_cost: f64,
    pub total_cost: f64,
    pub cost_split: Vec<CostSlice>,
}

/// Cluster configuration pulled from the warehouse's compute system table.
/// Everything past the id is best-effort; nulls are expected.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ClusterDetails {
    pub cluster_id: String,
    pub owned_by: Option<String>,
    pub create_time: Option<String>,
    pub driver_node_type: Option<String>,
    pub worker_node_type: Option<String>,
    pub worker_count: Option<i64>,
    pub min_autoscale_workers: Option<i64>,
    pub max_autoscale_workers: Option<i64>,
    pub auto_termination_minutes: Option<i64>,
    pub enable_elastic_disk: Option<bool>,
    pub tags: Option<serde_json::Value>,
    pub cloud_attributes: Option<serde_json::Value>,
    pub runtime_version: Option<String>,
    pub data_security_mode: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn total_is_sum_of_parts() {
        let spend = JobSpend::new(
            "c-1".into(),
            10.0,
            "101".into(),
            "r-1".into(),
            d("2025-01-15"),
            5.0,
        );
        assert_eq!(spend.total_cost, 15.0);
        assert!((spend.compute_percentage - 66.666).abs() < 0.01);
        assert!((spend.platform_percentage - 33.333).abs() < 0.01);
    }

    #[test]
    fn zero_total_yields_zero_percentages() {
        let spend = JobSpend::new(
            "c-1".into(),
            0.0,
            "101".into(),
            "r-1".into(),
            d("2025-01-15"),
            0.0,
        );
        assert_eq!(spend.total_cost, 0.0);
        assert_eq!(spend.compute_percentage, 0.0);
        assert_eq!(spend.platform_percentage, 0.0);

        let run = JobRun::new("r-1".into(), "c-1".into(), d("2025-01-15"), 0.0, 0.0);
        assert_eq!(run.compute_percentage, 0.0);
        assert_eq!(run.platform_percentage, 0.0);

        let grouped = GroupedJob::new("101".into(), None, 0, 0.0, 0.0, vec![]);
        assert_eq!(grouped.compute_percentage, 0.0);
    }

    #[test]
    fn filter_rejects_inverted_range() {
        let mut filter = SpendFilter::new(d("2025-02-01"), d("2025-01-01"));
        assert_eq!(filter.validate(), Err(FilterError::InvertedDateRange));

        filter.end_date = d("2025-02-01");
        assert_eq!(filter.validate(), Ok(()));

        filter.limit = 0;
        assert_eq!(filter.validate(), Err(FilterError::LimitOutOfRange));
        filter.limit = 1001;
        assert_eq!(filter.validate(), Err(FilterError::LimitOutOfRange));

        filter.limit = 50;
        filter.offset = -1;
        assert_eq!(filter.validate(), Err(FilterError::NegativeOffset));
    }

    #[test]
    fn date_range_is_inclusive() {
        assert_eq!(date_range_days(d("2025-01-01"), d("2025-01-01")), 1);
        assert_eq!(date_range_days(d("2025-01-01"), d("2025-01-31")), 31);
    }
}
