use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::app::AppState;
use crate::error::ApiError;
use spendview_common::{
    ClusterDetails, CostBreakdown, GroupedJob, JobSpend, Page, SpendFilter, SummaryMetrics,
};

pub fn create_dashboard_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/job-spends", get(get_job_spends))
        .route("/api/grouped-job-spends", get(get_grouped_job_spends))
        .route("/api/summary", get(get_summary_metrics))
        .route("/api/job/{job_id}/breakdown", get(get_job_cost_breakdown))
        .route("/api/top-jobs", get(get_top_jobs))
        .route("/api/cluster/{cluster_id}/details", get(get_cluster_details))
        .route("/api/date-presets", get(get_date_presets))
        .route("/api/databricks-host", get(get_databricks_host))
        .route("/api/health", get(dashboard_health))
}

// --- Query params ---

#[derive(Deserialize, utoipa::IntoParams)]
pub struct SpendQuery {
    /// Start date for filtering (YYYY-MM-DD)
    pub start_date: NaiveDate,
    /// End date for filtering (YYYY-MM-DD)
    pub end_date: NaiveDate,
    /// Optional job name filter
    pub job_name: Option<String>,
    /// Page number (1-based)
    pub page: Option<i64>,
    /// Items per page
    pub per_page: Option<i64>,
}

impl SpendQuery {
    /// Page/per_page become a validated offset filter; bad bounds are a 400
    /// before any warehouse call.
    fn into_filter(self) -> Result<SpendFilter, ApiError> {
        let page = self.page.unwrap_or(1);
        if page < 1 {
            return Err(ApiError::Validation("page must be at least 1".to_string()));
        }
        let per_page = self.per_page.unwrap_or(SpendFilter::DEFAULT_LIMIT);
        let filter = SpendFilter {
            start_date: self.start_date,
            end_date: self.end_date,
            job_name: self.job_name.filter(|name| !name.trim().is_empty()),
            limit: per_page,
            offset: (page - 1) * per_page.max(1),
        };
        filter.validate()?;
        Ok(filter)
    }
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct DateRangeQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct TopJobsQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub limit: Option<i64>,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct BreakdownQuery {
    /// Run ID for the specific job execution
    pub run_id: String,
}

// --- Handlers ---

/// Paginated spend rows for the date range, sorted by total cost descending.
#[utoipa::path(
    get,
    path = "/api/job-spends",
    tag = "Dashboard",
    params(SpendQuery),
    responses(
        (status = 200, description = "Paginated job spending data", body = Page<JobSpend>),
        (status = 400, description = "Invalid date range or pagination params")
    )
)]
pub async fn get_job_spends(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SpendQuery>,
) -> Result<Json<Page<JobSpend>>, ApiError> {
    let filter = params.into_filter()?;
    let page = state.service.get_spends(&filter).await?;
    Ok(Json(page))
}

/// Jobs with aggregated costs across runs and per-run drill-down details.
#[utoipa::path(
    get,
    path = "/api/grouped-job-spends",
    tag = "Dashboard",
    params(SpendQuery),
    responses(
        (status = 200, description = "Paginated grouped job spending data", body = Page<GroupedJob>),
        (status = 400, description = "Invalid date range or pagination params")
    )
)]
pub async fn get_grouped_job_spends(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SpendQuery>,
) -> Result<Json<Page<GroupedJob>>, ApiError> {
    let filter = params.into_filter()?;
    let page = state.service.get_grouped(&filter).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/summary",
    tag = "Dashboard",
    params(DateRangeQuery),
    responses(
        (status = 200, description = "Summary metrics for the date range", body = SummaryMetrics),
        (status = 400, description = "Invalid date range")
    )
)]
pub async fn get_summary_metrics(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DateRangeQuery>,
) -> Result<Json<SummaryMetrics>, ApiError> {
    let metrics = state
        .service
        .get_summary(params.start_date, params.end_date)
        .await?;
    Ok(Json(metrics))
}

/// Compute vs platform cost split for one run, for drill-down pie charts.
#[utoipa::path(
    get,
    path = "/api/job/{job_id}/breakdown",
    tag = "Dashboard",
    params(
        ("job_id" = String, Path, description = "Job identifier"),
        BreakdownQuery
    ),
    responses(
        (status = 200, description = "Cost breakdown for the run", body = CostBreakdown),
        (status = 404, description = "No row for this job/run pair")
    )
)]
pub async fn get_job_cost_breakdown(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<String>,
    Query(params): Query<BreakdownQuery>,
) -> Result<Json<CostBreakdown>, ApiError> {
    let breakdown = state
        .service
        .get_breakdown(&job_id, &params.run_id)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!(
                "No cost breakdown found for job_id: {job_id}, run_id: {}",
                params.run_id
            ))
        })?;
    Ok(Json(breakdown))
}

#[utoipa::path(
    get,
    path = "/api/top-jobs",
    tag = "Dashboard",
    params(TopJobsQuery),
    responses(
        (status = 200, description = "Most expensive jobs in the range", body = Vec<JobSpend>),
        (status = 400, description = "Invalid date range or limit")
    )
)]
pub async fn get_top_jobs(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TopJobsQuery>,
) -> Result<Json<Vec<JobSpend>>, ApiError> {
    let limit = params.limit.unwrap_or(5);
    if !(1..=20).contains(&limit) {
        return Err(ApiError::Validation(
            "limit must be between 1 and 20".to_string(),
        ));
    }
    let jobs = state
        .service
        .get_top(params.start_date, params.end_date, limit)
        .await?;
    Ok(Json(jobs))
}

#[utoipa::path(
    get,
    path = "/api/cluster/{cluster_id}/details",
    tag = "Dashboard",
    params(("cluster_id" = String, Path, description = "Cluster identifier")),
    responses(
        (status = 200, description = "Cluster configuration", body = ClusterDetails),
        (status = 404, description = "Cluster not found")
    )
)]
pub async fn get_cluster_details(
    State(state): State<Arc<AppState>>,
    Path(cluster_id): Path<String>,
) -> Result<Json<ClusterDetails>, ApiError> {
    state
        .service
        .get_cluster_details(&cluster_id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("No details found for cluster: {cluster_id}")))
}

/// Common date range presets for the dashboard's range picker.
#[utoipa::path(
    get,
    path = "/api/date-presets",
    tag = "Dashboard",
    responses((status = 200, description = "Named date range presets"))
)]
pub async fn get_date_presets() -> Json<Value> {
    Json(date_presets(chrono::Local::now().date_naive()))
}

fn preset(label: &str, start_date: NaiveDate, end_date: NaiveDate) -> Value {
    json!({ "label": label, "start_date": start_date, "end_date": end_date })
}

fn date_presets(today: NaiveDate) -> Value {
    let days = chrono::Days::new;
    let weekday = u64::from(today.weekday().num_days_from_monday());
    let week_start = today - days(weekday);
    json!({
        "today": preset("Today", today, today),
        "yesterday": preset("Yesterday", today - days(1), today - days(1)),
        "this_week": preset("This Week", week_start, today),
        "last_week": preset("Last Week", today - days(weekday + 7), today - days(weekday + 1)),
        "this_month": preset("This Month", today.with_day(1).unwrap_or(today), today),
        "last_7_days": preset("Last 7 Days", today - days(7), today),
        "last_30_days": preset("Last 30 Days", today - days(30), today),
        "last_90_days": preset("Last 90 Days", today - days(90), today),
    })
}

/// Workspace URL so the frontend can link job and run IDs back to Databricks.
#[utoipa::path(
    get,
    path = "/api/databricks-host",
    tag = "Dashboard",
    responses((status = 200, description = "Configured Databricks workspace URL"))
)]
pub async fn get_databricks_host(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({ "databricks_host": state.databricks_host }))
}

#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Dashboard",
    responses((status = 200, description = "Service is up"))
)]
pub async fn dashboard_health() -> Json<Value> {
    Json(json!({ "status": "healthy", "service": "dashboard" }))
}
