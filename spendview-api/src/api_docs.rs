use crate::routes::dashboard;
use spendview_common::{
    ClusterDetails, CostBreakdown, CostSlice, GroupedJob, JobRun, JobSpend, Page, SummaryMetrics,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        dashboard::get_job_spends,
        dashboard::get_grouped_job_spends,
        dashboard::get_summary_metrics,
        dashboard::get_job_cost_breakdown,
        dashboard::get_top_jobs,
        dashboard::get_cluster_details,
        dashboard::get_date_presets,
        dashboard::get_databricks_host,
        dashboard::dashboard_health
    ),
    components(
        schemas(
            Page<JobSpend>,
            Page<GroupedJob>,
            JobSpend,
            JobRun,
            GroupedJob,
            SummaryMetrics,
            CostBreakdown,
            CostSlice,
            ClusterDetails
        )
    ),
    tags(
        (name = "Dashboard", description = "Job spend reporting endpoints")
    )
)]
pub struct ApiDoc;
