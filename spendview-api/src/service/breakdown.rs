use chrono::NaiveDate;
use spendview_common::platform::{COMPUTE_SLICE_COLOR, PLATFORM_COST_LABEL, PLATFORM_SLICE_COLOR};
use spendview_common::{CloudPlatform, CostBreakdown, CostSlice};

/// Two-slice chart split for a single run's costs. The compute label follows
/// the configured cloud platform; the platform-cost label is fixed.
pub fn cost_split(platform: CloudPlatform, compute_cost: f64, platform_cost: f64) -> Vec<CostSlice> {
    vec![
        CostSlice {
            name: platform.compute_display_name(),
            value: compute_cost,
            color: COMPUTE_SLICE_COLOR.to_string(),
        },
        CostSlice {
            name: PLATFORM_COST_LABEL.to_string(),
            value: platform_cost,
            color: PLATFORM_SLICE_COLOR.to_string(),
        },
    ]
}

#[allow(clippy::too_many_arguments)]
pub fn assemble(
    platform: CloudPlatform,
    job_id: String,
    run_id: String,
    cluster_id: String,
    usage_date: NaiveDate,
    compute_cost: f64,
    platform_cost: f64,
) -> CostBreakdown {
    CostBreakdown {
        cost_split: cost_split(platform, compute_cost, platform_cost),
        job_id,
        run_id,
        cluster_id,
        usage_date,
        compute_cost,
        platform_cost,
        total_cost: compute_cost + platform_cost,
    }
}
