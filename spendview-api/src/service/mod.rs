pub mod breakdown;
pub mod names;
pub mod rows;
pub mod sql;

use crate::error::ApiError;
use chrono::NaiveDate;
use names::NameResolver;
use spendview_common::{
    CloudPlatform, ClusterDetails, CostBreakdown, GroupedJob, JobRun, JobSpend, Page, PageInfo,
    SpendFilter, SummaryMetrics,
};
use spendview_warehouse::{JobMetadata, StatementExecutor};
use std::sync::Arc;

/// Runs shown per grouped job; the warehouse-reported `run_count` is not
/// capped.
const RUNS_PER_JOB: i64 = 10;

/// When a name filter is active the grouped query over-fetches this many
/// pages from offset 0, because warehouse-side limiting cannot see resolved
/// names. Matching jobs beyond the over-fetch window are missed; this is a
/// documented precision/cost trade-off, not a recall guarantee.
const NAME_FILTER_OVERFETCH: i64 = 3;

/// Spend reporting service: maps warehouse rows to typed records, aggregates
/// per-job spend, enriches with resolved job names, and paginates. One
/// instance owns one name cache and is shared across requests.
pub struct SpendService {
    executor: Arc<dyn StatementExecutor>,
    names: NameResolver,
    table: String,
    platform: CloudPlatform,
}

impl SpendService {
    pub fn new(
        executor: Arc<dyn StatementExecutor>,
        jobs: Arc<dyn JobMetadata>,
        table: String,
        platform: CloudPlatform,
    ) -> Self {
        Self {
            executor,
            names: NameResolver::new(jobs),
            table,
            platform,
        }
    }

    /// Flat per-row spend listing, name-enriched, ordered by combined cost
    /// descending. The name filter is pushed down to the warehouse for this
    /// endpoint, so the count and the page agree by construction.
    pub async fn get_spends(&self, filter: &SpendFilter) -> Result<Page<JobSpend>, ApiError> {
        filter.validate()?;

        let count_rows = self
            .executor
            .execute(&sql::count_spends(&self.table, filter))
            .await?;
        let total_count = rows::scalar_count(&count_rows)?;

        let data_rows = self
            .executor
            .execute(&sql::select_spends(&self.table, filter))
            .await?;
        let mut spends = Vec::with_capacity(data_rows.len());
        for row in &data_rows {
            let spend = rows::spend(row)?;
            let name = self.names.resolve(&spend.job_id).await;
            spends.push(spend.with_name(name));
        }

        let info = PageInfo::compute(total_count, filter.limit, filter.offset)?;
        Ok(Page::new(spends, info))
    }

    /// Per-job aggregation with nested run details.
    ///
    /// Groups are fetched ordered by combined cost descending. With a name
    /// filter the query over-fetches (see [`NAME_FILTER_OVERFETCH`]) from
    /// offset 0, names are resolved, non-matching groups are discarded
    /// post-fetch, and `total_count` plus the visible slice come from the
    /// surviving in-memory collection. Without a filter, the page is exactly
    /// the fetched window and `total_count` is a distinct-job count query.
    pub async fn get_grouped(&self, filter: &SpendFilter) -> Result<Page<GroupedJob>, ApiError> {
        filter.validate()?;

        let (fetch_limit, fetch_offset) = if filter.job_name.is_some() {
            (filter.limit * NAME_FILTER_OVERFETCH, 0)
        } else {
            (filter.limit, filter.offset)
        };
        let group_rows = self
            .executor
            .execute(&sql::grouped_spends(
                &self.table,
                filter.start_date,
                filter.end_date,
                fetch_limit,
                fetch_offset,
            ))
            .await?;

        let needle = filter.job_name.as_deref().map(str::to_lowercase);
        let mut surviving = Vec::new();
        for row in &group_rows {
            let group = rows::group(row)?;
            let job_name = self.names.resolve(&group.job_id).await;
            if let Some(needle) = &needle {
                if !job_name.to_lowercase().contains(needle) {
                    continue;
                }
            }
            let runs = self
                .get_runs(&group.job_id, filter.start_date, filter.end_date, RUNS_PER_JOB)
                .await?;
            // Descending-cost order from the grouped query carries through;
            // filtering never re-sorts.
            surviving.push(GroupedJob::new(
                group.job_id,
                Some(job_name),
                group.run_count,
                group.total_compute_cost,
                group.total_platform_cost,
                runs,
            ));
        }

        let (total_count, data) = if filter.job_name.is_some() {
            let total_count = surviving.len() as i64;
            let start = (filter.offset as usize).min(surviving.len());
            let end = ((filter.offset + filter.limit) as usize).min(surviving.len());
            (total_count, surviving[start..end].to_vec())
        } else {
            let count_rows = self
                .executor
                .execute(&sql::count_distinct_jobs(
                    &self.table,
                    filter.start_date,
                    filter.end_date,
                ))
                .await?;
            (rows::scalar_count(&count_rows)?, surviving)
        };

        let info = PageInfo::compute(total_count, filter.limit, filter.offset)?;
        Ok(Page::new(data, info))
    }

    /// Up to `limit` per-run aggregates for one job, newest first.
    pub async fn get_runs(
        &self,
        job_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        limit: i64,
    ) -> Result<Vec<JobRun>, ApiError> {
        let run_rows = self
            .executor
            .execute(&sql::job_runs(&self.table, job_id, start_date, end_date, limit))
            .await?;
        run_rows.iter().map(rows::run).collect()
    }

    pub async fn get_summary(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<SummaryMetrics, ApiError> {
        if start_date > end_date {
            return Err(ApiError::Validation(
                "start date must be before or equal to end date".to_string(),
            ));
        }
        let result = self
            .executor
            .execute(&sql::summary(&self.table, start_date, end_date))
            .await?;
        match result.first() {
            Some(row) => rows::summary(row, start_date, end_date),
            None => Ok(SummaryMetrics::empty(start_date, end_date)),
        }
    }

    /// Cost breakdown for one run, or `None` when no row matches.
    pub async fn get_breakdown(
        &self,
        job_id: &str,
        run_id: &str,
    ) -> Result<Option<CostBreakdown>, ApiError> {
        let result = self
            .executor
            .execute(&sql::breakdown(&self.table, job_id, run_id))
            .await?;
        let Some(row) = result.first() else {
            return Ok(None);
        };
        let row = rows::breakdown(row)?;
        Ok(Some(breakdown::assemble(
            self.platform,
            row.job_id,
            row.run_id,
            row.cluster_id,
            row.usage_date,
            row.compute_cost,
            row.platform_cost,
        )))
    }

    /// Top `limit` most expensive spend rows in the window, name-enriched.
    pub async fn get_top(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
        limit: i64,
    ) -> Result<Vec<JobSpend>, ApiError> {
        if start_date > end_date {
            return Err(ApiError::Validation(
                "start date must be before or equal to end date".to_string(),
            ));
        }
        let result = self
            .executor
            .execute(&sql::top_jobs(&self.table, start_date, end_date, limit))
            .await?;
        let mut spends = Vec::with_capacity(result.len());
        for row in &result {
            let spend = rows::spend(row)?;
            let name = self.names.resolve(&spend.job_id).await;
            spends.push(spend.with_name(name));
        }
        Ok(spends)
    }

    /// Cluster configuration for drill-down views. Lookup failures degrade to
    /// `None` with a logged warning instead of failing the request.
    pub async fn get_cluster_details(&self, cluster_id: &str) -> Option<ClusterDetails> {
        let result = match self.executor.execute(&sql::cluster_details(cluster_id)).await {
            Ok(rows) => rows,
            Err(err) => {
                tracing::warn!("cluster details query failed for {cluster_id}: {err}");
                return None;
            }
        };
        let row = result.first()?;
        match rows::cluster(row) {
            Ok(details) => Some(details),
            Err(err) => {
                tracing::warn!("cluster details row malformed for {cluster_id}: {err}");
                None
            }
        }
    }
}
