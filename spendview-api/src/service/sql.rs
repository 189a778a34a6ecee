//! Statement builders for the warehouse. The executor interface is text-only,
//! so every caller-supplied string MUST pass through [`escape`] before
//! interpolation; dates and numeric bounds are typed and formatted directly.

use chrono::NaiveDate;
use spendview_common::SpendFilter;

/// Duplicate single quotes so a value can sit inside a quoted SQL literal.
/// This is the only injection defense the text-only executor allows.
pub fn escape(value: &str) -> String {
    value.replace('\'', "''")
}

fn date_window(start_date: NaiveDate, end_date: NaiveDate) -> String {
    format!("WHERE usage_date >= '{start_date}' AND usage_date <= '{end_date}'")
}

fn spends_where(filter: &SpendFilter) -> String {
    let mut clause = date_window(filter.start_date, filter.end_date);
    // Flat spend rows carry no resolved names, so the filter matches against
    // the job id column at the warehouse.
    if let Some(job_name) = filter.job_name.as_deref() {
        clause.push_str(&format!(" AND job_id LIKE '%{}%'", escape(job_name)));
    }
    clause
}

pub fn count_spends(table: &str, filter: &SpendFilter) -> String {
    format!(
        r#"
        SELECT COUNT(*) as total_count
        FROM {table}
        {where_clause}
        "#,
        where_clause = spends_where(filter)
    )
}

pub fn select_spends(table: &str, filter: &SpendFilter) -> String {
    format!(
        r#"
        SELECT
            cluster_id,
            compute_cost,
            job_id,
            run_id,
            usage_date,
            platform_cost
        FROM {table}
        {where_clause}
        ORDER BY (compute_cost + platform_cost) DESC
        LIMIT {limit} OFFSET {offset}
        "#,
        where_clause = spends_where(filter),
        limit = filter.limit,
        offset = filter.offset
    )
}

pub fn grouped_spends(
    table: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
    limit: i64,
    offset: i64,
) -> String {
    format!(
        r#"
        SELECT
            job_id,
            COALESCE(SUM(compute_cost), 0) as total_compute_cost,
            COALESCE(SUM(platform_cost), 0) as total_platform_cost,
            COUNT(*) as run_count
        FROM {table}
        {where_clause}
        GROUP BY job_id
        ORDER BY (SUM(compute_cost) + SUM(platform_cost)) DESC
        LIMIT {limit} OFFSET {offset}
        "#,
        where_clause = date_window(start_date, end_date)
    )
}

pub fn count_distinct_jobs(table: &str, start_date: NaiveDate, end_date: NaiveDate) -> String {
    format!(
        r#"
        SELECT COUNT(DISTINCT job_id) as total_count
        FROM {table}
        {where_clause}
        "#,
        where_clause = date_window(start_date, end_date)
    )
}

pub fn job_runs(
    table: &str,
    job_id: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
    limit: i64,
) -> String {
    format!(
        r#"
        SELECT
            run_id,
            cluster_id,
            usage_date,
            COALESCE(SUM(compute_cost), 0) as total_compute_cost,
            COALESCE(SUM(platform_cost), 0) as total_platform_cost
        FROM {table}
        WHERE job_id = '{job_id}'
        AND usage_date >= '{start_date}'
        AND usage_date <= '{end_date}'
        GROUP BY run_id, cluster_id, usage_date
        ORDER BY usage_date DESC, run_id DESC
        LIMIT {limit}
        "#,
        job_id = escape(job_id)
    )
}

pub fn summary(table: &str, start_date: NaiveDate, end_date: NaiveDate) -> String {
    format!(
        r#"
        SELECT
            COUNT(*) as total_jobs,
            COALESCE(SUM(compute_cost + platform_cost), 0) as total_spend,
            COALESCE(AVG(compute_cost + platform_cost), 0) as avg_cost,
            COALESCE(MAX(compute_cost + platform_cost), 0) as max_cost,
            COALESCE(MIN(compute_cost + platform_cost), 0) as min_cost,
            COALESCE(SUM(compute_cost), 0) as total_compute_cost,
            COALESCE(SUM(platform_cost), 0) as total_platform_cost
        FROM {table}
        {where_clause}
        "#,
        where_clause = date_window(start_date, end_date)
    )
}

pub fn breakdown(table: &str, job_id: &str, run_id: &str) -> String {
    // A run can be billed across several raw rows; sum them so the split
    // reflects the run's full cost.
    format!(
        r#"
        SELECT
            job_id,
            run_id,
            cluster_id,
            usage_date,
            COALESCE(SUM(compute_cost), 0) as compute_cost,
            COALESCE(SUM(platform_cost), 0) as platform_cost
        FROM {table}
        WHERE job_id = '{job_id}' AND run_id = '{run_id}'
        GROUP BY job_id, run_id, cluster_id, usage_date
        "#,
        job_id = escape(job_id),
        run_id = escape(run_id)
    )
}

pub fn top_jobs(table: &str, start_date: NaiveDate, end_date: NaiveDate, limit: i64) -> String {
    format!(
        r#"
        SELECT
            cluster_id,
            compute_cost,
            job_id,
            run_id,
            usage_date,
            platform_cost
        FROM {table}
        {where_clause}
        ORDER BY (compute_cost + platform_cost) DESC
        LIMIT {limit}
        "#,
        where_clause = date_window(start_date, end_date)
    )
}

pub fn cluster_details(cluster_id: &str) -> String {
    format!(
        r#"
        SELECT
            cluster_id,
            owned_by,
            create_time,
            driver_node_type,
            worker_node_type,
            worker_count,
            min_autoscale_workers,
            max_autoscale_workers,
            auto_termination_minutes,
            enable_elastic_disk,
            tags,
            aws_attributes,
            dbr_version,
            data_security_mode
        FROM system.compute.clusters
        WHERE cluster_id = '{cluster_id}'
        LIMIT 1
        "#,
        cluster_id = escape(cluster_id)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn escape_duplicates_single_quotes() {
        assert_eq!(escape("O'Brien's ETL"), "O''Brien''s ETL");
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape("'; DROP TABLE x; --"), "''; DROP TABLE x; --");
    }

    #[test]
    fn spends_filter_is_escaped_before_interpolation() {
        let mut filter = SpendFilter::new(d("2025-01-01"), d("2025-01-31"));
        filter.job_name = Some("night'ly".to_string());
        let stmt = select_spends("t.spends", &filter);
        assert!(stmt.contains("LIKE '%night''ly%'"));
        assert!(!stmt.contains("night'ly"));
    }

    #[test]
    fn date_window_bounds_are_inclusive() {
        let stmt = count_spends(
            "t.spends",
            &SpendFilter::new(d("2025-01-01"), d("2025-01-31")),
        );
        assert!(stmt.contains("usage_date >= '2025-01-01'"));
        assert!(stmt.contains("usage_date <= '2025-01-31'"));
    }

    #[test]
    fn grouped_statement_orders_by_combined_cost() {
        let stmt = grouped_spends("t.spends", d("2025-01-01"), d("2025-01-31"), 150, 0);
        assert!(stmt.contains("GROUP BY job_id"));
        assert!(stmt.contains("ORDER BY (SUM(compute_cost) + SUM(platform_cost)) DESC"));
        assert!(stmt.contains("LIMIT 150 OFFSET 0"));
    }

    #[test]
    fn run_statement_escapes_job_id() {
        let stmt = job_runs("t.spends", "12'34", d("2025-01-01"), d("2025-01-31"), 10);
        assert!(stmt.contains("WHERE job_id = '12''34'"));
        assert!(stmt.contains("GROUP BY run_id, cluster_id, usage_date"));
        assert!(stmt.contains("ORDER BY usage_date DESC, run_id DESC"));
    }

    #[test]
    fn breakdown_statement_sums_duplicate_billing_rows() {
        let stmt = breakdown("t.spends", "101", "r-1");
        assert!(stmt.contains("COALESCE(SUM(compute_cost), 0) as compute_cost"));
        assert!(stmt.contains("COALESCE(SUM(platform_cost), 0) as platform_cost"));
        assert!(stmt.contains("GROUP BY job_id, run_id, cluster_id, usage_date"));
    }
}
