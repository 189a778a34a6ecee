// Integration tests for the dashboard endpoints, backed by mock collaborators.

mod common;

use axum_test::TestServer;
use common::create_test_app;
use serde_json::Value;
use spendview_warehouse::mock::row;

#[tokio::test]
async fn health_endpoint() {
    let (app, _ctx) = create_test_app();
    let server = TestServer::new(app).unwrap();

    let response = server.get("/api/health").await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "dashboard");
}

#[tokio::test]
async fn databricks_host_endpoint_exposes_configured_workspace() {
    let (app, _ctx) = create_test_app();
    let server = TestServer::new(app).unwrap();

    let response = server.get("/api/databricks-host").await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["databricks_host"], "https://test.cloud.databricks.com");
}

#[tokio::test]
async fn job_spends_returns_paginated_envelope() {
    let (app, ctx) = create_test_app();
    let server = TestServer::new(app).unwrap();

    ctx.warehouse.push_rows(vec![row(&["2"])]);
    ctx.warehouse.push_rows(vec![
        row(&["c-1", "90", "1", "r-1", "2025-01-05", "10"]),
        row(&["c-2", "40", "2", "r-2", "2025-01-06", "5"]),
    ]);
    ctx.jobs.insert_name("1", "Nightly ETL");

    let response = server
        .get("/api/job-spends")
        .add_query_param("start_date", "2025-01-01")
        .add_query_param("end_date", "2025-01-31")
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["total_count"], 2);
    assert_eq!(body["page"], 1);
    assert_eq!(body["per_page"], 50);
    assert_eq!(body["total_pages"], 1);
    assert_eq!(body["has_next"], false);
    assert_eq!(body["has_previous"], false);
    assert_eq!(body["data"][0]["job_name"], "Nightly ETL");
    assert_eq!(body["data"][0]["total_cost"], 100.0);
    assert_eq!(body["data"][1]["job_name"], "Job 2");
}

#[tokio::test]
async fn job_spends_rejects_inverted_date_range() {
    let (app, ctx) = create_test_app();
    let server = TestServer::new(app).unwrap();

    let response = server
        .get("/api/job-spends")
        .add_query_param("start_date", "2025-02-01")
        .add_query_param("end_date", "2025-01-01")
        .await;
    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert!(body["detail"].as_str().unwrap().contains("start date"));
    // Rejected before any warehouse call.
    assert!(ctx.warehouse.executed().is_empty());
}

#[tokio::test]
async fn grouped_job_spends_with_name_filter() {
    let (app, ctx) = create_test_app();
    let server = TestServer::new(app).unwrap();

    ctx.jobs.insert_name("1", "Nightly ETL");
    ctx.jobs.insert_name("2", "Hourly Sync");
    ctx.warehouse.push_rows(vec![
        row(&["1", "50", "10", "3"]),
        row(&["2", "40", "5", "1"]),
    ]);
    ctx.warehouse
        .push_rows(vec![row(&["r-1", "c-1", "2025-01-05", "50", "10"])]);

    let response = server
        .get("/api/grouped-job-spends")
        .add_query_param("start_date", "2025-01-01")
        .add_query_param("end_date", "2025-01-31")
        .add_query_param("job_name", "nightly")
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["total_count"], 1);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    let job = &body["data"][0];
    assert_eq!(job["job_name"], "Nightly ETL");
    assert_eq!(job["run_count"], 3);
    assert_eq!(job["total_cost"], 60.0);
    assert_eq!(job["runs"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn grouped_job_spends_empty_window() {
    let (app, _ctx) = create_test_app();
    let server = TestServer::new(app).unwrap();

    let response = server
        .get("/api/grouped-job-spends")
        .add_query_param("start_date", "2025-01-01")
        .add_query_param("end_date", "2025-01-31")
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["total_count"], 0);
    assert_eq!(body["total_pages"], 0);
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn summary_degrades_to_zeroed_metrics() {
    let (app, _ctx) = create_test_app();
    let server = TestServer::new(app).unwrap();

    let response = server
        .get("/api/summary")
        .add_query_param("start_date", "2025-01-01")
        .add_query_param("end_date", "2025-01-31")
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["total_jobs"], 0);
    assert_eq!(body["total_spend"], 0.0);
    assert_eq!(body["date_range_days"], 31);
}

#[tokio::test]
async fn breakdown_found_and_missing() {
    let (app, ctx) = create_test_app();
    let server = TestServer::new(app).unwrap();

    ctx.warehouse
        .push_rows(vec![row(&["7", "r-1", "c-1", "2025-01-03", "9", "1"])]);

    let response = server
        .get("/api/job/7/breakdown")
        .add_query_param("run_id", "r-1")
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["total_cost"], 10.0);
    assert_eq!(body["cost_split"][0]["name"], "EC2 Cost");
    assert_eq!(body["cost_split"][1]["name"], "Databricks Cost");

    // Queue exhausted: the warehouse has no row for the next pair.
    let response = server
        .get("/api/job/7/breakdown")
        .add_query_param("run_id", "r-404")
        .await;
    assert_eq!(response.status_code(), 404);
    let body: Value = response.json();
    assert!(body["detail"].as_str().unwrap().contains("r-404"));
}

#[tokio::test]
async fn top_jobs_validates_limit() {
    let (app, ctx) = create_test_app();
    let server = TestServer::new(app).unwrap();

    let response = server
        .get("/api/top-jobs")
        .add_query_param("start_date", "2025-01-01")
        .add_query_param("end_date", "2025-01-31")
        .add_query_param("limit", "50")
        .await;
    assert_eq!(response.status_code(), 400);
    assert!(ctx.warehouse.executed().is_empty());
}

#[tokio::test]
async fn top_jobs_returns_name_enriched_rows() {
    let (app, ctx) = create_test_app();
    let server = TestServer::new(app).unwrap();

    ctx.jobs.insert_name("1", "Big Job");
    ctx.warehouse.push_rows(vec![
        row(&["c-1", "90", "1", "r-1", "2025-01-03", "10"]),
    ]);

    let response = server
        .get("/api/top-jobs")
        .add_query_param("start_date", "2025-01-01")
        .add_query_param("end_date", "2025-01-31")
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["job_name"], "Big Job");
}

#[tokio::test]
async fn warehouse_failure_is_a_generic_500() {
    let (app, ctx) = create_test_app();
    let server = TestServer::new(app).unwrap();
    ctx.warehouse.fail_from_now_on();

    let response = server
        .get("/api/summary")
        .add_query_param("start_date", "2025-01-01")
        .add_query_param("end_date", "2025-01-31")
        .await;
    assert_eq!(response.status_code(), 500);
    let body: Value = response.json();
    // Internal failure details never leak to the caller.
    assert_eq!(body["detail"], "Error retrieving job spending data");
}

#[tokio::test]
async fn cluster_details_found_and_missing() {
    let (app, ctx) = create_test_app();
    let server = TestServer::new(app).unwrap();

    ctx.warehouse.push_rows(vec![row(&[
        "c-1", "owner@x", "2025-01-01T00:00:00Z", "m5.xlarge", "m5.large", "4", "2", "8", "30",
        "true", "{}", "{}", "14.3.x", "SINGLE_USER",
    ])]);

    let response = server.get("/api/cluster/c-1/details").await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["cluster_id"], "c-1");
    assert_eq!(body["worker_count"], 4);

    let response = server.get("/api/cluster/c-404/details").await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn date_presets_exposes_named_ranges() {
    let (app, _ctx) = create_test_app();
    let server = TestServer::new(app).unwrap();

    let response = server.get("/api/date-presets").await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    for key in [
        "today",
        "yesterday",
        "this_week",
        "last_week",
        "this_month",
        "last_7_days",
        "last_30_days",
        "last_90_days",
    ] {
        assert!(body[key]["label"].is_string(), "missing preset {key}");
        assert!(body[key]["start_date"].is_string());
        assert!(body[key]["end_date"].is_string());
    }
}
