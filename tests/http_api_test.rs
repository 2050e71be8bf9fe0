mod common;

use axum::http::StatusCode;
use cmms_analytics::{build_router, AppState};
use common::{get_json, plant, service, FlakySource};

fn router() -> axum::Router {
    build_router(AppState::new(service(plant().snapshot)))
}

#[tokio::test]
async fn kpi_endpoint_wraps_result_in_envelope() {
    let (status, body) = get_json(router(), "/api/v1/analytics/kpis").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["backlog"], 2);
    assert_eq!(body["data"]["mtbf_hours"], 464);
    assert!(body["meta"]["timestamp"].is_string());
}

#[tokio::test]
async fn every_dashboard_route_answers() {
    for path in [
        "/api/v1/analytics/dashboard",
        "/api/v1/analytics/kpis",
        "/api/v1/analytics/work-orders",
        "/api/v1/analytics/assets",
        "/api/v1/analytics/inventory",
        "/api/v1/analytics/costs",
        "/api/v1/analytics/technicians",
    ] {
        let (status, body) = get_json(router(), path).await;
        assert_eq!(status, StatusCode::OK, "{path}");
        assert_eq!(body["success"], true, "{path}");
        assert!(body["data"]["degraded_sections"].is_array(), "{path}");
    }
}

#[tokio::test]
async fn query_window_is_applied() {
    let (status, body) = get_json(
        router(),
        "/api/v1/analytics/work-orders?start_date=2024-06-23T12:00:00Z&end_date=2024-06-30T12:00:00Z",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 3);
}

#[tokio::test]
async fn inverted_window_is_rejected() {
    let (status, body) = get_json(
        router(),
        "/api/v1/analytics/costs?start_date=2024-06-30T00:00:00Z&end_date=2024-06-01T00:00:00Z",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad Request");
    assert!(body["message"].as_str().unwrap().contains("start_date"));
}

#[tokio::test]
async fn degraded_sections_are_reported_not_failed() {
    let source = FlakySource::new(plant().snapshot).failing("users");
    let router = build_router(AppState::new(service(source)));
    let (status, body) = get_json(router, "/api/v1/analytics/dashboard").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["degraded_sections"], serde_json::json!(["users"]));
    assert_eq!(body["data"]["users"]["total"], 0);
    assert_eq!(body["data"]["work_orders"]["total"], 6);
}

#[tokio::test]
async fn health_reports_without_database() {
    let (status, body) = get_json(router(), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "healthy");
    assert_eq!(body["data"]["checks"]["database"], "not_configured");
}
