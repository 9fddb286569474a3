//! HTTP client tests against a mock ATEMS backend

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

mod common;

use atems_core::{
    CheckAction, CheckInOutRequest, Condition, Error, ScanState, Stats, Tone, config::ApiConfig,
};
use atems_station::{ApiClient, ScanStation};
use common::*;
use pretty_assertions::assert_eq;
use std::time::Duration;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_string_contains, header, method, path, query_param},
};

fn request() -> CheckInOutRequest {
    CheckInOutRequest {
        username: "jdoe".to_string(),
        badge_id: "B-1001".to_string(),
        tool_id_number: "CONS-HAM-001".to_string(),
        job_id: Some("JOB-42".to_string()),
        condition: Some(Condition::Good),
    }
}

#[tokio::test]
async fn test_get_stats() {
    init_test_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "total_tools": 120,
            "checked_out": 20,
            "in_stock": 100,
            "calibrated_tools": 15,
            "calibration_overdue": 3,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let stats = client_for(&server).get_stats().await.unwrap();

    assert_eq!(
        stats,
        Stats {
            total_tools: 120,
            checked_out: 20,
            in_stock: 100,
            calibrated_tools: 15,
            calibration_overdue: 3,
        }
    );
}

#[tokio::test]
async fn test_unauthorized_carries_login_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/stats"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let error = client_for(&server).get_stats().await.unwrap_err();

    assert_eq!(error.login_url(), Some("/login?next=%2Fapi%2Fstats"));
}

#[tokio::test]
async fn test_redirect_to_login_is_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/history"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("Location", "/login?next=%2Fapi%2Fhistory"),
        )
        .mount(&server)
        .await;

    let error = client_for(&server).get_history(10).await.unwrap_err();

    assert!(error.is_unauthorized());
}

#[tokio::test]
async fn test_history_limit_is_clamped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/history"))
        .and(query_param("limit", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "events": [{
                "event_time": "2024-03-15T14:25:00",
                "action": "checkout",
                "tool_id_number": "CONS-HAM-001",
                "tool_name": "Claw Hammer",
                "username": "jdoe",
                "job_id": null,
                "condition": "Good",
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = client_for(&server).get_history(500).await.unwrap();

    assert_eq!(page.events.len(), 1);
    assert_eq!(page.events[0].tool_label(), "Claw Hammer");
    assert_eq!(page.events[0].time_label(), "2024-03-15 14:25");
}

#[tokio::test]
async fn test_lookup_user() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/user-by-badge"))
        .and(query_param("badge_id", "B-1001"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"username": "jdoe"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/user-by-badge"))
        .and(query_param("badge_id", "B-9999"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"username": null})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);

    assert_eq!(
        client.lookup_user("B-1001").await.unwrap().as_deref(),
        Some("jdoe")
    );
    assert_eq!(client.lookup_user("B-9999").await.unwrap(), None);
}

#[tokio::test]
async fn test_check_in_out_posts_form() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/checkinout"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("username=jdoe"))
        .and(body_string_contains("badge_id=B-1001"))
        .and(body_string_contains("tool_id_number=CONS-HAM-001"))
        .and(body_string_contains("job_id=JOB-42"))
        .and(body_string_contains("condition=Good"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body(
            "Tool CONS-HAM-001 checked out to jdoe.",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server).check_in_out(&request()).await.unwrap();

    assert!(response.is_success());
    assert_eq!(response.action, Some(CheckAction::Checkout));
}

#[tokio::test]
async fn test_validation_failure_is_a_business_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/checkinout"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "status": "error",
            "message": "Please fix the form errors.",
            "errors": {"badge_id": ["This field is required."]},
        })))
        .mount(&server)
        .await;

    let response = client_for(&server).check_in_out(&request()).await.unwrap();

    assert!(!response.is_success());
    assert_eq!(response.message.as_deref(), Some("Please fix the form errors."));
    assert_eq!(response.errors.unwrap()["badge_id"].len(), 1);
}

#[tokio::test]
async fn test_server_error_without_body_is_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/checkinout"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<h1>Internal Server Error</h1>"))
        .mount(&server)
        .await;

    let error = client_for(&server).check_in_out(&request()).await.unwrap_err();

    assert!(matches!(error, Error::Http { status: 500, .. }));
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() {
    let client = ApiClient::new(&ApiConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        request_timeout_secs: 1,
    })
    .unwrap();

    let error = client.get_stats().await.unwrap_err();

    assert!(matches!(error, Error::Transport(_)));
}

#[tokio::test]
async fn test_login() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_string_contains("username=admin"))
        .and(body_string_contains("password=secret"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/dashboard"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_string_contains("password=wrong"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<form>login</form>"))
        .mount(&server)
        .await;

    let client = client_for(&server);

    assert!(client.login("admin", "secret").await.is_ok());
    let error = client.login("admin", "wrong").await.unwrap_err();
    assert!(matches!(error, Error::Validation { .. }));
}

#[tokio::test]
async fn test_health() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "healthy",
            "service": "ATEMS",
        })))
        .mount(&server)
        .await;

    let health = client_for(&server).health().await.unwrap();

    assert!(health.is_healthy());
    assert_eq!(health.service.as_deref(), Some("ATEMS"));
}

#[tokio::test]
async fn test_station_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/user-by-badge"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"username": "jdoe"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/checkinout"))
        .and(body_string_contains("username=jdoe"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body(
            "Tool CONS-HAM-001 checked out to jdoe.",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let mut station = ScanStation::with_delay(client_for(&server), Duration::from_millis(500));

    station.handle_scan("CONS-HAM-001").await.unwrap();
    let report = station.handle_scan("B-1001").await.unwrap();

    let notice = report.submission.unwrap();
    assert_eq!(notice.tone, Tone::Success);
    assert_eq!(notice.text, "Tool CONS-HAM-001 checked out to jdoe.");
    assert_eq!(station.session().state(), ScanState::Empty);
}
