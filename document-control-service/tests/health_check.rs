mod common;

use common::TestApp;
use document_control_service::services::init_metrics;

#[tokio::test]
async fn health_check_works() {
    let app = TestApp::spawn().await;

    let response = app.get("/health").await;

    assert!(response.status().is_success());
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(
        response.headers()["x-content-type-options"],
        "nosniff"
    );

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "document-control-service");
    assert_eq!(body["documents"], 3);
}

#[tokio::test]
async fn request_id_is_propagated() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(format!("{}/health", app.address))
        .header("x-request-id", "trace-me")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.headers()["x-request-id"], "trace-me");
}

#[tokio::test]
async fn metrics_endpoint_returns_prometheus_format() {
    init_metrics();
    let app = TestApp::spawn().await;
    app.get("/documents").await;

    let response = app.get("/metrics").await;

    assert!(response.status().is_success());
    let body = response.text().await.expect("Failed to read body");
    assert!(body.contains("http_requests_total"));
}

#[tokio::test]
async fn unseeded_store_starts_empty() {
    let app = TestApp::spawn_with(|config| config.store.seed_fixtures = false).await;

    let documents = app.get_json("/documents").await;
    let types = app.get_json("/document-types").await;

    assert_eq!(documents, serde_json::json!([]));
    assert_eq!(types, serde_json::json!([]));
}
