mod common;

use common::{TestApp, ADMIN_ID};
use reqwest::StatusCode;
use serde_json::{json, Value};

async fn type_id(app: &TestApp, name: &str) -> String {
    let types = app.get_json("/document-types").await;
    types
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["type"] == name)
        .and_then(|t| t["id"].as_str())
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn catalog_is_seeded() {
    let app = TestApp::spawn().await;

    let types = app.get_json("/document-types").await;

    assert_eq!(types.as_array().unwrap().len(), 9);
    assert_eq!(types[3]["type"], "Work Instruction");
    let manual = app.get_json("/document-types/1").await;
    assert_eq!(manual["description"], "Comprehensive guides and manuals");
}

#[tokio::test]
async fn create_update_and_delete_type() {
    let app = TestApp::spawn().await;

    let response = app
        .post(
            "/document-types",
            Some(ADMIN_ID),
            &json!({ "type": "Protocol", "description": "Validation protocols" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Value = response.json().await.unwrap();
    let path = format!("/document-types/{}", created["id"].as_str().unwrap());

    let updated: Value = app
        .patch(&path, Some(ADMIN_ID), &json!({ "type": "Study Protocol" }))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(updated["type"], "Study Protocol");

    assert_eq!(app.delete(&path, Some(ADMIN_ID)).await.status(), StatusCode::NO_CONTENT);
    assert_eq!(app.get(&path).await.status(), StatusCode::NOT_FOUND);

    let logs = app
        .get_json(&format!("/audit-logs?entityId={}", created["id"].as_str().unwrap()))
        .await;
    let actions: Vec<&str> = logs
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["action"].as_str().unwrap())
        .collect();
    assert_eq!(
        actions,
        vec!["CREATE_DOCUMENT_TYPE", "UPDATE_DOCUMENT_TYPE", "DELETE_DOCUMENT_TYPE"]
    );
    assert_eq!(logs[0]["entityType"], "System");
}

#[tokio::test]
async fn duplicate_type_conflicts() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/document-types", None, &json!({ "type": "POLICY" }))
        .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn referenced_type_cannot_be_deleted() {
    let app = TestApp::spawn().await;
    let manual = type_id(&app, "Manual").await;

    let response = app
        .delete(&format!("/document-types/{}", manual), None)
        .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let error: Value = response.json().await.unwrap();
    assert!(error["error"].as_str().unwrap().contains("still referenced"));
}

#[tokio::test]
async fn document_requires_catalog_entry() {
    let app = TestApp::spawn().await;
    let masters = type_id(&app, "Masters").await;
    app.delete(&format!("/document-types/{}", masters), None).await;

    let mut body = common::new_document_body("MST-001");
    body["documentType"] = json!("Masters");
    let response = app.post("/documents", None, &body).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
