mod common;

use common::{TestApp, ADMIN_ID};
use reqwest::StatusCode;
use serde_json::{json, Value};

fn new_user(username: &str) -> Value {
    json!({
        "username": username,
        "email": format!("{}@pharma.com", username),
        "fullName": "Alex Author",
        "role": "Author",
        "department": "Quality Assurance",
        "permissions": [{ "resource": "documents", "actions": ["create", "read"] }]
    })
}

#[tokio::test]
async fn seeded_users_are_listed() {
    let app = TestApp::spawn().await;

    let users = app.get_json("/users").await;

    assert_eq!(users.as_array().unwrap().len(), 3);
    assert_eq!(users[0]["username"], "admin");
    assert_eq!(users[2]["role"], "Reviewer");
}

#[tokio::test]
async fn user_crud_is_audited() {
    let app = TestApp::spawn().await;

    let response = app.post("/users", Some(ADMIN_ID), &new_user("aauthor")).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let user: Value = response.json().await.unwrap();
    assert_eq!(user["isActive"], true);
    let path = format!("/users/{}", user["id"].as_str().unwrap());

    let updated: Value = app
        .patch(&path, Some(ADMIN_ID), &json!({ "department": "Production" }))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(updated["department"], "Production");
    assert_eq!(updated["username"], "aauthor");

    assert_eq!(app.delete(&path, Some(ADMIN_ID)).await.status(), StatusCode::NO_CONTENT);

    let by_admin = app.get_json("/audit-logs?userId=1").await;
    let actions: Vec<&str> = by_admin
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["action"].as_str().unwrap())
        .collect();
    assert_eq!(actions, vec!["CREATE_USER", "UPDATE_USER", "DELETE_USER"]);
    assert_eq!(
        by_admin[1]["changes"]["department"],
        json!({ "old": "Quality Assurance", "new": "Production" })
    );
}

#[tokio::test]
async fn invalid_email_is_unprocessable() {
    let app = TestApp::spawn().await;
    let mut body = new_user("aauthor");
    body["email"] = json!("not-an-email");

    let response = app.post("/users", None, &body).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn blank_full_name_in_patch_is_unprocessable() {
    let app = TestApp::spawn().await;

    let response = app
        .patch("/users/2", Some(ADMIN_ID), &json!({ "fullName": "" }))
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let user = app.get_json("/users/2").await;
    assert_eq!(user["fullName"], "John Smith");
}

#[tokio::test]
async fn duplicate_username_conflicts() {
    let app = TestApp::spawn().await;

    let response = app.post("/users", None, &new_user("ADMIN")).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn inactive_user_cannot_act() {
    let app = TestApp::spawn().await;
    app.patch("/users/3", Some(ADMIN_ID), &json!({ "isActive": false }))
        .await;

    let response = app
        .post("/documents", Some("3"), &common::new_document_body("SOP-200"))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
