#![allow(dead_code)]

use document_control_service::config::DocumentControlConfig;
use document_control_service::startup::Application;
use document_control_service::store::Store;
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

pub const ADMIN_ID: &str = "1";
pub const MANAGER_ID: &str = "2";
pub const REVIEWER_ID: &str = "3";

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub store: Arc<Store>,
    pub client: Client,
}

impl TestApp {
    /// Spawn a seeded application on a random port.
    pub async fn spawn() -> Self {
        Self::spawn_with(|_| {}).await
    }

    pub async fn spawn_with(customize: impl FnOnce(&mut DocumentControlConfig)) -> Self {
        let mut config = DocumentControlConfig::default();
        config.common.port = 0; // Random port for testing
        customize(&mut config);

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let store = app.store();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to be ready by polling the health endpoint
        let client = Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            store,
            client,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    fn as_user(builder: RequestBuilder, user_id: Option<&str>) -> RequestBuilder {
        match user_id {
            Some(id) => builder.header("X-User-ID", id),
            None => builder,
        }
    }

    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get_json(&self, path: &str) -> Value {
        let response = self.get(path).await;
        assert!(
            response.status().is_success(),
            "GET {} returned {}",
            path,
            response.status()
        );
        response.json().await.expect("Failed to parse JSON")
    }

    pub async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        user_id: Option<&str>,
        body: &T,
    ) -> Response {
        Self::as_user(self.client.post(self.url(path)), user_id)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn patch<T: Serialize + ?Sized>(
        &self,
        path: &str,
        user_id: Option<&str>,
        body: &T,
    ) -> Response {
        Self::as_user(self.client.patch(self.url(path)), user_id)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn delete(&self, path: &str, user_id: Option<&str>) -> Response {
        Self::as_user(self.client.delete(self.url(path)), user_id)
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Id of the seeded document with this number.
    pub fn document_id(&self, number: &str) -> String {
        self.store
            .all_documents()
            .into_iter()
            .find(|d| d.document_number == number)
            .map(|d| d.id)
            .expect("seeded document")
    }
}

pub fn new_document_body(number: &str) -> Value {
    serde_json::json!({
        "documentTitle": "Cleaning Validation Procedure",
        "documentNumber": number,
        "createdBy": "John Smith",
        "issuedBy": "John Smith",
        "issuerRole": "Manager",
        "effectiveFromDate": "2024-06-01",
        "dateOfNextIssue": "2025-06-01",
        "documentType": "Procedure",
        "documentCategory": "Quality",
        "documentSecurity": "Internal"
    })
}

pub fn two_step_workflow_body(document_id: &str) -> Value {
    serde_json::json!({
        "documentId": document_id,
        "workflowName": "Validation Review",
        "initiatedBy": "John Smith",
        "steps": [
            { "stepName": "Technical Review", "assignedRole": "Reviewer" },
            { "stepName": "Management Approval", "assignedRole": "Manager" }
        ]
    })
}
