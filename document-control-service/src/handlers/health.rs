use axum::{extract::State, Json};

use crate::dtos::HealthResponse;
use crate::startup::AppState;

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "document-control-service",
        version: env!("CARGO_PKG_VERSION"),
        documents: state.store.all_documents().len(),
        audit_entries: state.store.audit_log_count(),
    })
}
