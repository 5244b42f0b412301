use axum::{extract::State, Json};

use crate::startup::AppState;
use crate::views::{
    AuditSummary, ComplianceSummary, DashboardStats, DocumentTypeUsage, UserSummary,
};

/// GET /reports/dashboard
pub async fn dashboard(State(state): State<AppState>) -> Json<DashboardStats> {
    Json(DashboardStats::compute(
        &state.store.all_documents(),
        &state.store.all_workflows(),
    ))
}

/// GET /reports/compliance
pub async fn compliance(State(state): State<AppState>) -> Json<ComplianceSummary> {
    Json(ComplianceSummary::compute(
        &state.store.all_documents(),
        &state.store.all_workflows(),
        state.store.audit_log_count(),
    ))
}

/// GET /reports/audit-summary
pub async fn audit_summary(State(state): State<AppState>) -> Json<AuditSummary> {
    Json(AuditSummary::compute(&state.store.all_audit_logs()))
}

/// GET /reports/users
pub async fn users(State(state): State<AppState>) -> Json<UserSummary> {
    Json(UserSummary::compute(&state.store.all_users()))
}

/// GET /reports/document-types
pub async fn document_types(State(state): State<AppState>) -> Json<Vec<DocumentTypeUsage>> {
    Json(
        state
            .store
            .document_type_usage()
            .into_iter()
            .map(DocumentTypeUsage::from)
            .collect(),
    )
}
