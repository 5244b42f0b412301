use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use service_core::error::AppError;

use crate::models::AuditLog;
use crate::startup::AppState;
use crate::views::{AuditFilter, AuditTrailPage};

/// Audit entries in chronological order, narrowed by any supplied filter.
///
/// GET /audit-logs
pub async fn list_audit_logs(
    State(state): State<AppState>,
    filter: Result<Query<AuditFilter>, QueryRejection>,
) -> Result<Json<Vec<AuditLog>>, AppError> {
    let Query(filter) = filter?;

    let entries = match (filter.entity_id.as_deref(), filter.user_id.as_deref()) {
        (Some(entity_id), _) => state.store.audit_logs_by_entity_id(entity_id),
        (None, Some(user_id)) => state.store.audit_logs_by_user_id(user_id),
        (None, None) => state.store.all_audit_logs(),
    };
    Ok(Json(filter.apply(entries)))
}

/// Filtered entries cut to the configured display limit, with counts.
///
/// GET /audit-logs/trail
pub async fn audit_trail(
    State(state): State<AppState>,
    filter: Result<Query<AuditFilter>, QueryRejection>,
) -> Result<Json<AuditTrailPage>, AppError> {
    let Query(filter) = filter?;

    let all = state.store.all_audit_logs();
    let total = all.len();
    let matched = filter.apply(all);

    Ok(Json(AuditTrailPage::new(
        matched,
        total,
        state.config.store.audit_display_limit,
    )))
}
