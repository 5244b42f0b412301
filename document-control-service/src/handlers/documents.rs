use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use service_core::error::AppError;
use validator::Validate;

use super::not_found;
use crate::middleware::ActorContext;
use crate::models::{Document, DocumentPatch, NewDocument};
use crate::startup::AppState;
use crate::views::DocumentFilter;

/// List documents, optionally filtered by search text, status, or type.
///
/// GET /documents
pub async fn list_documents(
    State(state): State<AppState>,
    filter: Result<Query<DocumentFilter>, QueryRejection>,
) -> Result<Json<Vec<Document>>, AppError> {
    let Query(filter) = filter?;
    Ok(Json(filter.apply(state.store.all_documents())))
}

/// GET /documents/:id
pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Document>, AppError> {
    state
        .store
        .document_by_id(&id)
        .map(Json)
        .ok_or_else(|| not_found("Document", &id))
}

/// Register a new document. It always starts as `Draft`.
///
/// POST /documents
#[tracing::instrument(skip_all)]
pub async fn create_document(
    State(state): State<AppState>,
    ActorContext(actor): ActorContext,
    payload: Result<Json<NewDocument>, JsonRejection>,
) -> Result<(StatusCode, Json<Document>), AppError> {
    let Json(req) = payload?;
    req.validate()?;

    let document = state.store.create_document(&actor, req)?;

    tracing::info!(
        document_id = %document.id,
        document_number = %document.document_number,
        "Document created"
    );

    Ok((StatusCode::CREATED, Json(document)))
}

/// Apply a partial update. Status changes must follow the document lifecycle.
///
/// PATCH /documents/:id
#[tracing::instrument(skip_all, fields(document_id = %id))]
pub async fn update_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ActorContext(actor): ActorContext,
    payload: Result<Json<DocumentPatch>, JsonRejection>,
) -> Result<Json<Document>, AppError> {
    let Json(patch) = payload?;
    patch.validate()?;

    state
        .store
        .update_document(&actor, &id, patch)?
        .map(Json)
        .ok_or_else(|| not_found("Document", &id))
}

/// DELETE /documents/:id
#[tracing::instrument(skip_all, fields(document_id = %id))]
pub async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ActorContext(actor): ActorContext,
) -> Result<StatusCode, AppError> {
    if !state.store.delete_document(&actor, &id) {
        return Err(not_found("Document", &id));
    }
    tracing::info!(document_id = %id, "Document deleted");
    Ok(StatusCode::NO_CONTENT)
}
