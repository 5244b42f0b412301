use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;
use validator::Validate;

use super::not_found;
use crate::middleware::ActorContext;
use crate::models::{DocumentType, DocumentTypePatch, NewDocumentType};
use crate::startup::AppState;

/// GET /document-types
pub async fn list_document_types(State(state): State<AppState>) -> Json<Vec<DocumentType>> {
    Json(state.store.all_document_types())
}

/// GET /document-types/:id
pub async fn get_document_type(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DocumentType>, AppError> {
    state
        .store
        .document_type_by_id(&id)
        .map(Json)
        .ok_or_else(|| not_found("Document type", &id))
}

/// POST /document-types
#[tracing::instrument(skip_all)]
pub async fn create_document_type(
    State(state): State<AppState>,
    ActorContext(actor): ActorContext,
    payload: Result<Json<NewDocumentType>, JsonRejection>,
) -> Result<(StatusCode, Json<DocumentType>), AppError> {
    let Json(req) = payload?;
    req.validate()?;

    let entry = state.store.create_document_type(&actor, req)?;
    tracing::info!(document_type_id = %entry.id, name = %entry.type_name, "Document type created");

    Ok((StatusCode::CREATED, Json(entry)))
}

/// Renaming is refused while documents still use the type.
///
/// PATCH /document-types/:id
#[tracing::instrument(skip_all, fields(document_type_id = %id))]
pub async fn update_document_type(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ActorContext(actor): ActorContext,
    payload: Result<Json<DocumentTypePatch>, JsonRejection>,
) -> Result<Json<DocumentType>, AppError> {
    let Json(patch) = payload?;
    patch.validate()?;

    state
        .store
        .update_document_type(&actor, &id, patch)?
        .map(Json)
        .ok_or_else(|| not_found("Document type", &id))
}

/// DELETE /document-types/:id
#[tracing::instrument(skip_all, fields(document_type_id = %id))]
pub async fn delete_document_type(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ActorContext(actor): ActorContext,
) -> Result<StatusCode, AppError> {
    if !state.store.delete_document_type(&actor, &id)? {
        return Err(not_found("Document type", &id));
    }
    Ok(StatusCode::NO_CONTENT)
}
