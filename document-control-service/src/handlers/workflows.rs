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
use crate::dtos::{CancelWorkflowRequest, WorkflowListParams};
use crate::middleware::ActorContext;
use crate::models::{NewWorkflow, SignStep, Workflow, WorkflowPatch};
use crate::startup::AppState;
use crate::views::WorkflowDetail;

/// List workflows, or only those attached to `documentId`.
///
/// GET /workflows
pub async fn list_workflows(
    State(state): State<AppState>,
    params: Result<Query<WorkflowListParams>, QueryRejection>,
) -> Result<Json<Vec<Workflow>>, AppError> {
    let Query(params) = params?;
    let workflows = match params.document_id.as_deref() {
        Some(document_id) => state.store.workflows_by_document_id(document_id),
        None => state.store.all_workflows(),
    };
    Ok(Json(workflows))
}

/// Workflow with its resolved document and collected signatures.
///
/// GET /workflows/:id
pub async fn get_workflow(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<WorkflowDetail>, AppError> {
    let workflow = state
        .store
        .workflow_by_id(&id)
        .ok_or_else(|| not_found("Workflow", &id))?;
    Ok(Json(WorkflowDetail::build(&state.store, workflow)?))
}

/// POST /workflows
#[tracing::instrument(skip_all)]
pub async fn create_workflow(
    State(state): State<AppState>,
    ActorContext(actor): ActorContext,
    payload: Result<Json<NewWorkflow>, JsonRejection>,
) -> Result<(StatusCode, Json<Workflow>), AppError> {
    let Json(req) = payload?;
    req.validate()?;

    let workflow = state.store.create_workflow(&actor, req)?;
    tracing::info!(
        workflow_id = %workflow.id,
        document_id = %workflow.document_id,
        steps = workflow.steps.len(),
        "Workflow started"
    );

    Ok((StatusCode::CREATED, Json(workflow)))
}

/// PATCH /workflows/:id
#[tracing::instrument(skip_all, fields(workflow_id = %id))]
pub async fn update_workflow(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ActorContext(actor): ActorContext,
    payload: Result<Json<WorkflowPatch>, JsonRejection>,
) -> Result<Json<Workflow>, AppError> {
    let Json(patch) = payload?;
    patch.validate()?;

    state
        .store
        .update_workflow(&actor, &id, patch)?
        .map(Json)
        .ok_or_else(|| not_found("Workflow", &id))
}

/// DELETE /workflows/:id
#[tracing::instrument(skip_all, fields(workflow_id = %id))]
pub async fn delete_workflow(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ActorContext(actor): ActorContext,
) -> Result<StatusCode, AppError> {
    if !state.store.delete_workflow(&actor, &id) {
        return Err(not_found("Workflow", &id));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Sign the workflow's current step as approved, reviewed, or rejected.
/// The body's `userId` must be the caller named by `X-User-ID`.
///
/// POST /workflows/:id/steps/:step_id/sign
#[tracing::instrument(skip_all, fields(workflow_id = %id, step_id = %step_id))]
pub async fn sign_step(
    State(state): State<AppState>,
    Path((id, step_id)): Path<(String, String)>,
    ActorContext(actor): ActorContext,
    payload: Result<Json<SignStep>, JsonRejection>,
) -> Result<Json<Workflow>, AppError> {
    let Json(req) = payload?;
    req.validate()?;
    let signer = req.user_id.clone();
    let action = req.action;

    let workflow = state
        .store
        .sign_workflow_step(&actor, &id, &step_id, req)?
        .ok_or_else(|| not_found("Workflow", &id))?;

    tracing::info!(
        signer_id = %signer,
        action = action.as_str(),
        workflow_status = ?workflow.status,
        "Workflow step signed"
    );

    Ok(Json(workflow))
}

/// POST /workflows/:id/cancel
#[tracing::instrument(skip_all, fields(workflow_id = %id))]
pub async fn cancel_workflow(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ActorContext(actor): ActorContext,
    payload: Result<Json<CancelWorkflowRequest>, JsonRejection>,
) -> Result<Json<Workflow>, AppError> {
    let Json(req) = payload?;
    req.validate()?;

    state
        .store
        .cancel_workflow(&actor, &id, req.reason.as_deref())?
        .map(Json)
        .ok_or_else(|| not_found("Workflow", &id))
}
