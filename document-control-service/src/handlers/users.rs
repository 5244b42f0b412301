use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;
use validator::Validate;

use super::not_found;
use crate::middleware::ActorContext;
use crate::models::{NewUser, User, UserPatch};
use crate::startup::AppState;

/// GET /users
pub async fn list_users(State(state): State<AppState>) -> Json<Vec<User>> {
    Json(state.store.all_users())
}

/// GET /users/:id
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>, AppError> {
    state
        .store
        .user_by_id(&id)
        .map(Json)
        .ok_or_else(|| not_found("User", &id))
}

/// POST /users
#[tracing::instrument(skip_all)]
pub async fn create_user(
    State(state): State<AppState>,
    ActorContext(actor): ActorContext,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let Json(req) = payload?;
    req.validate()?;

    let user = state.store.create_user(&actor, req)?;
    tracing::info!(new_user_id = %user.id, username = %user.username, "User created");

    Ok((StatusCode::CREATED, Json(user)))
}

/// PATCH /users/:id
#[tracing::instrument(skip_all, fields(target_user_id = %id))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ActorContext(actor): ActorContext,
    payload: Result<Json<UserPatch>, JsonRejection>,
) -> Result<Json<User>, AppError> {
    let Json(patch) = payload?;
    patch.validate()?;

    state
        .store
        .update_user(&actor, &id, patch)?
        .map(Json)
        .ok_or_else(|| not_found("User", &id))
}

/// DELETE /users/:id
#[tracing::instrument(skip_all, fields(target_user_id = %id))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ActorContext(actor): ActorContext,
) -> Result<StatusCode, AppError> {
    if !state.store.delete_user(&actor, &id) {
        return Err(not_found("User", &id));
    }
    Ok(StatusCode::NO_CONTENT)
}
