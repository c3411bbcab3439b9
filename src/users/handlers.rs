use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        extractors::{ensure_owner, AuthUser, Identity},
        password::hash_password,
    },
    error::AppError,
    response::{message, DataResponse, MessageResponse},
    state::AppState,
    users::dto::{PublicUser, UpdateUserRequest},
    validation::{parse_id, ValidJson},
};

pub fn user_routes() -> Router<AppState> {
    Router::new().route(
        "/users/:id",
        get(get_user).put(update_user).delete(delete_user),
    )
}

/// Resolves the path id and checks it against the caller. Users may only
/// address their own account.
fn own_user_id(identity: &Identity, raw: &str) -> Result<i64, AppError> {
    let id = parse_id(raw, "user")?;
    ensure_owner(identity, id, "Not allowed")?;
    Ok(id)
}

#[instrument(skip_all, fields(caller = identity.id, path_id = %raw_id))]
pub async fn get_user(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(raw_id): Path<String>,
) -> Result<Json<DataResponse<PublicUser>>, AppError> {
    let id = own_user_id(&identity, &raw_id)?;
    let user = state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    Ok(Json(DataResponse { data: user.into() }))
}

#[instrument(skip_all, fields(caller = identity.id, path_id = %raw_id))]
pub async fn update_user(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(raw_id): Path<String>,
    ValidJson(payload): ValidJson<UpdateUserRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = own_user_id(&identity, &raw_id)?;

    let mut user = state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    if let Some(other) = state.users.find_by_email(&payload.email).await? {
        if other.id != id {
            warn!(email = %payload.email, "email taken by another user");
            return Err(AppError::Conflict("Email already exists".into()));
        }
    }
    if let Some(other) = state.users.find_by_username(&payload.username).await? {
        if other.id != id {
            warn!(username = %payload.username, "username taken by another user");
            return Err(AppError::Conflict("Username already exists".into()));
        }
    }

    user.username = payload.username;
    user.email = payload.email;
    if let Some(password) = payload.password {
        user.password_hash = hash_password(&password)?;
    }
    state.users.save(&user).await?;

    info!(user_id = id, "user updated");
    Ok(Json(message("User updated successfully")))
}

#[instrument(skip_all, fields(caller = identity.id, path_id = %raw_id))]
pub async fn delete_user(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(raw_id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = own_user_id(&identity, &raw_id)?;
    if !state.users.delete(id).await? {
        return Err(AppError::NotFound("User not found".into()));
    }
    info!(user_id = id, "user deleted with their photos");
    Ok(Json(message("User deleted successfully")))
}
