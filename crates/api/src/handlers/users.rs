//! Handlers for the `/users` resource.
//!
//! Every handler requires a valid bearer token via [`AuthUser`].

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use sitescore_core::error::CoreError;
use sitescore_core::types::DbId;
use sitescore_db::models::user::{UpdateUser, UserResponse};
use sitescore_db::store::StoreError;
use validator::Validate;

use crate::auth::password::hash_password;
use crate::auth::service::EMAIL_TAKEN;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::path::PathParam;
use crate::middleware::validated_json::ValidatedJson;
use crate::state::AppState;

/// Request body for `PATCH /users/{id}`. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateUserRequest {
    #[validate(email(message = "email must be an email"))]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "password should not be empty"))]
    pub password: Option<String>,
    #[validate(length(min = 1, message = "firstName should not be empty"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, message = "lastName should not be empty"))]
    pub last_name: Option<String>,
    pub is_active: Option<bool>,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "User", id })
}

/// GET /users
pub async fn list_users(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = state.store.list().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// GET /users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    _auth: AuthUser,
    PathParam(id): PathParam<DbId>,
) -> AppResult<Json<UserResponse>> {
    let user = state.store.find_by_id(id).await?.ok_or_else(|| not_found(id))?;
    Ok(Json(user.into()))
}

/// PATCH /users/{id}
///
/// Update profile fields; a new password is re-hashed before storage.
pub async fn update_user(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    PathParam(id): PathParam<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    let password_hash = input
        .password
        .as_deref()
        .map(hash_password)
        .transpose()
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let patch = UpdateUser {
        email: input.email,
        password_hash,
        first_name: input.first_name,
        last_name: input.last_name,
        is_active: input.is_active,
    };

    let user = state
        .store
        .update(id, &patch)
        .await
        .map_err(|e| match e {
            StoreError::Duplicate(_) => AppError::Core(CoreError::Conflict(EMAIL_TAKEN.into())),
            other => other.into(),
        })?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(user_id = id, updated_by = caller.id, "Updated user");
    Ok(Json(user.into()))
}

/// DELETE /users/{id}
///
/// Hard-delete a user. Returns 204 No Content.
pub async fn delete_user(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    PathParam(id): PathParam<DbId>,
) -> AppResult<StatusCode> {
    if !state.store.delete(id).await? {
        return Err(not_found(id));
    }
    tracing::info!(user_id = id, deleted_by = caller.id, "Deleted user");
    Ok(StatusCode::NO_CONTENT)
}
