//! Handlers for the `/auth` resource (register, login, me, logout).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use sitescore_db::models::user::UserResponse;
use validator::Validate;

use crate::auth::service::{self, AuthResponse, Registration};
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::validated_json::ValidatedJson;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegisterRequest {
    #[validate(email(message = "email must be an email"))]
    pub email: String,
    #[validate(length(min = 1, message = "password should not be empty"))]
    pub password: String,
    #[validate(length(min = 1, message = "firstName should not be empty"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "lastName should not be empty"))]
    pub last_name: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    #[validate(email(message = "email must be an email"))]
    pub email: String,
    #[validate(length(min = 1, message = "password should not be empty"))]
    pub password: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /auth/register
///
/// Create an account and return a token for it. 201 Created on success.
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let registration = Registration {
        email: input.email,
        password: input.password,
        first_name: input.first_name,
        last_name: input.last_name,
    };
    let response = service::register(state.store.as_ref(), &state.config.jwt, registration).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /auth/login
///
/// Authenticate with email + password.
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let response = service::login(
        state.store.as_ref(),
        &state.config.jwt,
        &input.email,
        &input.password,
    )
    .await?;
    Ok(Json(response))
}

/// GET /auth/me
///
/// The user the presented token resolves to.
pub async fn me(AuthUser(user): AuthUser) -> Json<UserResponse> {
    Json(user)
}

/// POST /auth/logout
///
/// Tokens are not tracked server-side, so there is nothing to revoke; the
/// client discards its token. Returns 204 No Content for a valid token.
pub async fn logout(AuthUser(user): AuthUser) -> StatusCode {
    tracing::info!(user_id = user.id, "User logged out");
    StatusCode::NO_CONTENT
}
