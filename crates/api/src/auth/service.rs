//! Registration, login, and token verification.
//!
//! These take their collaborators (store, JWT settings) as arguments so the
//! HTTP handlers, the auth extractor, and tests all drive the same code.

use serde::Serialize;
use sitescore_core::error::CoreError;
use sitescore_db::models::user::{CreateUser, UserResponse};
use sitescore_db::store::{StoreError, UserStore};

use crate::auth::jwt::{generate_access_token, validate_token, JwtConfig};
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};

/// Message for a duplicate registration.
pub const EMAIL_TAKEN: &str = "User with this email already exists";

/// Message for an unknown email or a wrong password. The two cases are not
/// distinguished.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Message for a valid token whose user is gone or deactivated.
pub const USER_NOT_AUTHORIZED: &str = "User is not authorized";

/// Successful authentication response returned by register and login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserResponse,
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

/// Input for [`register`]. `password` is plaintext.
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Create a user and issue a token for it.
///
/// The email check and the insert are separate steps; a racing duplicate
/// that slips past the check is still rejected by the store.
pub async fn register(
    store: &dyn UserStore,
    jwt: &JwtConfig,
    input: Registration,
) -> AppResult<AuthResponse> {
    if store.find_by_email(&input.email).await?.is_some() {
        return Err(CoreError::Conflict(EMAIL_TAKEN.into()).into());
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = store
        .create(&CreateUser {
            email: input.email,
            password_hash,
            first_name: input.first_name,
            last_name: input.last_name,
        })
        .await
        .map_err(|e| match e {
            StoreError::Duplicate(_) => AppError::Core(CoreError::Conflict(EMAIL_TAKEN.into())),
            other => other.into(),
        })?;

    tracing::info!(user_id = user.id, "Registered user");
    issue(user.into(), jwt)
}

/// Check an email/password pair and issue a token.
pub async fn login(
    store: &dyn UserStore,
    jwt: &JwtConfig,
    email: &str,
    password: &str,
) -> AppResult<AuthResponse> {
    let Some(user) = store.find_by_email(email).await? else {
        tracing::warn!("Login attempt for unknown email");
        return Err(CoreError::Unauthorized(INVALID_CREDENTIALS.into()).into());
    };

    let password_valid = verify_password(password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::warn!(user_id = user.id, "Login attempt with wrong password");
        return Err(CoreError::Unauthorized(INVALID_CREDENTIALS.into()).into());
    }

    issue(user.into(), jwt)
}

/// Resolve a bearer token to the public view of an active user.
pub async fn verify(
    store: &dyn UserStore,
    jwt: &JwtConfig,
    token: &str,
) -> AppResult<UserResponse> {
    let claims = validate_token(token, jwt)
        .map_err(|_| CoreError::Unauthorized("Invalid or expired token".into()))?;

    match store.find_by_id(claims.sub).await? {
        Some(user) if user.is_active => Ok(user.into()),
        _ => Err(CoreError::Unauthorized(USER_NOT_AUTHORIZED.into()).into()),
    }
}

fn issue(user: UserResponse, jwt: &JwtConfig) -> AppResult<AuthResponse> {
    let access_token = generate_access_token(user.id, &user.email, jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok(AuthResponse {
        user,
        access_token,
        expires_in: jwt.expiry_secs,
    })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use sitescore_db::models::user::UpdateUser;
    use sitescore_db::store::MemoryUserStore;

    use super::*;
    use crate::auth::jwt::generate_access_token_at;

    fn jwt() -> JwtConfig {
        JwtConfig {
            secret: "service-test-secret".to_string(),
            expiry_secs: 600,
        }
    }

    fn registration(email: &str) -> Registration {
        Registration {
            email: email.to_string(),
            password: "hunter2".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
        }
    }

    #[tokio::test]
    async fn register_issues_token_for_new_user() {
        let store = MemoryUserStore::new();
        let response = register(&store, &jwt(), registration("ada@example.com"))
            .await
            .unwrap();

        assert_eq!(response.user.email, "ada@example.com");
        assert_eq!(response.expires_in, 600);

        let user = verify(&store, &jwt(), &response.access_token).await.unwrap();
        assert_eq!(user.id, response.user.id);
    }

    #[tokio::test]
    async fn register_duplicate_email_conflicts_and_keeps_original() {
        let store = MemoryUserStore::new();
        let first = register(&store, &jwt(), registration("dup@example.com"))
            .await
            .unwrap();

        let mut again = registration("dup@example.com");
        again.password = "different".to_string();
        again.first_name = "Eve".to_string();
        let result = register(&store, &jwt(), again).await;
        assert_matches!(result, Err(AppError::Core(CoreError::Conflict(msg))) if msg == EMAIL_TAKEN);

        let stored = store
            .find_by_email("dup@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.id, first.user.id);
        assert_eq!(stored.first_name, "Ada");
        assert!(verify_password("hunter2", &stored.password_hash).unwrap());
    }

    #[tokio::test]
    async fn login_round_trips_to_same_user() {
        let store = MemoryUserStore::new();
        let registered = register(&store, &jwt(), registration("me@example.com"))
            .await
            .unwrap();

        let logged_in = login(&store, &jwt(), "me@example.com", "hunter2")
            .await
            .unwrap();
        let user = verify(&store, &jwt(), &logged_in.access_token)
            .await
            .unwrap();
        assert_eq!(user.id, registered.user.id);
    }

    #[tokio::test]
    async fn login_rejects_unknown_email_and_wrong_password() {
        let store = MemoryUserStore::new();
        register(&store, &jwt(), registration("me@example.com"))
            .await
            .unwrap();

        assert_matches!(
            login(&store, &jwt(), "nobody@example.com", "hunter2").await,
            Err(AppError::Core(CoreError::Unauthorized(msg))) if msg == INVALID_CREDENTIALS
        );
        assert_matches!(
            login(&store, &jwt(), "me@example.com", "wrong").await,
            Err(AppError::Core(CoreError::Unauthorized(msg))) if msg == INVALID_CREDENTIALS
        );
        // Emails are matched exactly as stored.
        assert_matches!(
            login(&store, &jwt(), "ME@example.com", "hunter2").await,
            Err(AppError::Core(CoreError::Unauthorized(_)))
        );
    }

    #[tokio::test]
    async fn verify_rejects_expired_token() {
        let store = MemoryUserStore::new();
        let config = jwt();
        let registered = register(&store, &config, registration("late@example.com"))
            .await
            .unwrap();

        let issued_at = chrono::Utc::now().timestamp() - config.expiry_secs - 1;
        let token =
            generate_access_token_at(registered.user.id, "late@example.com", &config, issued_at)
                .unwrap();

        assert_matches!(
            verify(&store, &config, &token).await,
            Err(AppError::Core(CoreError::Unauthorized(_)))
        );
    }

    #[tokio::test]
    async fn verify_rejects_inactive_and_deleted_users() {
        let store = MemoryUserStore::new();
        let config = jwt();
        let a = register(&store, &config, registration("a@example.com"))
            .await
            .unwrap();
        let b = register(&store, &config, registration("b@example.com"))
            .await
            .unwrap();

        let deactivate = UpdateUser {
            is_active: Some(false),
            ..Default::default()
        };
        store.update(a.user.id, &deactivate).await.unwrap();
        store.delete(b.user.id).await.unwrap();

        for token in [&a.access_token, &b.access_token] {
            assert_matches!(
                verify(&store, &config, token).await,
                Err(AppError::Core(CoreError::Unauthorized(msg))) if msg == USER_NOT_AUTHORIZED
            );
        }
    }
}
