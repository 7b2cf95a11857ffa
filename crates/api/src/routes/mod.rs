pub mod auth;
pub mod health;
pub mod site;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the API route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                register (public)
/// /auth/login                   login (public)
/// /auth/me                      current user (requires auth)
/// /auth/logout                  logout (requires auth)
///
/// /users                        list (requires auth)
/// /users/{id}                   get, update, delete (requires auth)
///
/// /site/evaluate                evaluate (first request per address free,
///                               then requires auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/site", site::router())
}
