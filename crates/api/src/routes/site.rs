//! Route definitions for the `/site` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::site;
use crate::state::AppState;

/// Routes mounted at `/site`.
///
/// ```text
/// POST /evaluate -> evaluate (free-access gated)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/evaluate", post(site::evaluate))
}
