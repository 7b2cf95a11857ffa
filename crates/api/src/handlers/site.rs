//! Handler for the `/site` resource.

use axum::Json;
use serde::Deserialize;
use sitescore_core::evaluation::{evaluate_site, SiteEvaluation};
use sitescore_core::url::validate_http_url;
use validator::Validate;

use crate::middleware::free_access::SiteAccess;
use crate::middleware::validated_json::ValidatedJson;

/// Request body for `POST /site/evaluate`.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct EvaluateSiteRequest {
    #[validate(
        length(min = 1, message = "url should not be empty"),
        custom(function = "validate_http_url")
    )]
    pub url: String,
}

/// POST /site/evaluate
///
/// The first request from a client address needs no token; after that a
/// bearer token is required. The report is a fixed placeholder.
pub async fn evaluate(
    access: SiteAccess,
    ValidatedJson(input): ValidatedJson<EvaluateSiteRequest>,
) -> Json<SiteEvaluation> {
    match &access {
        SiteAccess::FreePass { ip } => {
            tracing::info!(%ip, url = %input.url, "Evaluating site on free pass");
        }
        SiteAccess::Authenticated(user) => {
            tracing::info!(user_id = user.0.id, url = %input.url, "Evaluating site");
        }
    }
    Json(evaluate_site(&input.url, chrono::Utc::now()))
}
