use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use tracing::error;

use prbridge_types::api::AddReviewersRequest;

use crate::error::ApiError;
use crate::state::AppState;

const CALLER_HEADER: &str = "caller-user-id";

/// `POST /api/v1/pr/reviewers`
///
/// Acting as the calling user, ask GitHub to add the given reviewers to a
/// pull request. Returns the pull request's HTML URL as plain text.
/// Upstream is never contacted when the caller identity or token is
/// missing.
pub async fn add_reviewers(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<AddReviewersRequest>,
) -> Result<String, ApiError> {
    let user_id = headers
        .get(CALLER_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .ok_or(ApiError::Unauthorized)?
        .to_string();

    let state_for_token = state.clone();
    let lookup_user = user_id.clone();
    let token = tokio::task::spawn_blocking(move || state_for_token.db.get_token(&lookup_user))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Upstream(e.to_string())
        })?
        .map_err(|e| {
            error!("Token lookup failed for {}: {}", user_id, e);
            ApiError::Upstream(e.to_string())
        })?
        .ok_or(ApiError::NotRegistered)?;

    let github = state
        .connector
        .connect(&token)
        .map_err(|e| ApiError::Upstream(e.to_string()))?;

    let pull_request = github
        .request_reviewers(&req.org, &req.repo, req.pull_request_id, &req.reviewers)
        .await
        .map_err(|e| ApiError::Upstream(e.to_string()))?;

    Ok(pull_request.html_url)
}
