use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use serde::Deserialize;
use subtle::ConstantTimeEq;
use tracing::{error, warn};

use prbridge_chat::Post;
use prbridge_github::models::{PullRequest, PullRequestAction, PullRequestEvent};
use prbridge_store::Subscriptions;
use prbridge_types::events::{PULL_REQUEST_POST_TYPE, PullRequestProps};

use crate::state::AppState;

const GITHUB_EVENT_HEADER: &str = "x-github-event";

#[derive(Debug, Deserialize)]
pub struct WebhookQuery {
    #[serde(default)]
    secret: String,
}

/// Constant-time comparison so the secret check does not leak match length
/// through timing.
fn secrets_match(provided: &str, expected: &str) -> bool {
    provided.as_bytes().ct_eq(expected.as_bytes()).into()
}

/// `POST /webhook?secret=<shared-secret>`
///
/// Authenticates, decodes, and fans the event out. Only
/// `pull_request`/`opened` is dispatched; every other event kind or action
/// is accepted and dropped.
pub async fn handle_webhook(
    State(state): State<AppState>,
    Query(query): Query<WebhookQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let config = state.config.snapshot();

    if !secrets_match(&query.secret, &config.webhook_secret) {
        return StatusCode::UNAUTHORIZED;
    }

    let event_kind = headers
        .get(GITHUB_EVENT_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if event_kind != "pull_request" {
        return StatusCode::OK;
    }

    let event: PullRequestEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            warn!("Undecodable pull_request payload: {}", e);
            return StatusCode::BAD_REQUEST;
        }
    };

    if event.action == PullRequestAction::Opened {
        pull_request_opened(&state, &event).await;
    }

    StatusCode::OK
}

/// Fan the opened pull request out to every subscribed channel,
/// best-effort per channel.
async fn pull_request_opened(state: &AppState, event: &PullRequestEvent) {
    let repo_full_name = event.repository.full_name.clone();
    let Some((org, repo)) = repo_full_name.split_once('/') else {
        warn!("Malformed repository full name: {}", repo_full_name);
        return;
    };

    let props = build_props(state, org, repo, &event.pull_request).await;

    let state_for_load = state.clone();
    let subscriptions = tokio::task::spawn_blocking(move || {
        Subscriptions::load(&state_for_load.db)
    })
    .await
    .unwrap_or_else(|e| {
        error!("spawn_blocking join error: {}", e);
        Subscriptions::default()
    });

    let message = format!(
        "[{}] New pull request PR-{}: {}",
        repo, props.number, props.title
    );

    for channel_id in subscriptions.channels_for(&repo_full_name) {
        let post = Post {
            channel_id: channel_id.clone(),
            message: message.clone(),
            post_type: PULL_REQUEST_POST_TYPE.to_string(),
            props: serde_json::to_value(&props).unwrap_or_default(),
        };

        // One channel failing must not block the rest of the fan-out.
        if let Err(e) = state.chat.create_post(&post).await {
            error!("Failed to deliver to channel {}: {}", channel_id, e);
        }
    }
}

/// Build the post payload, enriching with a live requested-reviewer lookup.
/// The enrichment call is tolerated to fail — reviewers degrade to empty.
async fn build_props(
    state: &AppState,
    org: &str,
    repo: &str,
    pull_request: &PullRequest,
) -> PullRequestProps {
    let reviewers = match state
        .github
        .list_requested_reviewers(org, repo, pull_request.number)
        .await
    {
        Ok(users) => users.into_iter().map(|u| u.login).collect(),
        Err(e) => {
            warn!(
                "Reviewer lookup failed for {}/{}#{}: {}",
                org, repo, pull_request.number, e
            );
            Vec::new()
        }
    };

    PullRequestProps {
        number: pull_request.number,
        title: pull_request.title.clone(),
        summary: pull_request.body.clone().unwrap_or_default(),
        assignees: pull_request
            .assignees
            .iter()
            .map(|u| u.login.clone())
            .collect(),
        reviewers,
        submitted_at: pull_request.created_at.timestamp(),
    }
}
