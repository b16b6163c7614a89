use std::fmt::Write as _;

use tracing::{error, info};

use prbridge_chat::Post;

use crate::state::AppState;

/// A pull request waiting on the requesting user. Produced fresh per run,
/// never persisted.
#[derive(Debug, Clone)]
struct PendingReview {
    repository: String,
    reviewer: String,
    number: u64,
    url: String,
}

pub(crate) const NOTHING_PENDING: &str = "No pending PRs to review. Go and grab a coffee :smile:";

/// Detach the aggregation from the triggering request. Completion is
/// reported solely through a direct message to the user.
pub fn spawn(state: AppState, user_id: String) {
    tokio::spawn(async move {
        run(state, user_id).await;
    });
}

/// Walk every repository of the configured organization, every open pull
/// request, and every requested reviewer, collecting the pull requests
/// waiting on this user, then DM the result.
///
/// A failing listing call posts an error DM and the walk continues with
/// whatever was already listed; several failures mean several error DMs.
pub async fn run(state: AppState, user_id: String) {
    let org = state.config.snapshot().github_org.clone();

    let dm_channel = match state.chat.direct_channel(&state.bot_user_id, &user_id).await {
        Ok(id) => id,
        Err(e) => {
            error!("Failed to open DM channel for {}: {}", user_id, e);
            return;
        }
    };

    let state_for_token = state.clone();
    let lookup_user = user_id.clone();
    let token = tokio::task::spawn_blocking(move || state_for_token.db.get_token(&lookup_user))
        .await
        .unwrap_or_else(|e| Err(anyhow::Error::from(e)));

    let token = match token {
        Ok(Some(token)) => token,
        Ok(None) => {
            send_dm(
                &state,
                &dm_channel,
                "You have not registered a GitHub token. Use `/github register <token>` first.",
            )
            .await;
            return;
        }
        Err(e) => {
            error!("Token lookup failed for {}: {}", user_id, e);
            send_dm(&state, &dm_channel, "Error retrieving the GitHub user token").await;
            return;
        }
    };

    let github = match state.connector.connect(&token) {
        Ok(session) => session,
        Err(e) => {
            error!("Failed to build GitHub session for {}: {}", user_id, e);
            send_dm(&state, &dm_channel, "Error connecting to GitHub").await;
            return;
        }
    };

    // Resolve the authenticated login; on failure keep walking with an
    // unmatched login so the run still ends in a DM.
    let me = match github.current_user().await {
        Ok(user) => user.login,
        Err(e) => {
            error!("Failed to resolve GitHub user for {}: {}", user_id, e);
            send_dm(&state, &dm_channel, "Error retrieving the GitHub user information").await;
            String::new()
        }
    };

    let repos = match github.list_org_repos(&org).await {
        Ok(repos) => repos,
        Err(e) => {
            error!("Failed to list repositories of {}: {}", org, e);
            send_dm(&state, &dm_channel, "Error retrieving the GitHub repository list").await;
            Vec::new()
        }
    };

    let mut pending: Vec<PendingReview> = Vec::new();
    for repo in &repos {
        let pulls = match github.list_open_pulls(&org, &repo.name).await {
            Ok(pulls) => pulls,
            Err(e) => {
                error!("Failed to list pull requests of {}/{}: {}", org, repo.name, e);
                send_dm(&state, &dm_channel, "Error retrieving the GitHub PR list").await;
                continue;
            }
        };

        for pull in pulls {
            let reviewers = match github
                .list_requested_reviewers(&org, &repo.name, pull.number)
                .await
            {
                Ok(reviewers) => reviewers,
                Err(e) => {
                    error!(
                        "Failed to list reviewers of {}/{}#{}: {}",
                        org, repo.name, pull.number, e
                    );
                    send_dm(&state, &dm_channel, "Error retrieving the GitHub PR reviewers")
                        .await;
                    continue;
                }
            };

            if reviewers.iter().any(|u| u.login == me) {
                pending.push(PendingReview {
                    repository: repo.name.clone(),
                    reviewer: me.clone(),
                    number: pull.number,
                    url: pull.html_url.clone(),
                });
            }
        }
    }

    info!(
        "Aggregated {} pending review(s) for {} across {} repo(s)",
        pending.len(),
        user_id,
        repos.len()
    );

    if pending.is_empty() {
        send_dm(&state, &dm_channel, NOTHING_PENDING).await;
        return;
    }

    let mut message = String::new();
    for entry in &pending {
        let _ = writeln!(
            message,
            "[**{}**] PR waiting **{}**'s review: **PR-{}** url: {}",
            entry.repository, entry.reviewer, entry.number, entry.url
        );
    }
    send_dm(&state, &dm_channel, &message).await;
}

async fn send_dm(state: &AppState, channel_id: &str, message: &str) {
    if let Err(e) = state.chat.create_post(&Post::text(channel_id, message)).await {
        error!("Failed to post DM to {}: {}", channel_id, e);
    }
}
