//! Wire models for the subset of the GitHub REST and webhook payloads the
//! bridge consumes. Unknown fields are ignored everywhere so payload growth
//! on GitHub's side never breaks parsing.

use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub name: String,
    /// `owner/repo`
    pub full_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    pub html_url: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub assignees: Vec<User>,
    #[serde(default)]
    pub requested_reviewers: Vec<User>,
}

/// Response of `GET /repos/{owner}/{repo}/pulls/{n}/requested_reviewers`.
/// Team reviewers are ignored; the bridge only matches individual logins.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestedReviewers {
    #[serde(default)]
    pub users: Vec<User>,
}

/// Webhook action on a `pull_request` event. The catch-all keeps parsing
/// from failing on actions the bridge does not handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PullRequestAction {
    Opened,
    Closed,
    Edited,
    Reopened,
    Synchronize,
    #[serde(other)]
    Other,
}

/// `pull_request` webhook event envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestEvent {
    pub action: PullRequestAction,
    pub pull_request: PullRequest,
    pub repository: Repository,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pull_request_event() {
        let json = r#"{
            "action": "opened",
            "number": 7,
            "pull_request": {
                "number": 7,
                "title": "Add widget",
                "body": "Widgets for everyone",
                "html_url": "https://github.com/acme/widgets/pull/7",
                "created_at": "2024-05-01T12:00:00Z",
                "assignees": [{"login": "dave"}],
                "requested_reviewers": [{"login": "alice"}]
            },
            "repository": {"name": "widgets", "full_name": "acme/widgets"},
            "sender": {"login": "dave"}
        }"#;

        let event: PullRequestEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.action, PullRequestAction::Opened);
        assert_eq!(event.repository.full_name, "acme/widgets");
        assert_eq!(event.pull_request.assignees[0].login, "dave");
    }

    #[test]
    fn unknown_action_parses_as_other() {
        let json = r#"{
            "action": "ready_for_review",
            "pull_request": {
                "number": 1,
                "title": "t",
                "html_url": "https://github.com/acme/widgets/pull/1",
                "created_at": "2024-05-01T12:00:00Z"
            },
            "repository": {"name": "widgets", "full_name": "acme/widgets"}
        }"#;

        let event: PullRequestEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.action, PullRequestAction::Other);
    }
}
