use serde::{Deserialize, Serialize};

/// Post type attached to fan-out messages so chat clients can render them
/// with a custom attachment instead of plain text.
pub const PULL_REQUEST_POST_TYPE: &str = "custom_github_pull_request";

/// Structured payload carried on a fan-out post, built from a
/// pull-request-opened event. Serialized into the post's props.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestProps {
    pub number: u64,
    pub title: String,
    /// The pull request body.
    pub summary: String,
    pub assignees: Vec<String>,
    pub reviewers: Vec<String>,
    /// Unix seconds at which the pull request was submitted.
    pub submitted_at: i64,
}
