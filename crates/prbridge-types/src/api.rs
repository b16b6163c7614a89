use serde::{Deserialize, Serialize};

// -- Slash commands --

/// Outgoing slash-command payload posted by the chat platform
/// (form-encoded). Fields we don't dispatch on are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandRequest {
    pub channel_id: String,
    pub user_id: String,
    /// The trigger word, e.g. `/github`.
    pub command: String,
    /// Everything after the trigger word.
    #[serde(default)]
    pub text: String,
}

/// How a command response is rendered in the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    /// Visible only to the issuing user.
    Ephemeral,
    /// Posted into the channel for everyone.
    InChannel,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommandResponse {
    pub response_type: ResponseType,
    pub text: String,
    pub username: String,
    pub icon_url: String,
}

pub const BOT_DISPLAY_NAME: &str = "github";
pub const BOT_ICON_URL: &str =
    "https://assets-cdn.github.com/images/modules/logos_page/GitHub-Mark.png";

impl CommandResponse {
    pub fn ephemeral(text: impl Into<String>) -> Self {
        Self {
            response_type: ResponseType::Ephemeral,
            text: text.into(),
            username: BOT_DISPLAY_NAME.to_string(),
            icon_url: BOT_ICON_URL.to_string(),
        }
    }

    pub fn in_channel(text: impl Into<String>) -> Self {
        Self {
            response_type: ResponseType::InChannel,
            text: text.into(),
            username: BOT_DISPLAY_NAME.to_string(),
            icon_url: BOT_ICON_URL.to_string(),
        }
    }
}

// -- Reviewer assignment --

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddReviewersRequest {
    pub pull_request_id: u64,
    pub org: String,
    pub repo: String,
    pub reviewers: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_type_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&ResponseType::InChannel).unwrap(),
            "\"in_channel\""
        );
        assert_eq!(
            serde_json::to_string(&ResponseType::Ephemeral).unwrap(),
            "\"ephemeral\""
        );
    }

    #[test]
    fn command_request_ignores_extra_form_fields() {
        let req: CommandRequest = serde_urlencoded::from_str(
            "channel_id=C1&user_id=U1&command=%2Fgithub&text=subscribe+acme%2Fwidgets&team_id=T1",
        )
        .unwrap();
        assert_eq!(req.command, "/github");
        assert_eq!(req.text, "subscribe acme/widgets");
    }

    #[test]
    fn add_reviewers_request_rejects_unknown_fields() {
        let err = serde_json::from_str::<AddReviewersRequest>(
            r#"{"pull_request_id":1,"org":"acme","repo":"widgets","reviewers":[],"extra":true}"#,
        );
        assert!(err.is_err());
    }
}
