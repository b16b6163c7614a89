use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct ChatUser {
    pub id: String,
    pub username: String,
}

/// A post as accepted by the chat platform's create-post endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    pub channel_id: String,
    pub message: String,
    /// Custom post type; empty means a plain post.
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub post_type: String,
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    pub props: serde_json::Value,
}

impl Post {
    /// Plain text post with no custom type or props.
    pub fn text(channel_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            message: message.into(),
            post_type: String::new(),
            props: serde_json::Value::Null,
        }
    }
}
