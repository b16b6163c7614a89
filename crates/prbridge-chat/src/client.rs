use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::ChatError;
use crate::models::{ChatUser, Post};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// The slice of the chat platform's REST API the bridge uses.
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// Resolve a username to the platform's user record.
    async fn resolve_user(&self, username: &str) -> Result<ChatUser, ChatError>;

    /// Open (or fetch) the direct channel between two users and return its
    /// channel id.
    async fn direct_channel(&self, user_a: &str, user_b: &str) -> Result<String, ChatError>;

    async fn create_post(&self, post: &Post) -> Result<(), ChatError>;
}

/// reqwest-backed [`ChatApi`] implementation.
pub struct ChatClient {
    http: reqwest::Client,
    api_base: String,
    token: String,
}

#[derive(Deserialize)]
struct ChannelResponse {
    id: String,
}

impl ChatClient {
    pub fn new(api_base: &str, token: &str) -> Result<Self, ChatError> {
        let http = reqwest::Client::builder()
            .user_agent("prbridge")
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if self.token.is_empty() {
            req
        } else {
            req.bearer_auth(&self.token)
        }
    }

    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, ChatError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let message = resp.text().await.unwrap_or_default();
        Err(ChatError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl ChatApi for ChatClient {
    async fn resolve_user(&self, username: &str) -> Result<ChatUser, ChatError> {
        let url = format!("{}/api/v4/users/username/{}", self.api_base, username);
        let resp = self.authorize(self.http.get(&url)).send().await?;
        Ok(Self::check(resp).await?.json().await?)
    }

    async fn direct_channel(&self, user_a: &str, user_b: &str) -> Result<String, ChatError> {
        let url = format!("{}/api/v4/channels/direct", self.api_base);
        let resp = self
            .authorize(self.http.post(&url))
            .json(&[user_a, user_b])
            .send()
            .await?;
        let channel: ChannelResponse = Self::check(resp).await?.json().await?;
        Ok(channel.id)
    }

    async fn create_post(&self, post: &Post) -> Result<(), ChatError> {
        let url = format!("{}/api/v4/posts", self.api_base);
        let resp = self.authorize(self.http.post(&url)).json(post).send().await?;
        Self::check(resp).await?;
        Ok(())
    }
}
