use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;

use crate::error::GitHubError;
use crate::models::{PullRequest, Repository, RequestedReviewers, User};
use crate::pagination;

/// Bound on every outbound call so a hung upstream cannot pin a task forever.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const PER_PAGE: u32 = 100;

/// The slice of the GitHub API the bridge uses. One production
/// implementation talks HTTP; tests substitute in-memory fakes.
#[async_trait]
pub trait GitHubApi: Send + Sync {
    /// The user this session is authenticated as.
    async fn current_user(&self) -> Result<User, GitHubError>;

    async fn list_org_repos(&self, org: &str) -> Result<Vec<Repository>, GitHubError>;

    async fn list_open_pulls(&self, org: &str, repo: &str)
    -> Result<Vec<PullRequest>, GitHubError>;

    async fn list_requested_reviewers(
        &self,
        org: &str,
        repo: &str,
        number: u64,
    ) -> Result<Vec<User>, GitHubError>;

    async fn request_reviewers(
        &self,
        org: &str,
        repo: &str,
        number: u64,
        reviewers: &[String],
    ) -> Result<PullRequest, GitHubError>;
}

/// Builds per-token GitHub sessions, one per registered user acting on
/// their own behalf.
pub trait GitHubConnector: Send + Sync {
    fn connect(&self, token: &str) -> Result<Arc<dyn GitHubApi>, GitHubError>;
}

pub struct HttpConnector {
    api_base: String,
}

impl HttpConnector {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
        }
    }
}

impl GitHubConnector for HttpConnector {
    fn connect(&self, token: &str) -> Result<Arc<dyn GitHubApi>, GitHubError> {
        Ok(Arc::new(GitHubClient::new(&self.api_base, token)?))
    }
}

/// reqwest-backed [`GitHubApi`] implementation.
pub struct GitHubClient {
    http: reqwest::Client,
    api_base: String,
    token: String,
}

impl GitHubClient {
    pub fn new(api_base: &str, token: &str) -> Result<Self, GitHubError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );

        let http = reqwest::Client::builder()
            .user_agent("prbridge")
            .default_headers(headers)
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

    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, GitHubError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let message = resp.text().await.unwrap_or_default();
        Err(GitHubError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, GitHubError> {
        let resp = self.authorize(self.http.get(url)).send().await?;
        Ok(Self::check(resp).await?.json().await?)
    }

    /// Follow `Link: rel="next"` until the collection is exhausted.
    async fn get_all_pages<T: DeserializeOwned>(
        &self,
        first_url: String,
    ) -> Result<Vec<T>, GitHubError> {
        let mut items = Vec::new();
        let mut next = Some(first_url);

        while let Some(url) = next {
            let resp = self.authorize(self.http.get(&url)).send().await?;
            let resp = Self::check(resp).await?;
            next = pagination::next_page(resp.headers());
            let mut page: Vec<T> = resp.json().await?;
            items.append(&mut page);
        }

        Ok(items)
    }
}

#[async_trait]
impl GitHubApi for GitHubClient {
    async fn current_user(&self) -> Result<User, GitHubError> {
        self.get_json(&format!("{}/user", self.api_base)).await
    }

    async fn list_org_repos(&self, org: &str) -> Result<Vec<Repository>, GitHubError> {
        self.get_all_pages(format!(
            "{}/orgs/{}/repos?per_page={}",
            self.api_base, org, PER_PAGE
        ))
        .await
    }

    async fn list_open_pulls(
        &self,
        org: &str,
        repo: &str,
    ) -> Result<Vec<PullRequest>, GitHubError> {
        self.get_all_pages(format!(
            "{}/repos/{}/{}/pulls?state=open&per_page={}",
            self.api_base, org, repo, PER_PAGE
        ))
        .await
    }

    async fn list_requested_reviewers(
        &self,
        org: &str,
        repo: &str,
        number: u64,
    ) -> Result<Vec<User>, GitHubError> {
        let reviewers: RequestedReviewers = self
            .get_json(&format!(
                "{}/repos/{}/{}/pulls/{}/requested_reviewers",
                self.api_base, org, repo, number
            ))
            .await?;
        Ok(reviewers.users)
    }

    async fn request_reviewers(
        &self,
        org: &str,
        repo: &str,
        number: u64,
        reviewers: &[String],
    ) -> Result<PullRequest, GitHubError> {
        let url = format!(
            "{}/repos/{}/{}/pulls/{}/requested_reviewers",
            self.api_base, org, repo, number
        );
        let resp = self
            .authorize(self.http.post(&url))
            .json(&serde_json::json!({ "reviewers": reviewers }))
            .send()
            .await?;
        Ok(Self::check(resp).await?.json().await?)
    }
}
