use std::sync::{Arc, RwLock};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting: {0}")]
    Missing(&'static str),
    #[error("invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}

/// Process configuration, read from the environment at boot and on reload.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: String,
    /// GitHub organization whose repositories are watched.
    pub github_org: String,
    /// Token the bridge itself uses for reviewer enrichment on fan-out.
    pub github_token: String,
    /// Base URL of the GitHub REST API.
    pub github_api_base: String,
    /// Shared secret GitHub appends to webhook deliveries as `?secret=`.
    pub webhook_secret: String,
    /// Base URL of the chat platform's REST API.
    pub chat_api_base: String,
    /// Token the bridge authenticates to the chat platform with.
    pub chat_token: String,
    /// Chat username the bridge posts as.
    pub bot_username: String,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = env_or("PRBRIDGE_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::Invalid("PRBRIDGE_PORT", e.to_string()))?;

        Ok(Self {
            host: env_or("PRBRIDGE_HOST", "0.0.0.0"),
            port,
            db_path: env_or("PRBRIDGE_DB_PATH", "prbridge.db"),
            github_org: env_or("PRBRIDGE_GITHUB_ORG", ""),
            github_token: env_or("PRBRIDGE_GITHUB_TOKEN", ""),
            github_api_base: env_or("PRBRIDGE_GITHUB_API_BASE", "https://api.github.com"),
            webhook_secret: env_or("PRBRIDGE_WEBHOOK_SECRET", ""),
            chat_api_base: env_or("PRBRIDGE_CHAT_API_BASE", "http://localhost:8065"),
            chat_token: env_or("PRBRIDGE_CHAT_TOKEN", ""),
            bot_username: env_or("PRBRIDGE_BOT_USERNAME", ""),
        })
    }

    /// A bridge without an organization, a bot identity, or a webhook
    /// secret cannot do anything useful, so these block startup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.github_org.is_empty() {
            return Err(ConfigError::Missing("PRBRIDGE_GITHUB_ORG"));
        }
        if self.bot_username.is_empty() {
            return Err(ConfigError::Missing("PRBRIDGE_BOT_USERNAME"));
        }
        if self.webhook_secret.is_empty() {
            return Err(ConfigError::Missing("PRBRIDGE_WEBHOOK_SECRET"));
        }
        Ok(())
    }
}

/// Shared handle to the live configuration. Readers take a complete
/// snapshot; `reload` swaps the whole snapshot at once so a reader never
/// observes a half-updated config.
#[derive(Clone)]
pub struct ConfigHandle {
    inner: Arc<RwLock<Arc<Config>>>,
}

impl ConfigHandle {
    pub fn new(config: Config) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(config))),
        }
    }

    pub fn snapshot(&self) -> Arc<Config> {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Replace the live configuration. Invalid replacements are rejected
    /// and the previous snapshot stays in effect.
    pub fn reload(&self, config: Config) -> Result<(), ConfigError> {
        config.validate()?;
        let mut slot = self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = Arc::new(config);
        Ok(())
    }
}
