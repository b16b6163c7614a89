use std::sync::Arc;

use prbridge_chat::ChatApi;
use prbridge_github::{GitHubApi, GitHubConnector};
use prbridge_store::Database;
use prbridge_types::config::ConfigHandle;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub config: ConfigHandle,
    /// Chat user id the bridge posts as, resolved from the configured
    /// username at startup.
    pub bot_user_id: String,
    /// GitHub session authenticated with the bridge's own token, used for
    /// reviewer enrichment on fan-out.
    pub github: Arc<dyn GitHubApi>,
    /// Builds per-user GitHub sessions from stored tokens.
    pub connector: Arc<dyn GitHubConnector>,
    pub chat: Arc<dyn ChatApi>,
}
