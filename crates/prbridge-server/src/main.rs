use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use prbridge_api::state::AppStateInner;
use prbridge_chat::{ChatApi, ChatClient};
use prbridge_github::{GitHubClient, HttpConnector};
use prbridge_store::Database;
use prbridge_types::config::{Config, ConfigHandle};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "prbridge=debug,tower_http=debug".into()),
        )
        .init();

    // Config — an incomplete config blocks activation
    let config = Config::from_env()?;
    config.validate()?;

    let db = Database::open(&PathBuf::from(&config.db_path))?;

    let chat = Arc::new(ChatClient::new(&config.chat_api_base, &config.chat_token)?);

    // Resolve the bot's chat identity up front; posting needs its user id.
    let bot_user = chat
        .resolve_user(&config.bot_username)
        .await
        .with_context(|| format!("resolving bot user {:?}", config.bot_username))?;
    info!("Posting as {} ({})", bot_user.username, bot_user.id);

    let github = Arc::new(GitHubClient::new(
        &config.github_api_base,
        &config.github_token,
    )?);
    let connector = Arc::new(HttpConnector::new(config.github_api_base.clone()));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    let config = ConfigHandle::new(config);
    spawn_reload_listener(config.clone());

    let state = Arc::new(AppStateInner {
        db,
        config,
        bot_user_id: bot_user.id,
        github,
        connector,
        chat,
    });

    let app = prbridge_api::router(state).layer(TraceLayer::new_for_http());

    info!("prbridge listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Re-read the environment on SIGHUP and swap the config snapshot. Invalid
/// replacements are rejected and the running snapshot stays in effect.
fn spawn_reload_listener(config: ConfigHandle) {
    tokio::spawn(async move {
        let mut hangup =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::hangup()) {
                Ok(signal) => signal,
                Err(e) => {
                    warn!("SIGHUP handler unavailable, config reload disabled: {}", e);
                    return;
                }
            };

        while hangup.recv().await.is_some() {
            let outcome = Config::from_env()
                .map_err(|e| e.to_string())
                .and_then(|next| config.reload(next).map_err(|e| e.to_string()));
            match outcome {
                Ok(()) => info!("Configuration reloaded"),
                Err(e) => error!("Rejected config reload: {}", e),
            }
        }
    });
}
