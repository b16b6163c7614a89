pub mod commands;
pub mod error;
pub mod review;
pub mod reviewers;
pub mod state;
pub mod webhook;


use axum::Router;
use axum::routing::post;

use crate::state::AppState;

/// All routes the bridge serves.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/webhook", post(webhook::handle_webhook))
        .route("/api/v1/pr/reviewers", post(reviewers::add_reviewers))
        .route("/command", post(commands::handle_command))
        .with_state(state)
}
