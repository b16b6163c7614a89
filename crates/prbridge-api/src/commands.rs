use axum::Json;
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

use prbridge_store::Subscriptions;
use prbridge_types::api::{CommandRequest, CommandResponse};

use crate::review;
use crate::state::AppState;

const COMMAND_TRIGGER: &str = "/github";

/// `POST /command` — the chat platform's outgoing slash-command hook.
///
/// Unrecognized triggers and actions produce an empty 200 so the platform
/// renders nothing.
pub async fn handle_command(
    State(state): State<AppState>,
    Form(req): Form<CommandRequest>,
) -> Response {
    if req.command != COMMAND_TRIGGER {
        return StatusCode::OK.into_response();
    }

    let mut words = req.text.split_whitespace();
    let action = words.next().unwrap_or_default();
    let parameters: Vec<&str> = words.collect();

    match action {
        "subscribe" => subscribe(&state, &req.channel_id, &parameters).await,
        "register" => register(&state, &req.user_id, &parameters).await,
        "deregister" => deregister(&state, &req.user_id).await,
        "todo" => {
            review::spawn(state.clone(), req.user_id.clone());
            respond(CommandResponse::ephemeral(
                "Checking GitHub for your pending PR reviews. Get a :coffee:",
            ))
        }
        _ => StatusCode::OK.into_response(),
    }
}

async fn subscribe(state: &AppState, channel_id: &str, parameters: &[&str]) -> Response {
    let [repository] = parameters else {
        return wrong_parameters();
    };

    let state = state.clone();
    let channel_id = channel_id.to_string();
    let repository = repository.to_string();
    let result = tokio::task::spawn_blocking(move || {
        let mut subscriptions = Subscriptions::load(&state.db);
        subscriptions.add(&channel_id, &repository);
        subscriptions.persist(&state.db)
    })
    .await;

    match result {
        Ok(Ok(())) => respond(CommandResponse::in_channel(
            "You have subscribed to the repository.",
        )),
        Ok(Err(e)) => {
            error!("Failed to persist subscription: {}", e);
            respond(CommandResponse::ephemeral("Failed to save the subscription."))
        }
        Err(e) => {
            error!("spawn_blocking join error: {}", e);
            respond(CommandResponse::ephemeral("Failed to save the subscription."))
        }
    }
}

async fn register(state: &AppState, user_id: &str, parameters: &[&str]) -> Response {
    let [token] = parameters else {
        return wrong_parameters();
    };

    let state = state.clone();
    let user_id = user_id.to_string();
    let token = token.to_string();
    let result =
        tokio::task::spawn_blocking(move || state.db.save_token(&user_id, &token)).await;

    match flatten(result) {
        Ok(()) => respond(CommandResponse::ephemeral("Registered GitHub token.")),
        Err(e) => {
            error!("Failed to store token: {}", e);
            respond(CommandResponse::ephemeral("Failed to store the token."))
        }
    }
}

async fn deregister(state: &AppState, user_id: &str) -> Response {
    let state = state.clone();
    let user_id = user_id.to_string();
    let result = tokio::task::spawn_blocking(move || state.db.delete_token(&user_id)).await;

    match flatten(result) {
        Ok(()) => respond(CommandResponse::ephemeral("Deregistered GitHub token.")),
        Err(e) => {
            error!("Failed to delete token: {}", e);
            respond(CommandResponse::ephemeral("Failed to remove the token."))
        }
    }
}

fn flatten<T>(
    result: Result<anyhow::Result<T>, tokio::task::JoinError>,
) -> anyhow::Result<T> {
    result.map_err(anyhow::Error::from)?
}

fn wrong_parameters() -> Response {
    respond(CommandResponse::ephemeral("Wrong number of parameters."))
}

fn respond(response: CommandResponse) -> Response {
    Json(response).into_response()
}
