use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Synchronous failures surfaced to HTTP callers. Bodies are plain text so
/// upstream error messages pass through unchanged.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not authorized")]
    Unauthorized,
    #[error("No GitHub token registered for this user")]
    NotRegistered,
    #[error("{0}")]
    Malformed(String),
    #[error("{0}")]
    Upstream(String),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotRegistered | ApiError::Malformed(_) | ApiError::Upstream(_) => {
                StatusCode::BAD_REQUEST
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), self.to_string()).into_response()
    }
}
