use thiserror::Error;

#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// GitHub answered with a non-success status. The body text is kept so
    /// callers can surface GitHub's own error message.
    #[error("GitHub returned {status}: {message}")]
    Status { status: u16, message: String },
}
