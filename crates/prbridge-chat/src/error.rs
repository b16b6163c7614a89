use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("chat platform returned {status}: {message}")]
    Status { status: u16, message: String },
}
