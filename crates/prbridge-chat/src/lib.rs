pub mod client;
pub mod error;
pub mod models;

pub use client::{ChatApi, ChatClient};
pub use error::ChatError;
pub use models::{ChatUser, Post};
