use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Token {
    pub access_token: String,
    pub expires_in: i64,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authentication failed: {0}")]
    Failed(String),
}

#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn request_token(&self) -> Result<Token, AuthError>;
}
