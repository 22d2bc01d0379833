//! Text-generation port for the AI-assist writing feature.

use async_trait::async_trait;

/// A third-party generative-text API behind a server-held credential.
///
/// One attempt per call; failures surface directly to the caller with
/// no automatic retry anywhere in the core.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, TextGenError>;
}

/// Text generation errors.
#[derive(Debug, thiserror::Error)]
pub enum TextGenError {
    #[error("Generation request failed: {0}")]
    Request(String),

    #[error("Malformed generation response: {0}")]
    Malformed(String),
}
