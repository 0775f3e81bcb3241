use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenerationError {
    #[error("API key not configured")]
    NoApiKey,
    #[error("text generator unavailable: {0}")]
    Unavailable(String),
    #[error("text generator timed out")]
    Timeout,
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
    #[error("failed to parse generator output: {0}")]
    Parse(String),
}

/// Anything that turns a prompt into text.
///
/// Implementations make exactly one request per call; retries, if any,
/// belong to the caller.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

#[async_trait]
impl<T: TextGenerator + ?Sized> TextGenerator for Box<T> {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        (**self).generate(prompt).await
    }
}

#[async_trait]
impl<T: TextGenerator + ?Sized> TextGenerator for std::sync::Arc<T> {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        (**self).generate(prompt).await
    }
}

/// An absent generator fails every call with [`GenerationError::NoApiKey`].
#[async_trait]
impl<T: TextGenerator> TextGenerator for Option<T> {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        match self {
            Some(generator) => generator.generate(prompt).await,
            None => Err(GenerationError::NoApiKey),
        }
    }
}
