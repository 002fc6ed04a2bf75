//! External language-model boundary.
//!
//! The pipeline only needs prompt-in / text-out. Concrete providers live in
//! submodules; tests substitute their own [`ModelClient`].

mod anthropic;

pub use anthropic::AnthropicClient;

use async_trait::async_trait;
use thiserror::Error;

/// Errors from a model provider.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out")]
    Timeout,
    #[error("rate limited by provider")]
    RateLimited,
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("provider returned HTTP {status}: {message}")]
    Provider { status: u16, message: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ModelError {
    /// Whether a later attempt may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ModelError::Network(_) | ModelError::Timeout | ModelError::RateLimited => true,
            ModelError::Provider { status, .. } => *status >= 500,
            ModelError::Auth(_) | ModelError::InvalidResponse(_) => false,
        }
    }
}

impl From<reqwest::Error> for ModelError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ModelError::Timeout
        } else {
            ModelError::Network(e.to_string())
        }
    }
}

/// A single-shot text completion endpoint.
///
/// Implementations must sample deterministically (temperature 0 unless
/// configured otherwise) and honor their output-token ceiling.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Human-readable provider/model name for logs.
    fn name(&self) -> &str;

    /// Send one prompt and return the completion text.
    async fn complete(&self, prompt: &str) -> Result<String, ModelError>;
}
