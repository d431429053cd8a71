//! Text generation trait and shared client plumbing.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;

use super::prompts::Prompt;

/// Errors from a text generation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// Provider is misconfigured (missing key, bad header value, client build failure).
    #[error("generator misconfigured: {0}")]
    Config(String),

    /// The endpoint could not be reached.
    #[error("request failed: {0}")]
    Transport(String),

    /// The request exceeded the client timeout.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// The endpoint rejected our credentials.
    #[error("endpoint rejected credentials ({0})")]
    Unauthorized(u16),

    /// Any other non-success status.
    #[error("endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The envelope was well-formed but carried no text.
    #[error("endpoint returned no text")]
    EmptyResponse,

    /// The response envelope could not be decoded.
    #[error("failed to decode endpoint response: {0}")]
    Decode(String),
}

/// Configuration shared by all generators.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// Model identifier (provider-specific).
    pub model: String,

    /// Sampling temperature. Kept low: this is structured extraction.
    pub temperature: f64,

    /// Maximum tokens in the response.
    pub max_tokens: usize,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: "mistralai/Mistral-7B-Instruct-v0.3".to_string(),
            temperature: 0.1,
            max_tokens: 512,
            timeout_secs: 30,
        }
    }
}

impl GenerationConfig {
    /// Set the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the maximum response length.
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the request timeout.
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// Trait for text generation endpoints.
///
/// Implementations must be thread-safe (Send + Sync) so one handle can be
/// shared by every concurrent analysis.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate raw text for a prompt.
    ///
    /// The returned text has no structural guarantee; callers are expected
    /// to run it through the sanitizer.
    async fn generate(&self, prompt: &Prompt) -> Result<String, GenerationError>;

    /// Get the configuration for this generator.
    fn config(&self) -> &GenerationConfig;

    /// Get the name of this generator (for logging/debugging).
    fn name(&self) -> &str;
}

/// Build an HTTP client with the configured timeout.
pub(crate) fn build_client(timeout_secs: u64) -> Result<Client, GenerationError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| GenerationError::Config(format!("failed to create HTTP client: {}", e)))
}

/// Classify a transport-level reqwest error.
pub(crate) fn request_error(err: reqwest::Error, timeout_secs: u64) -> GenerationError {
    if err.is_timeout() {
        GenerationError::Timeout(timeout_secs)
    } else {
        GenerationError::Transport(err.to_string())
    }
}

/// Turn a non-success response into a [`GenerationError`].
pub(crate) async fn status_error(response: reqwest::Response) -> GenerationError {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return GenerationError::Unauthorized(status.as_u16());
    }

    let body = response.text().await.unwrap_or_default();
    GenerationError::Status {
        status: status.as_u16(),
        body,
    }
}
