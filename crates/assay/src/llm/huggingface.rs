//! Hugging Face Inference API provider implementation.

use async_trait::async_trait;
use once_cell::sync::OnceCell;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::prompts::Prompt;
use super::provider::{
    GenerationConfig, GenerationError, TextGenerator, build_client, request_error, status_error,
};

/// Hugging Face Inference API base URL; the model id is appended.
const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co/models";

/// Hugging Face hosted text-generation provider.
pub struct HuggingFaceProvider {
    client: OnceCell<Client>,
    api_token: String,
    base_url: String,
    config: GenerationConfig,
}

impl HuggingFaceProvider {
    /// Create a new provider with the given API token.
    pub fn new(api_token: impl Into<String>) -> Self {
        Self::with_config(api_token, GenerationConfig::default())
    }

    /// Create a new provider with custom configuration.
    pub fn with_config(api_token: impl Into<String>, config: GenerationConfig) -> Self {
        Self {
            client: OnceCell::new(),
            api_token: api_token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            config,
        }
    }

    /// Create from the `HUGGINGFACE_API_TOKEN` environment variable.
    pub fn from_env() -> Result<Self, GenerationError> {
        Self::from_env_with_config(GenerationConfig::default())
    }

    /// Create from the environment with custom configuration.
    pub fn from_env_with_config(config: GenerationConfig) -> Result<Self, GenerationError> {
        let api_token = std::env::var("HUGGINGFACE_API_TOKEN").map_err(|_| {
            GenerationError::Config("HUGGINGFACE_API_TOKEN environment variable not set".to_string())
        })?;
        Ok(Self::with_config(api_token, config))
    }

    /// Point the provider at a different inference endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), self.config.model)
    }

    fn client(&self) -> Result<&Client, GenerationError> {
        self.client
            .get_or_try_init(|| build_client(self.config.timeout_secs))
    }

    fn request_body(&self, prompt: &Prompt) -> serde_json::Value {
        json!({
            "inputs": prompt.to_instruct_string(),
            "parameters": {
                "temperature": self.config.temperature,
                "max_new_tokens": self.config.max_tokens,
                "return_full_text": false
            }
        })
    }
}

#[async_trait]
impl TextGenerator for HuggingFaceProvider {
    async fn generate(&self, prompt: &Prompt) -> Result<String, GenerationError> {
        let response = self
            .client()?
            .post(self.endpoint())
            .bearer_auth(&self.api_token)
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(|e| request_error(e, self.config.timeout_secs))?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Decode(e.to_string()))?;

        let text = api_response.into_text()?;
        debug!(model = %self.config.model, chars = text.len(), "huggingface generation complete");
        Ok(text)
    }

    fn config(&self) -> &GenerationConfig {
        &self.config
    }

    fn name(&self) -> &str {
        "huggingface"
    }
}

/// Text-generation responses come back as a list, a single object, or an error object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ApiResponse {
    Batch(Vec<Generated>),
    Single(Generated),
    Error { error: String },
}

#[derive(Debug, Deserialize)]
struct Generated {
    generated_text: String,
}

impl ApiResponse {
    fn into_text(self) -> Result<String, GenerationError> {
        match self {
            ApiResponse::Batch(items) => items
                .into_iter()
                .next()
                .map(|g| g.generated_text)
                .ok_or(GenerationError::EmptyResponse),
            ApiResponse::Single(g) => Ok(g.generated_text),
            ApiResponse::Error { error } => Err(GenerationError::Status { status: 200, body: error }),
        }
    }
}
