//! Anthropic Claude API provider implementation.

use async_trait::async_trait;
use once_cell::sync::OnceCell;
use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::json;

use super::prompts::Prompt;
use super::provider::{
    GenerationConfig, GenerationError, TextGenerator, build_client, request_error, status_error,
};

/// Anthropic API endpoint.
const API_URL: &str = "https://api.anthropic.com/v1/messages";

/// Anthropic API version.
const API_VERSION: &str = "2023-06-01";

/// Default Claude model.
const DEFAULT_MODEL: &str = "claude-3-5-haiku-latest";

/// Anthropic Claude provider.
pub struct AnthropicProvider {
    client: OnceCell<Client>,
    api_key: String,
    config: GenerationConfig,
}

impl AnthropicProvider {
    /// Create a new Anthropic provider with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_config(
            api_key,
            GenerationConfig::default().with_model(DEFAULT_MODEL),
        )
    }

    /// Create a new Anthropic provider with custom configuration.
    pub fn with_config(api_key: impl Into<String>, config: GenerationConfig) -> Self {
        Self {
            client: OnceCell::new(),
            api_key: api_key.into(),
            config,
        }
    }

    /// Create from environment variable.
    pub fn from_env() -> Result<Self, GenerationError> {
        let api_key = std::env::var("ANTHROPIC_API_KEY").map_err(|_| {
            GenerationError::Config("ANTHROPIC_API_KEY environment variable not set".to_string())
        })?;
        Ok(Self::new(api_key))
    }

    fn client(&self) -> Result<&Client, GenerationError> {
        self.client
            .get_or_try_init(|| build_client(self.config.timeout_secs))
    }

    /// Build headers for API requests.
    fn build_headers(&self) -> Result<HeaderMap, GenerationError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(&self.api_key)
                .map_err(|e| GenerationError::Config(format!("Invalid API key: {}", e)))?,
        );
        headers.insert("anthropic-version", HeaderValue::from_static(API_VERSION));
        Ok(headers)
    }
}

#[async_trait]
impl TextGenerator for AnthropicProvider {
    async fn generate(&self, prompt: &Prompt) -> Result<String, GenerationError> {
        let body = json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "system": prompt.system,
            "messages": [
                {
                    "role": "user",
                    "content": prompt.user
                }
            ]
        });

        let response = self
            .client()?
            .post(API_URL)
            .headers(self.build_headers()?)
            .json(&body)
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

        api_response
            .content
            .into_iter()
            .find(|block| block.content_type == "text")
            .map(|block| block.text)
            .ok_or(GenerationError::EmptyResponse)
    }

    fn config(&self) -> &GenerationConfig {
        &self.config
    }

    fn name(&self) -> &str {
        "anthropic"
    }
}

/// Anthropic API response structure.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    content: Vec<ContentBlock>,
}

/// Content block in API response.
#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    text: String,
}
