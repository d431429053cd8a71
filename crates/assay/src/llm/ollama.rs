//! Ollama local LLM provider implementation.
//!
//! Ollama allows running LLMs locally without API keys.
//! Install from: https://ollama.ai

use async_trait::async_trait;
use once_cell::sync::OnceCell;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::prompts::Prompt;
use super::provider::{GenerationConfig, GenerationError, TextGenerator, build_client, status_error};

/// Default Ollama API endpoint.
const DEFAULT_API_URL: &str = "http://localhost:11434/api/chat";

/// Default local model.
const DEFAULT_MODEL: &str = "mistral";

/// Ollama local LLM provider.
pub struct OllamaProvider {
    client: OnceCell<Client>,
    api_url: String,
    config: GenerationConfig,
}

impl OllamaProvider {
    /// Create a new Ollama provider with default settings.
    ///
    /// Uses the mistral model by default. Make sure you've pulled it:
    /// `ollama pull mistral`
    pub fn new() -> Self {
        Self::with_model(DEFAULT_MODEL)
    }

    /// Create with a specific model.
    pub fn with_model(model: impl Into<String>) -> Self {
        // Local models can be slower.
        Self::with_config(
            GenerationConfig::default()
                .with_model(model)
                .with_timeout_secs(120),
        )
    }

    /// Create with custom configuration. Honors `OLLAMA_HOST`.
    pub fn with_config(config: GenerationConfig) -> Self {
        let api_url = std::env::var("OLLAMA_HOST")
            .map(|host| api_url_for_host(&host))
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        Self {
            client: OnceCell::new(),
            api_url,
            config,
        }
    }

    /// Point the provider at a specific Ollama host.
    pub fn with_host(mut self, host: &str) -> Self {
        self.api_url = api_url_for_host(host);
        self
    }

    fn client(&self) -> Result<&Client, GenerationError> {
        self.client
            .get_or_try_init(|| build_client(self.config.timeout_secs))
    }
}

impl Default for OllamaProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the chat endpoint for a host, which may omit the scheme as
/// `OLLAMA_HOST` usually does.
fn api_url_for_host(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.contains("://") {
        format!("{}/api/chat", host)
    } else {
        format!("http://{}/api/chat", host)
    }
}

#[async_trait]
impl TextGenerator for OllamaProvider {
    async fn generate(&self, prompt: &Prompt) -> Result<String, GenerationError> {
        let body = json!({
            "model": self.config.model,
            "stream": false,
            "options": {
                "temperature": self.config.temperature,
                "num_predict": self.config.max_tokens
            },
            "messages": [
                {
                    "role": "system",
                    "content": prompt.system
                },
                {
                    "role": "user",
                    "content": prompt.user
                }
            ]
        });

        let response = self
            .client()?
            .post(&self.api_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Timeout(self.config.timeout_secs)
                } else if e.is_connect() {
                    GenerationError::Transport(
                        "Failed to connect to Ollama. Is it running? Start with: ollama serve"
                            .to_string(),
                    )
                } else {
                    GenerationError::Transport(format!("Ollama request failed: {}", e))
                }
            })?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let api_response: OllamaResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Decode(e.to_string()))?;

        Ok(api_response.message.content)
    }

    fn config(&self) -> &GenerationConfig {
        &self.config
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

/// Ollama API response structure.
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    message: OllamaMessage,
}

#[derive(Debug, Deserialize)]
struct OllamaMessage {
    content: String,
}
