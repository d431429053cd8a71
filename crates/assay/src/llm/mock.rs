//! Mock generator for testing.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::prompts::Prompt;
use super::provider::{GenerationConfig, GenerationError, TextGenerator};

/// What the mock hands back on every call.
#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Fail(GenerationError),
}

/// Mock generator that returns predictable responses for testing.
///
/// The default reply mimics a chatty model: commentary, a fenced block and
/// an empty array, which sanitizes to no suggestions.
pub struct MockProvider {
    config: GenerationConfig,
    reply: Reply,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<Prompt>>,
}

impl MockProvider {
    /// Create a new mock provider.
    pub fn new() -> Self {
        Self::with_response("Here is the JSON:\n```json\n[]\n```")
    }

    /// Always return `text`.
    pub fn with_response(text: impl Into<String>) -> Self {
        Self::with_reply(Reply::Text(text.into()))
    }

    /// Always fail with `error`.
    pub fn failing(error: GenerationError) -> Self {
        Self::with_reply(Reply::Fail(error))
    }

    fn with_reply(reply: Reply) -> Self {
        Self {
            config: GenerationConfig::default().with_model("mock"),
            reply,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    /// Number of times `generate` was called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The most recent prompt received.
    pub fn last_prompt(&self) -> Option<Prompt> {
        self.last_prompt.lock().ok().and_then(|p| p.clone())
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextGenerator for MockProvider {
    async fn generate(&self, prompt: &Prompt) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_prompt.lock() {
            *last = Some(prompt.clone());
        }

        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Fail(err) => Err(err.clone()),
        }
    }

    fn config(&self) -> &GenerationConfig {
        &self.config
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompt() -> Prompt {
        Prompt {
            system: "s".to_string(),
            user: "u".to_string(),
        }
    }

    #[tokio::test]
    async fn test_canned_text() {
        let mock = MockProvider::with_response("[1]");
        assert_eq!(mock.generate(&prompt()).await.unwrap(), "[1]");
        assert_eq!(mock.calls(), 1);
        assert_eq!(mock.last_prompt(), Some(prompt()));
    }

    #[tokio::test]
    async fn test_canned_failure() {
        let mock = MockProvider::failing(GenerationError::Timeout(30));
        assert_eq!(
            mock.generate(&prompt()).await,
            Err(GenerationError::Timeout(30))
        );
        assert_eq!(mock.calls(), 1);
    }
}
