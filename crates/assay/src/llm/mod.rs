//! Text generation for candidate value corrections.
//!
//! The generation layer is best-effort: any failure here degrades to an
//! empty suggestion list and never blocks the rule-based report.
//!
//! # Supported Providers
//!
//! - **Hugging Face** - hosted inference (requires `HUGGINGFACE_API_TOKEN`)
//! - **Anthropic** - Claude models via API (requires `ANTHROPIC_API_KEY`)
//! - **Ollama** - Local models, no API key needed (requires Ollama installed)
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use assay::{Assay, OllamaProvider};
//!
//! let assay = Assay::new().with_generator(Arc::new(OllamaProvider::new()));
//! ```

mod anthropic;
mod huggingface;
mod mock;
mod ollama;
pub mod prompts;
mod provider;
pub mod sample;

pub use anthropic::AnthropicProvider;
pub use huggingface::HuggingFaceProvider;
pub use mock::MockProvider;
pub use ollama::OllamaProvider;
pub use prompts::{
    DEFAULT_MAX_SUGGESTIONS, Prompt, PromptBuilder, SUGGESTION_KEYS, suggestion_prompt,
    system_prompt,
};
pub use provider::{GenerationConfig, GenerationError, TextGenerator};
pub use sample::{DEFAULT_SAMPLE_SIZE, Sample};
