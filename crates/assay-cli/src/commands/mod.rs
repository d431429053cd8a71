//! CLI command implementations.

pub mod analyze;
pub mod serve;

use std::sync::Arc;

use assay::{
    AnthropicProvider, Assay, AssayConfig, GenerationConfig, GenerationError, HuggingFaceProvider,
    MockProvider, OllamaProvider, TextGenerator,
};

use crate::cli::{AnalysisArgs, GenerationArgs, LlmProviderChoice};

/// Build the analysis engine from command-line settings.
pub fn build_assay(
    analysis: &AnalysisArgs,
    generation: &GenerationArgs,
) -> Result<Assay, Box<dyn std::error::Error>> {
    let config = AssayConfig::default()
        .with_row_limits(analysis.min_rows, analysis.max_rows)
        .with_z_score_threshold(analysis.z_threshold)
        .with_sample_size(analysis.sample_size)
        .with_max_suggestions(analysis.max_suggestions);
    config.validate()?;

    let mut assay = Assay::with_config(config);
    if let Some(generator) = build_generator(generation)? {
        assay = assay.with_generator(generator);
    }
    Ok(assay)
}

/// Construct the selected text generator, if any.
pub fn build_generator(
    args: &GenerationArgs,
) -> Result<Option<Arc<dyn TextGenerator>>, GenerationError> {
    let generator: Arc<dyn TextGenerator> = match args.llm {
        LlmProviderChoice::None => return Ok(None),
        LlmProviderChoice::HuggingFace => {
            let token = args.huggingface_token.clone().ok_or_else(|| {
                GenerationError::Config("HUGGINGFACE_API_TOKEN is not set".to_string())
            })?;
            Arc::new(HuggingFaceProvider::with_config(token, generation_config(args, None)))
        }
        LlmProviderChoice::Anthropic => {
            let key = args.anthropic_key.clone().ok_or_else(|| {
                GenerationError::Config("ANTHROPIC_API_KEY is not set".to_string())
            })?;
            match &args.model {
                Some(_) => Arc::new(AnthropicProvider::with_config(key, generation_config(args, None))),
                None => Arc::new(AnthropicProvider::new(key)),
            }
        }
        LlmProviderChoice::Ollama => {
            let mut provider = match &args.model {
                Some(_) => OllamaProvider::with_config(generation_config(args, Some(120))),
                None => OllamaProvider::new(),
            };
            if let Some(host) = &args.ollama_host {
                provider = provider.with_host(host);
            }
            Arc::new(provider)
        }
        LlmProviderChoice::Mock => Arc::new(MockProvider::new()),
    };

    Ok(Some(generator))
}

fn generation_config(args: &GenerationArgs, default_timeout: Option<u64>) -> GenerationConfig {
    let mut config = GenerationConfig::default();
    if let Some(model) = &args.model {
        config = config.with_model(model.clone());
    }
    if let Some(secs) = args.timeout.or(default_timeout) {
        config = config.with_timeout_secs(secs);
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generation(llm: LlmProviderChoice) -> GenerationArgs {
        GenerationArgs {
            llm,
            model: None,
            huggingface_token: None,
            anthropic_key: None,
            ollama_host: None,
            timeout: None,
        }
    }

    fn analysis() -> AnalysisArgs {
        AnalysisArgs {
            min_rows: 20,
            max_rows: 500,
            z_threshold: 3.0,
            sample_size: 5,
            max_suggestions: 5,
        }
    }

    #[test]
    fn test_no_generator() {
        assert!(build_generator(&generation(LlmProviderChoice::None)).unwrap().is_none());
    }

    #[test]
    fn test_missing_key_is_config_error() {
        let err = build_generator(&generation(LlmProviderChoice::HuggingFace))
            .err()
            .unwrap();
        assert!(matches!(err, GenerationError::Config(_)));
    }

    #[test]
    fn test_model_override() {
        let mut args = generation(LlmProviderChoice::HuggingFace);
        args.huggingface_token = Some("hf_test".into());
        args.model = Some("HuggingFaceH4/zephyr-7b-beta".into());
        args.timeout = Some(5);

        let generator = build_generator(&args).unwrap().unwrap();
        assert_eq!(generator.config().model, "HuggingFaceH4/zephyr-7b-beta");
        assert_eq!(generator.config().timeout_secs, 5);
    }

    #[test]
    fn test_invalid_limits_rejected() {
        let mut limits = analysis();
        limits.min_rows = 100;
        limits.max_rows = 10;
        assert!(build_assay(&limits, &generation(LlmProviderChoice::None)).is_err());
    }

    #[test]
    fn test_build_with_mock() {
        let assay = build_assay(&analysis(), &generation(LlmProviderChoice::Mock)).unwrap();
        assert!(assay.generator_name().is_some());
    }
}
