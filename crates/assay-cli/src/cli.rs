//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Assay: data quality analysis for CSV datasets
#[derive(Parser)]
#[command(name = "assay")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log level when RUST_LOG is unset (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP analysis server
    Serve {
        /// Port for web server
        #[arg(short, long, default_value = "8000", env = "PORT")]
        port: u16,

        /// Address to bind
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Bearer tokens as `token=uid:email:name`, comma separated
        #[arg(long, env = "ASSAY_AUTH_TOKENS", default_value = "", hide_env_values = true)]
        auth_tokens: String,

        #[command(flatten)]
        generation: GenerationArgs,

        #[command(flatten)]
        analysis: AnalysisArgs,
    },

    /// Analyze a local CSV file
    Analyze {
        /// Path to the data file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Write the JSON report to this path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Email recorded as the report's user
        #[arg(long)]
        user: Option<String>,

        #[command(flatten)]
        generation: GenerationArgs,

        #[command(flatten)]
        analysis: AnalysisArgs,
    },
}

/// Text generator selection.
#[derive(Args, Clone, Debug)]
pub struct GenerationArgs {
    /// LLM provider used for value suggestions
    #[arg(long, default_value = "none", env = "ASSAY_LLM")]
    pub llm: LlmProviderChoice,

    /// Model to use (provider-specific, e.g., "mistralai/Mistral-7B-Instruct-v0.3", "llama3.2")
    #[arg(long, env = "ASSAY_MODEL")]
    pub model: Option<String>,

    /// Hugging Face inference token
    #[arg(long, env = "HUGGINGFACE_API_TOKEN", hide_env_values = true)]
    pub huggingface_token: Option<String>,

    /// Anthropic API key
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    pub anthropic_key: Option<String>,

    /// Ollama host (e.g., 127.0.0.1:11434 or http://gpu-box:11434)
    #[arg(long, env = "OLLAMA_HOST")]
    pub ollama_host: Option<String>,

    /// Generation request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

/// Analysis thresholds.
#[derive(Args, Clone, Debug)]
pub struct AnalysisArgs {
    /// Smallest accepted dataset, in rows
    #[arg(long, default_value = "20", env = "ASSAY_MIN_ROWS")]
    pub min_rows: usize,

    /// Largest accepted dataset, in rows
    #[arg(long, default_value = "500", env = "ASSAY_MAX_ROWS")]
    pub max_rows: usize,

    /// Absolute z-score above which a value is an outlier
    #[arg(long, default_value = "3.0", env = "ASSAY_Z_THRESHOLD")]
    pub z_threshold: f64,

    /// Rows sent to the generator
    #[arg(long, default_value = "5", env = "ASSAY_SAMPLE_SIZE")]
    pub sample_size: usize,

    /// Most suggestions requested from the generator
    #[arg(long, default_value = "5")]
    pub max_suggestions: usize,
}

/// LLM provider choice for suggestions
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LlmProviderChoice {
    /// No LLM - rule-based analysis only
    #[default]
    None,
    /// Hugging Face hosted inference (requires HUGGINGFACE_API_TOKEN)
    HuggingFace,
    /// Anthropic Claude API (requires ANTHROPIC_API_KEY)
    Anthropic,
    /// Ollama local models (requires Ollama running)
    Ollama,
    /// Mock provider for testing
    Mock,
}

impl std::str::FromStr for LlmProviderChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(LlmProviderChoice::None),
            "huggingface" | "hf" => Ok(LlmProviderChoice::HuggingFace),
            "anthropic" | "claude" => Ok(LlmProviderChoice::Anthropic),
            "ollama" | "local" => Ok(LlmProviderChoice::Ollama),
            "mock" | "test" => Ok(LlmProviderChoice::Mock),
            _ => Err(format!(
                "Unknown provider: {}. Use: none, huggingface, anthropic, ollama, or mock.",
                s
            )),
        }
    }
}

impl std::fmt::Display for LlmProviderChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmProviderChoice::None => write!(f, "none"),
            LlmProviderChoice::HuggingFace => write!(f, "huggingface"),
            LlmProviderChoice::Anthropic => write!(f, "anthropic"),
            LlmProviderChoice::Ollama => write!(f, "ollama"),
            LlmProviderChoice::Mock => write!(f, "mock"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_provider_aliases() {
        assert_eq!("HF".parse(), Ok(LlmProviderChoice::HuggingFace));
        assert_eq!("claude".parse(), Ok(LlmProviderChoice::Anthropic));
        assert_eq!("local".parse(), Ok(LlmProviderChoice::Ollama));
        assert!("gpt".parse::<LlmProviderChoice>().is_err());
    }

    #[test]
    fn test_analyze_args() {
        let cli = Cli::try_parse_from([
            "assay",
            "analyze",
            "data.csv",
            "--llm",
            "mock",
            "--min-rows",
            "5",
            "--user",
            "ada@example.com",
        ])
        .unwrap();

        match cli.command {
            Commands::Analyze {
                file,
                user,
                generation,
                analysis,
                ..
            } => {
                assert_eq!(file, PathBuf::from("data.csv"));
                assert_eq!(user.as_deref(), Some("ada@example.com"));
                assert_eq!(generation.llm, LlmProviderChoice::Mock);
                assert_eq!(analysis.min_rows, 5);
            }
            _ => panic!("expected analyze"),
        }
    }
}
