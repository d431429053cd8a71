//! Prompt templates for suggestion generation.

use serde::{Deserialize, Serialize};

use super::sample::Sample;

/// Default cap on objects the model may return.
pub const DEFAULT_MAX_SUGGESTIONS: usize = 5;

/// Keys every returned object must carry.
pub const SUGGESTION_KEYS: [&str; 4] = ["column", "original", "fix", "confidence"];

/// A two-part prompt: the output contract and the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    /// System-level instructions.
    pub system: String,
    /// User-level payload.
    pub user: String,
}

impl Prompt {
    /// Render as a single instruction string for text-only endpoints.
    pub fn to_instruct_string(&self) -> String {
        format!("<s>[INST] {}\n\n{} [/INST]", self.system, self.user)
    }
}

/// Builds suggestion prompts from a sample.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    max_suggestions: usize,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self {
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
        }
    }

    /// Set the cap on returned objects.
    pub fn with_max_suggestions(mut self, max_suggestions: usize) -> Self {
        self.max_suggestions = max_suggestions;
        self
    }

    /// Build the prompt for a sample.
    pub fn build(&self, sample: &Sample) -> Prompt {
        Prompt {
            system: system_prompt(self.max_suggestions),
            user: suggestion_prompt(sample),
        }
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The output contract.
pub fn system_prompt(max_suggestions: usize) -> String {
    format!(
        r#"You are a data quality expert reviewing rows from a CSV file.

## Output Rules
1. Respond with exactly one JSON array and nothing else. No prose, no markdown.
2. Only include values you judge to be incorrect. Skip values that are already correct.
3. Only refer to rows and values that appear in the sample. Never invent rows.
4. Return at most {max_suggestions} objects.
5. Use strict JSON: double-quoted keys and strings, no trailing commas, no comments.
6. If nothing needs fixing, respond with []."#
    )
}

/// The payload: sample rows and the exact target shape.
pub fn suggestion_prompt(sample: &Sample) -> String {
    format!(
        r#"Analyze this CSV sample:
{}

Identify inconsistent categories (e.g. 'N.Y.' vs 'New York') or invalid formats.

Each object in the array must have exactly these keys:
- "{}": the column name
- "{}": the value as it appears in the sample
- "{}": the corrected value
- "{}": a number between 0 and 1

Example:
[{{"column": "city", "original": "N.Y.", "fix": "New York", "confidence": 0.9}}]"#,
        sample.to_json(),
        SUGGESTION_KEYS[0],
        SUGGESTION_KEYS[1],
        SUGGESTION_KEYS[2],
        SUGGESTION_KEYS[3],
    )
}
