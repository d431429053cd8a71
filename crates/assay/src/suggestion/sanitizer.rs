//! Turns raw generated text into validated suggestions.
//!
//! Text moves through six stages, in order:
//!
//! 1. [`strip`] surrounding whitespace
//! 2. [`unwrap_fence`] markdown code fences
//! 3. [`anchor_array`] at the first `[`
//! 4. [`balance_brackets`] on truncated output
//! 5. [`decode`] as a JSON array of objects
//! 6. [`retain_changes`] keeps entries that actually change a value
//!
//! Every stage is total. Sanitizing never fails; text that cannot be
//! repaired yields no suggestions.

use std::borrow::Cow;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::suggestion::{Suggestion, clamp_confidence};

const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";

/// A named step of the sanitizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Strip,
    Unwrap,
    Anchor,
    Balance,
    Decode,
    Filter,
}

/// What happened to one piece of generated text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SanitizeOutcome {
    /// Suggestions that survived every stage.
    pub suggestions: Vec<Suggestion>,
    /// Whether the balance stage had to close a truncated array.
    pub repaired: bool,
    /// Stage that rejected the text outright, if any.
    pub failed_at: Option<Stage>,
    /// Decoded entries dropped by the decode and filter stages.
    pub discarded: usize,
}

/// An entry as decoded, before filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSuggestion {
    pub column: String,
    pub original: String,
    pub fix: String,
    pub confidence: Option<f64>,
}

impl RawSuggestion {
    /// Read an entry from a JSON object, coercing fields to text.
    fn from_object(object: &Map<String, Value>) -> Self {
        Self {
            column: field_text(object.get("column")),
            original: field_text(object.get("original")),
            fix: field_text(object.get("fix")),
            confidence: object.get("confidence").and_then(confidence_value),
        }
    }
}

/// Stage 1: trim surrounding whitespace.
pub fn strip(text: &str) -> &str {
    text.trim()
}

/// Stage 2: keep only the body of the first code fence.
///
/// A `json`-tagged fence wins over a bare one. An unclosed fence keeps
/// everything after the opening marker.
pub fn unwrap_fence(text: &str) -> &str {
    let body = if let Some(start) = text.find(JSON_FENCE) {
        &text[start + JSON_FENCE.len()..]
    } else if let Some(start) = text.find(FENCE) {
        &text[start + FENCE.len()..]
    } else {
        return text;
    };

    match body.find(FENCE) {
        Some(end) => body[..end].trim(),
        None => body.trim(),
    }
}

/// Stage 3: drop any commentary before the first `[`.
pub fn anchor_array(text: &str) -> &str {
    match text.find('[') {
        Some(start) => &text[start..],
        None => text,
    }
}

/// Stage 4: close an array cut short by the token limit.
///
/// When `[` outnumbers `]`, everything after the last complete object is
/// dropped and the array is closed. With no complete object the result is
/// an empty array.
pub fn balance_brackets(text: &str) -> Cow<'_, str> {
    let opens = text.matches('[').count();
    let closes = text.matches(']').count();
    if opens <= closes {
        return Cow::Borrowed(text);
    }

    match text.rfind('}') {
        Some(end) => Cow::Owned(format!("{}\n]", &text[..=end])),
        None => Cow::Borrowed("[]"),
    }
}

/// Stage 5: decode a JSON array of objects.
///
/// Only the leading array is read; trailing prose after it is ignored.
/// Elements that are not objects are skipped and counted in the second
/// tuple field.
pub fn decode(text: &str) -> Result<(Vec<RawSuggestion>, usize), serde_json::Error> {
    let mut stream = serde_json::Deserializer::from_str(text).into_iter::<Vec<Value>>();
    let items = match stream.next() {
        Some(result) => result?,
        None => serde_json::from_str::<Vec<Value>>(text)?,
    };

    let mut skipped = 0;
    let entries = items
        .iter()
        .filter_map(|item| match item.as_object() {
            Some(object) => Some(RawSuggestion::from_object(object)),
            None => {
                skipped += 1;
                None
            }
        })
        .collect();

    Ok((entries, skipped))
}

/// Stage 6: keep entries with a non-empty original that the fix changes.
pub fn retain_changes(entries: Vec<RawSuggestion>) -> Vec<Suggestion> {
    entries
        .into_iter()
        .map(|raw| Suggestion {
            column: raw.column,
            original: raw.original,
            fix: raw.fix,
            confidence: raw.confidence.map(clamp_confidence).unwrap_or(0.0),
        })
        .filter(Suggestion::is_change)
        .collect()
}

/// Runs the full stage pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sanitizer;

impl Sanitizer {
    pub fn new() -> Self {
        Self
    }

    /// Sanitize raw text into suggestions.
    pub fn sanitize(&self, raw: &str) -> Vec<Suggestion> {
        self.run(raw).suggestions
    }

    /// Sanitize raw text and report what each stage did.
    pub fn run(&self, raw: &str) -> SanitizeOutcome {
        let text = strip(raw);
        let text = unwrap_fence(text);
        let text = anchor_array(text);
        let balanced = balance_brackets(text);
        let repaired = balanced != text;

        let (entries, skipped) = match decode(&balanced) {
            Ok(decoded) => decoded,
            Err(e) => {
                warn!(error = %e, raw = %raw, "failed to parse generated JSON; discarding");
                return SanitizeOutcome {
                    suggestions: Vec::new(),
                    repaired,
                    failed_at: Some(Stage::Decode),
                    discarded: 0,
                };
            }
        };

        let decoded = entries.len();
        let suggestions = retain_changes(entries);
        let discarded = skipped + (decoded - suggestions.len());

        debug!(
            kept = suggestions.len(),
            discarded,
            repaired,
            "sanitized generated suggestions"
        );

        SanitizeOutcome {
            suggestions,
            repaired,
            failed_at: None,
            discarded,
        }
    }
}

/// Sanitize raw text with the default pipeline.
pub fn sanitize(raw: &str) -> Vec<Suggestion> {
    Sanitizer::new().sanitize(raw)
}

/// Render a field as text: strings as-is, null or absent as empty,
/// anything else as its JSON text.
fn field_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn confidence_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}
