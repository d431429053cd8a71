//! Suggestion types for proposed value corrections.

use serde::{Deserialize, Serialize};

/// A candidate correction for a single value.
///
/// Produced by the sanitizer from generated text, which only keeps entries
/// whose `original` is non-empty and differs from `fix`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Column the value belongs to.
    pub column: String,

    /// The value as it appears in the data.
    pub original: String,

    /// The proposed replacement.
    pub fix: String,

    /// Generator's confidence in the fix, clamped to 0.0-1.0.
    pub confidence: f64,
}

impl Suggestion {
    /// Create a new suggestion. Confidence is clamped to 0.0-1.0, and
    /// non-finite confidence becomes 0.0.
    pub fn new(
        column: impl Into<String>,
        original: impl Into<String>,
        fix: impl Into<String>,
        confidence: f64,
    ) -> Self {
        Self {
            column: column.into(),
            original: original.into(),
            fix: fix.into(),
            confidence: clamp_confidence(confidence),
        }
    }

    /// Returns true if applying the fix would change the value.
    pub fn is_change(&self) -> bool {
        let original = self.original.trim();
        !original.is_empty() && original != self.fix.trim()
    }
}

pub(crate) fn clamp_confidence(confidence: f64) -> f64 {
    if confidence.is_finite() {
        confidence.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_is_clamped() {
        assert_eq!(Suggestion::new("c", "a", "b", 1.7).confidence, 1.0);
        assert_eq!(Suggestion::new("c", "a", "b", -0.2).confidence, 0.0);
        assert_eq!(Suggestion::new("c", "a", "b", f64::NAN).confidence, 0.0);
        assert_eq!(Suggestion::new("c", "a", "b", 0.42).confidence, 0.42);
    }

    #[test]
    fn test_is_change() {
        assert!(Suggestion::new("city", "N.Y.", "New York", 0.9).is_change());
        assert!(!Suggestion::new("city", "Boston", " Boston ", 0.9).is_change());
        assert!(!Suggestion::new("city", "  ", "Boston", 0.9).is_change());
    }
}
