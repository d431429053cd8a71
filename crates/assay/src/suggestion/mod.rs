//! Suggested value corrections and the sanitizer that produces them.
//!
//! Generated text is untrusted. Suggestions only come into existence by
//! passing through [`Sanitizer`].

pub mod sanitizer;
mod suggestion;

pub use sanitizer::{RawSuggestion, SanitizeOutcome, Sanitizer, Stage, sanitize};
pub use suggestion::Suggestion;
