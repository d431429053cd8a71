//! Error types for the Assay library.

use std::path::PathBuf;
use thiserror::Error;

use crate::llm::GenerationError;

/// Main error type for Assay operations.
#[derive(Debug, Error)]
pub enum AssayError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Empty file or no data to analyze.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// A data row has more fields than the header.
    #[error("Expected {expected} fields in line {line}, saw {found}")]
    RowTooWide {
        line: u64,
        expected: usize,
        found: usize,
    },

    /// The request was rejected before analysis started.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The text generation endpoint failed.
    ///
    /// The analysis pipeline recovers from this itself; it only surfaces
    /// from calls that talk to a generator directly.
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AssayError {
    /// Returns true if this error was caused by the caller's input rather
    /// than by a failure while processing it.
    pub fn is_client_error(&self) -> bool {
        matches!(self, AssayError::Validation(_))
    }
}

/// Reasons an upload is refused before either analysis layer runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The uploaded file name does not indicate a CSV file.
    #[error("Invalid file format '{filename}'. Please upload a CSV file.")]
    UnsupportedFileType { filename: String },

    /// The dataset is too small or too large to analyze.
    #[error("File size is {rows} rows. Must be between {min} and {max} rows.")]
    RowCount { rows: usize, min: usize, max: usize },
}

/// Result type alias for Assay operations.
pub type Result<T> = std::result::Result<T, AssayError>;
