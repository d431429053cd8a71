//! Assay: data quality analysis for CSV datasets.
//!
//! A report has two layers. A deterministic detector counts missing values,
//! duplicate rows and numeric outliers. An optional text generator proposes
//! value corrections, which pass through a defensive sanitizer before they
//! reach the report.
//!
//! # Core Principles
//!
//! - **Deterministic first**: rule-based issues never depend on the generator
//! - **Best-effort generation**: generator failures degrade to no suggestions
//! - **Untrusted output**: generated text is repaired and validated, never trusted
//!
//! # Example
//!
//! ```no_run
//! use assay::{Assay, Identity};
//!
//! # async fn run() -> assay::Result<()> {
//! let assay = Assay::new();
//! let report = assay
//!     .analyze_file("customers.csv", &Identity::new("local"))
//!     .await?;
//!
//! println!("Rows: {}", report.total_rows);
//! for issue in &report.issues_detected {
//!     println!("{}: {} ({})", issue.column, issue.kind, issue.count);
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod detect;
pub mod error;
pub mod input;
pub mod inspect;
pub mod llm;
pub mod suggestion;

mod assay;

pub use crate::assay::{
    AnalysisReport, Assay, AssayConfig, CLEAN_COMPLETE_MESSAGE, CleanResponse, RowLimits,
};
pub use auth::{AuthError, Authenticator, Identity, StaticTokenAuthenticator};
pub use detect::{DetectorConfig, Issue, IssueKind, RuleDetector};
pub use error::{AssayError, Result, ValidationError};
pub use input::{DataTable, Parser, ParserConfig, SourceMetadata};
pub use inspect::{ColumnInspector, ColumnKind, ColumnProfile};
pub use llm::{
    AnthropicProvider, GenerationConfig, GenerationError, HuggingFaceProvider, MockProvider,
    OllamaProvider, TextGenerator,
};
pub use suggestion::{Sanitizer, Suggestion, sanitize};
