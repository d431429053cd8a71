//! Main Assay struct and public API.

use std::path::Path;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::auth::Identity;
use crate::detect::{DetectorConfig, Issue, RuleDetector};
use crate::error::{AssayError, Result, ValidationError};
use crate::input::{DataTable, Parser, ParserConfig, SourceMetadata};
use crate::inspect::ColumnProfile;
use crate::llm::{DEFAULT_MAX_SUGGESTIONS, DEFAULT_SAMPLE_SIZE, PromptBuilder, Sample, TextGenerator};
use crate::suggestion::{Sanitizer, Suggestion};

/// Message returned by [`Assay::clean`].
pub const CLEAN_COMPLETE_MESSAGE: &str = "AI Cleaning Complete";

/// Inclusive bounds on the number of data rows accepted for analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowLimits {
    pub min: usize,
    pub max: usize,
}

impl RowLimits {
    pub fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, rows: usize) -> bool {
        (self.min..=self.max).contains(&rows)
    }

    /// Reject `rows` unless it falls within the bounds.
    pub fn check(&self, rows: usize) -> std::result::Result<(), ValidationError> {
        if self.contains(rows) {
            Ok(())
        } else {
            Err(ValidationError::RowCount {
                rows,
                min: self.min,
                max: self.max,
            })
        }
    }
}

impl Default for RowLimits {
    fn default() -> Self {
        Self { min: 20, max: 500 }
    }
}

/// Configuration for Assay analysis.
#[derive(Debug, Clone)]
pub struct AssayConfig {
    /// Accepted dataset sizes.
    pub row_limits: RowLimits,
    /// Detector thresholds.
    pub detector: DetectorConfig,
    /// Rows sent to the generator.
    pub sample_size: usize,
    /// Upper bound on suggestions requested from the generator.
    pub max_suggestions: usize,
    /// Parser configuration.
    pub parser: ParserConfig,
}

impl Default for AssayConfig {
    fn default() -> Self {
        Self {
            row_limits: RowLimits::default(),
            detector: DetectorConfig::default(),
            sample_size: DEFAULT_SAMPLE_SIZE,
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
            parser: ParserConfig::default(),
        }
    }
}

impl AssayConfig {
    pub fn with_row_limits(mut self, min: usize, max: usize) -> Self {
        self.row_limits = RowLimits::new(min, max);
        self
    }

    pub fn with_z_score_threshold(mut self, threshold: f64) -> Self {
        self.detector.z_score_threshold = threshold;
        self
    }

    pub fn with_sample_size(mut self, size: usize) -> Self {
        self.sample_size = size;
        self
    }

    pub fn with_max_suggestions(mut self, max: usize) -> Self {
        self.max_suggestions = max;
        self
    }

    pub fn with_parser(mut self, parser: ParserConfig) -> Self {
        self.parser = parser;
        self
    }

    /// Check that the settings are usable.
    pub fn validate(&self) -> Result<()> {
        if self.row_limits.min > self.row_limits.max {
            return Err(AssayError::Config(format!(
                "minimum row count {} exceeds maximum {}",
                self.row_limits.min, self.row_limits.max
            )));
        }
        let z = self.detector.z_score_threshold;
        if !z.is_finite() || z <= 0.0 {
            return Err(AssayError::Config(format!(
                "z-score threshold must be a positive number, got {}",
                z
            )));
        }
        Ok(())
    }
}

/// Combined result of both analysis layers.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// File name as uploaded.
    pub filename: String,
    /// Email of the caller, or "Unknown".
    pub user: String,
    /// Number of data rows.
    pub total_rows: usize,
    /// Rule-based findings.
    pub issues_detected: Vec<Issue>,
    /// Generated corrections that survived sanitization.
    pub suggestions: Vec<Suggestion>,
    /// Metadata about the payload.
    pub source: SourceMetadata,
}

/// Result of [`Assay::clean`].
#[derive(Debug, Clone, Serialize)]
pub struct CleanResponse {
    pub message: String,
    pub user: String,
    pub cleaned_preview: Vec<Suggestion>,
}

/// The main Assay analysis engine.
pub struct Assay {
    config: AssayConfig,
    parser: Parser,
    detector: RuleDetector,
    prompts: PromptBuilder,
    sanitizer: Sanitizer,
    generator: Option<Arc<dyn TextGenerator>>,
}

impl Assay {
    /// Create a new Assay instance with default configuration.
    pub fn new() -> Self {
        Self::with_config(AssayConfig::default())
    }

    /// Create an Assay instance with custom configuration.
    pub fn with_config(config: AssayConfig) -> Self {
        let parser = Parser::with_config(config.parser.clone());
        let detector = RuleDetector::with_config(config.detector.clone());
        let prompts = PromptBuilder::new().with_max_suggestions(config.max_suggestions);

        Self {
            config,
            parser,
            detector,
            prompts,
            sanitizer: Sanitizer::new(),
            generator: None,
        }
    }

    /// Attach a text generator for value-correction suggestions.
    ///
    /// Without one, reports carry an empty suggestion list.
    pub fn with_generator(mut self, generator: Arc<dyn TextGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn config(&self) -> &AssayConfig {
        &self.config
    }

    /// Name of the attached generator, if any.
    pub fn generator_name(&self) -> Option<&str> {
        self.generator.as_deref().map(|g| g.name())
    }

    /// Analyze an uploaded CSV payload.
    ///
    /// The file name and row count are checked before either layer runs.
    pub async fn analyze_bytes(
        &self,
        filename: &str,
        bytes: &[u8],
        identity: &Identity,
    ) -> Result<AnalysisReport> {
        if !is_csv_filename(filename) {
            return Err(ValidationError::UnsupportedFileType {
                filename: filename.to_string(),
            }
            .into());
        }

        let (table, source) = self.parser.parse_bytes(filename, bytes)?;
        self.config.row_limits.check(table.row_count())?;

        let profiles = self.detector.profile(&table);
        let issues_detected = self.detector.detect_with_profiles(&table, &profiles);
        let suggestions = self.suggest_with_profiles(&table, &profiles).await;

        info!(
            file = %filename,
            user = %identity.display_email(),
            rows = table.row_count(),
            issues = issues_detected.len(),
            suggestions = suggestions.len(),
            "analysis complete"
        );

        Ok(AnalysisReport {
            filename: filename.to_string(),
            user: identity.display_email().to_string(),
            total_rows: table.row_count(),
            issues_detected,
            suggestions,
            source,
        })
    }

    /// Read and analyze a local file.
    pub async fn analyze_file(
        &self,
        path: impl AsRef<Path>,
        identity: &Identity,
    ) -> Result<AnalysisReport> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|e| AssayError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let filename = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        self.analyze_bytes(&filename, &bytes, identity).await
    }

    /// Run the generative layer only.
    ///
    /// Never fails: generation errors are logged and yield no suggestions.
    pub async fn suggest(&self, table: &DataTable) -> Vec<Suggestion> {
        let profiles = self.detector.profile(table);
        self.suggest_with_profiles(table, &profiles).await
    }

    /// Produce a suggestion preview for JSON row records.
    ///
    /// Row limits do not apply here.
    pub async fn clean(
        &self,
        rows: &[IndexMap<String, Value>],
        identity: &Identity,
    ) -> CleanResponse {
        let table = DataTable::from_records(rows);
        let cleaned_preview = self.suggest(&table).await;

        info!(
            user = %identity.display_email(),
            rows = table.row_count(),
            suggestions = cleaned_preview.len(),
            "clean preview complete"
        );

        CleanResponse {
            message: CLEAN_COMPLETE_MESSAGE.to_string(),
            user: identity.display_email().to_string(),
            cleaned_preview,
        }
    }

    async fn suggest_with_profiles(
        &self,
        table: &DataTable,
        profiles: &[ColumnProfile],
    ) -> Vec<Suggestion> {
        let Some(generator) = &self.generator else {
            return Vec::new();
        };

        let sample = Sample::head_with_profiles(table, profiles, self.config.sample_size);
        if sample.is_empty() {
            return Vec::new();
        }

        let prompt = self.prompts.build(&sample);
        debug!(generator = generator.name(), rows = sample.len(), "requesting suggestions");

        match generator.generate(&prompt).await {
            Ok(raw) => self.sanitizer.sanitize(&raw),
            Err(e) => {
                warn!(generator = generator.name(), error = %e, "suggestion generation failed");
                Vec::new()
            }
        }
    }
}

impl Default for Assay {
    fn default() -> Self {
        Self::new()
    }
}

fn is_csv_filename(filename: &str) -> bool {
    filename.to_ascii_lowercase().ends_with(".csv")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::IssueKind;
    use crate::llm::{GenerationError, MockProvider};

    fn user() -> Identity {
        Identity::new("u1").with_email("ada@example.com")
    }

    fn csv_with_rows(n: usize) -> String {
        let mut csv = String::from("id,name,score\n");
        for i in 0..n {
            csv.push_str(&format!("{},name{},{}\n", i + 1, i, 50 + i % 4));
        }
        csv
    }

    /// 25 rows, three blank cities, one extreme age.
    fn quality_fixture() -> String {
        let mut csv = String::from("id,city,age\n");
        for i in 0..25 {
            let city = if matches!(i, 3 | 9 | 17) { "" } else { "Boston" };
            let age = if i == 12 { 1000 } else { 30 + i % 3 };
            csv.push_str(&format!("{},{},{}\n", i + 1, city, age));
        }
        csv
    }

    #[test]
    fn test_csv_filename() {
        assert!(is_csv_filename("data.csv"));
        assert!(is_csv_filename("DATA.CSV"));
        assert!(!is_csv_filename("data.tsv"));
        assert!(!is_csv_filename("csv"));
    }

    #[test]
    fn test_row_limits() {
        let limits = RowLimits::default();
        assert!(limits.check(19).is_err());
        assert!(limits.check(20).is_ok());
        assert!(limits.check(500).is_ok());
        assert_eq!(
            limits.check(501),
            Err(ValidationError::RowCount {
                rows: 501,
                min: 20,
                max: 500
            })
        );
    }

    #[test]
    fn test_config_validate() {
        assert!(AssayConfig::default().validate().is_ok());
        assert!(AssayConfig::default().with_row_limits(10, 5).validate().is_err());
        assert!(AssayConfig::default().with_z_score_threshold(0.0).validate().is_err());
    }

    #[tokio::test]
    async fn test_end_to_end_report() {
        let assay = Assay::new();
        let report = assay
            .analyze_bytes("people.csv", quality_fixture().as_bytes(), &user())
            .await
            .unwrap();

        assert_eq!(report.total_rows, 25);
        assert_eq!(report.user, "ada@example.com");
        assert_eq!(
            report.issues_detected,
            vec![
                Issue::new("city", IssueKind::MissingValues, 3),
                Issue::new("age", IssueKind::Outliers, 1),
            ]
        );
        assert!(report.suggestions.is_empty());
        assert_eq!(report.source.row_count, 25);
    }

    #[tokio::test]
    async fn test_row_bounds() {
        let assay = Assay::new();

        let err = assay
            .analyze_bytes("small.csv", csv_with_rows(19).as_bytes(), &user())
            .await
            .unwrap_err();
        assert!(err.is_client_error());
        assert_eq!(
            err.to_string(),
            "File size is 19 rows. Must be between 20 and 500 rows."
        );

        let report = assay
            .analyze_bytes("ok.csv", csv_with_rows(20).as_bytes(), &user())
            .await
            .unwrap();
        assert_eq!(report.total_rows, 20);
    }

    #[tokio::test]
    async fn test_header_only_is_rejected_by_row_limits() {
        let assay = Assay::new();
        let err = assay
            .analyze_bytes("empty.csv", b"a,b,c\n", &user())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AssayError::Validation(ValidationError::RowCount { rows: 0, .. })
        ));
    }

    #[tokio::test]
    async fn test_wrong_extension_skips_generation() {
        let mock = Arc::new(MockProvider::new());
        let assay = Assay::new().with_generator(mock.clone());

        let err = assay
            .analyze_bytes("data.xlsx", csv_with_rows(25).as_bytes(), &user())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AssayError::Validation(ValidationError::UnsupportedFileType { .. })
        ));

        let err = assay
            .analyze_bytes("data.csv", csv_with_rows(5).as_bytes(), &user())
            .await
            .unwrap_err();
        assert!(err.is_client_error());
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn test_suggestions_are_sanitized() {
        let mock = Arc::new(MockProvider::with_response(
            "Sure!\n```json\n[{\"column\":\"city\",\"original\":\"bostn\",\"fix\":\"Boston\",\"confidence\":0.8},\
             {\"column\":\"city\",\"original\":\"Boston\",\"fix\":\"Boston\",\"confidence\":1.0}]\n```",
        ));
        let assay = Assay::new().with_generator(mock.clone());

        let report = assay
            .analyze_bytes("people.csv", quality_fixture().as_bytes(), &user())
            .await
            .unwrap();

        assert_eq!(
            report.suggestions,
            vec![Suggestion::new("city", "bostn", "Boston", 0.8)]
        );
        assert_eq!(mock.calls(), 1);

        let prompt = mock.last_prompt().unwrap();
        assert!(prompt.user.contains("Boston"));
        assert!(!prompt.user.contains("null"));
    }

    #[tokio::test]
    async fn test_generation_failure_degrades() {
        let mock = Arc::new(MockProvider::failing(GenerationError::Timeout(30)));
        let assay = Assay::new().with_generator(mock.clone());

        let report = assay
            .analyze_bytes("people.csv", quality_fixture().as_bytes(), &user())
            .await
            .unwrap();

        assert_eq!(report.issues_detected.len(), 2);
        assert!(report.suggestions.is_empty());
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn test_clean_ignores_row_limits() {
        let mock = Arc::new(MockProvider::with_response(
            r#"[{"column":"name","original":"jon","fix":"Jon","confidence":"0.7"}]"#,
        ));
        let assay = Assay::new().with_generator(mock);

        let rows: Vec<IndexMap<String, Value>> = vec![
            serde_json::from_str(r#"{"name":"jon","age":4}"#).unwrap(),
        ];
        let response = assay.clean(&rows, &Identity::new("u2")).await;

        assert_eq!(response.message, CLEAN_COMPLETE_MESSAGE);
        assert_eq!(response.user, "Unknown");
        assert_eq!(
            response.cleaned_preview,
            vec![Suggestion::new("name", "jon", "Jon", 0.7)]
        );
    }

    #[tokio::test]
    async fn test_clean_without_rows_skips_generation() {
        let mock = Arc::new(MockProvider::new());
        let assay = Assay::new().with_generator(mock.clone());

        let response = assay.clean(&[], &user()).await;
        assert!(response.cleaned_preview.is_empty());
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn test_analyze_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("people.csv");
        std::fs::write(&path, quality_fixture()).unwrap();

        let report = Assay::new().analyze_file(&path, &user()).await.unwrap();
        assert_eq!(report.filename, "people.csv");
        assert_eq!(report.total_rows, 25);

        let missing = Assay::new()
            .analyze_file(dir.path().join("nope.csv"), &user())
            .await;
        assert!(matches!(missing, Err(AssayError::Io { .. })));
    }
}
