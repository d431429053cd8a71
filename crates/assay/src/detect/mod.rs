//! Rule-based detection of data quality issues.
//!
//! Issues are reported in a fixed order: missing values in column order,
//! then table-wide duplicate rows, then outliers in column order.

mod checks;
mod issue;

use tracing::debug;

use crate::input::DataTable;
use crate::inspect::{ColumnInspector, ColumnProfile};

pub use checks::{Check, DuplicateRowsCheck, MissingValuesCheck, OutlierCheck};
pub use issue::{ALL_COLUMNS, Issue, IssueKind};

/// Tunable thresholds for the detector.
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// Absolute standardized score above which a value is an outlier.
    pub z_score_threshold: f64,
    /// Whether to report duplicate rows.
    pub detect_duplicates: bool,
    /// Whether to scan numeric columns for outliers.
    pub detect_outliers: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            z_score_threshold: 3.0,
            detect_duplicates: true,
            detect_outliers: true,
        }
    }
}

/// Runs the rule-based checks over a table.
pub struct RuleDetector {
    inspector: ColumnInspector,
    checks: Vec<Box<dyn Check + Send + Sync>>,
}

impl RuleDetector {
    /// Create a detector with default thresholds.
    pub fn new() -> Self {
        Self::with_config(DetectorConfig::default())
    }

    /// Create a detector with custom thresholds.
    pub fn with_config(config: DetectorConfig) -> Self {
        let mut checks: Vec<Box<dyn Check + Send + Sync>> = vec![Box::new(MissingValuesCheck)];
        if config.detect_duplicates {
            checks.push(Box::new(DuplicateRowsCheck));
        }
        if config.detect_outliers {
            checks.push(Box::new(OutlierCheck {
                z_score_threshold: config.z_score_threshold,
            }));
        }

        Self {
            inspector: ColumnInspector::new(),
            checks,
        }
    }

    /// Profile the table's columns.
    pub fn profile(&self, table: &DataTable) -> Vec<ColumnProfile> {
        self.inspector.inspect(table)
    }

    /// Detect issues in the table.
    pub fn detect(&self, table: &DataTable) -> Vec<Issue> {
        let profiles = self.profile(table);
        self.detect_with_profiles(table, &profiles)
    }

    /// Detect issues using previously computed profiles.
    pub fn detect_with_profiles(&self, table: &DataTable, profiles: &[ColumnProfile]) -> Vec<Issue> {
        let issues: Vec<Issue> = self
            .checks
            .iter()
            .flat_map(|check| check.run(table, profiles))
            .collect();

        debug!(
            rows = table.row_count(),
            columns = table.column_count(),
            issues = issues.len(),
            "rule-based detection complete"
        );

        issues
    }
}

impl Default for RuleDetector {
    fn default() -> Self {
        Self::new()
    }
}
