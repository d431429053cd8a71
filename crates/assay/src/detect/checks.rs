//! Individual rule-based checks.

use indexmap::IndexMap;

use crate::input::DataTable;
use crate::inspect::{ColumnProfile, parse_numeric};

use super::issue::{ALL_COLUMNS, Issue, IssueKind};

/// Trait for rule-based checks.
pub trait Check {
    /// Run the check and return issues in column order.
    fn run(&self, table: &DataTable, profiles: &[ColumnProfile]) -> Vec<Issue>;
}

/// Reports columns that contain null or missing cells.
pub struct MissingValuesCheck;

impl Check for MissingValuesCheck {
    fn run(&self, _table: &DataTable, profiles: &[ColumnProfile]) -> Vec<Issue> {
        profiles
            .iter()
            .filter(|p| p.null_count > 0)
            .map(|p| Issue::new(&p.name, IssueKind::MissingValues, p.null_count))
            .collect()
    }
}

/// Reports rows that repeat an earlier row in every field.
pub struct DuplicateRowsCheck;

impl Check for DuplicateRowsCheck {
    fn run(&self, table: &DataTable, _profiles: &[ColumnProfile]) -> Vec<Issue> {
        let count = Self::count_duplicates(table);
        if count > 0 {
            vec![Issue::new(ALL_COLUMNS, IssueKind::DuplicateRows, count)]
        } else {
            Vec::new()
        }
    }
}

impl DuplicateRowsCheck {
    /// Number of rows that are exact repeats of an earlier row.
    /// Null spellings ("", "NA", ...) compare equal to each other.
    pub fn count_duplicates(table: &DataTable) -> usize {
        let mut seen: IndexMap<Vec<Option<&str>>, usize> = IndexMap::new();

        for row in &table.rows {
            let key: Vec<Option<&str>> = row
                .iter()
                .map(|v| {
                    if DataTable::is_null_value(v) {
                        None
                    } else {
                        Some(v.as_str())
                    }
                })
                .collect();
            *seen.entry(key).or_insert(0) += 1;
        }

        seen.values().map(|n| n - 1).sum()
    }
}

/// Reports numeric columns with values far from the column mean.
pub struct OutlierCheck {
    /// Absolute standardized score above which a value is an outlier.
    pub z_score_threshold: f64,
}

impl Default for OutlierCheck {
    fn default() -> Self {
        Self {
            z_score_threshold: 3.0,
        }
    }
}

impl Check for OutlierCheck {
    fn run(&self, table: &DataTable, profiles: &[ColumnProfile]) -> Vec<Issue> {
        let mut issues = Vec::new();

        for profile in profiles {
            // Non-numeric and constant columns have no meaningful z-score.
            let Some(summary) = profile.numeric.filter(|s| s.std_dev > 0.0) else {
                continue;
            };

            let count = table
                .column_values(profile.position)
                .filter_map(parse_numeric)
                .filter_map(|v| summary.z_score(v))
                .filter(|z| z.abs() > self.z_score_threshold)
                .count();

            if count > 0 {
                issues.push(Issue::new(&profile.name, IssueKind::Outliers, count));
            }
        }

        issues
    }
}
