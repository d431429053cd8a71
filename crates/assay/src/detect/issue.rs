//! Issue types for detected data quality defects.

use serde::{Deserialize, Serialize};

/// Column label used for table-wide issues.
pub const ALL_COLUMNS: &str = "All";

/// Kind of defect found by the rule-based detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueKind {
    #[serde(rename = "Missing Values")]
    MissingValues,
    #[serde(rename = "Duplicate Rows")]
    DuplicateRows,
    #[serde(rename = "Outliers Detected")]
    Outliers,
}

impl IssueKind {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            IssueKind::MissingValues => "Missing Values",
            IssueKind::DuplicateRows => "Duplicate Rows",
            IssueKind::Outliers => "Outliers Detected",
        }
    }
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A quantified defect found in one column, or in the table as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Affected column, or [`ALL_COLUMNS`] for table-wide checks.
    pub column: String,
    /// What was found.
    #[serde(rename = "issue")]
    pub kind: IssueKind,
    /// Number of affected cells or rows.
    pub count: usize,
}

impl Issue {
    pub fn new(column: impl Into<String>, kind: IssueKind, count: usize) -> Self {
        Self {
            column: column.into(),
            kind,
            count,
        }
    }

    /// Returns true if the issue spans the whole table.
    pub fn is_table_wide(&self) -> bool {
        self.column == ALL_COLUMNS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_format() {
        let issue = Issue::new("age", IssueKind::MissingValues, 3);
        assert_eq!(
            serde_json::to_value(&issue).unwrap(),
            json!({"column": "age", "issue": "Missing Values", "count": 3})
        );

        let dup = Issue::new(ALL_COLUMNS, IssueKind::DuplicateRows, 2);
        assert!(dup.is_table_wide());
        assert_eq!(
            serde_json::to_value(&dup).unwrap()["issue"],
            json!("Duplicate Rows")
        );
    }
}
