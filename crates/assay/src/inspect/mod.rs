//! Per-column classification and statistics.
//!
//! A column is numeric when every non-null cell parses as a finite number
//! and at least one cell is non-null. Everything else is non-numeric.

mod stats;

use serde::{Deserialize, Serialize};

use crate::input::DataTable;

pub use stats::NumericSummary;
use stats::StreamingStats;

/// Inferred kind of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Numeric,
    NonNumeric,
}

impl ColumnKind {
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnKind::Numeric)
    }
}

/// Statistics for a single column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnProfile {
    /// Column name.
    pub name: String,
    /// Position in the table.
    pub position: usize,
    /// Inferred kind.
    pub kind: ColumnKind,
    /// Number of null/missing cells.
    pub null_count: usize,
    /// Number of populated cells.
    pub non_null_count: usize,
    /// Descriptive statistics, present only for numeric columns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeric: Option<NumericSummary>,
}

/// Parse a cell as a finite number.
pub fn parse_numeric(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Computes column profiles for a table.
#[derive(Debug, Clone, Default)]
pub struct ColumnInspector;

impl ColumnInspector {
    pub fn new() -> Self {
        Self
    }

    /// Profile every column, in column order. A table with no columns
    /// yields an empty vector.
    pub fn inspect(&self, table: &DataTable) -> Vec<ColumnProfile> {
        (0..table.column_count())
            .map(|index| self.inspect_column(table, index))
            .collect()
    }

    /// Profile a single column.
    pub fn inspect_column(&self, table: &DataTable, index: usize) -> ColumnProfile {
        let mut null_count = 0;
        let mut non_null_count = 0;
        let mut stats = StreamingStats::new();
        let mut all_numeric = true;

        for value in table.column_values(index) {
            if DataTable::is_null_value(value) {
                null_count += 1;
                continue;
            }
            non_null_count += 1;

            if all_numeric {
                match parse_numeric(value) {
                    Some(v) => stats.add(v),
                    None => all_numeric = false,
                }
            }
        }

        let numeric = if all_numeric { stats.summary() } else { None };
        let kind = if numeric.is_some() {
            ColumnKind::Numeric
        } else {
            ColumnKind::NonNumeric
        };

        ColumnProfile {
            name: table.headers.get(index).cloned().unwrap_or_default(),
            position: index,
            kind,
            null_count,
            non_null_count,
            numeric,
        }
    }
}
