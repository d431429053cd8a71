//! Row sampling for generation prompts.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Number, Value};

use crate::input::DataTable;
use crate::inspect::{ColumnInspector, ColumnKind, ColumnProfile, parse_numeric};

/// Default number of rows sent to the generator.
pub const DEFAULT_SAMPLE_SIZE: usize = 5;

/// A bounded, JSON-ready subset of a table.
///
/// Nulls are rendered as empty strings so the encoded sample never carries
/// a JSON `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Sample {
    rows: Vec<IndexMap<String, Value>>,
}

impl Sample {
    /// Take the first `size` rows of a table.
    pub fn head(table: &DataTable, size: usize) -> Self {
        let profiles = ColumnInspector::new().inspect(table);
        Self::head_with_profiles(table, &profiles, size)
    }

    /// Take the first `size` rows, using existing profiles to type the cells.
    pub fn head_with_profiles(table: &DataTable, profiles: &[ColumnProfile], size: usize) -> Self {
        let rows = table
            .rows
            .iter()
            .take(size)
            .map(|row| {
                table
                    .headers
                    .iter()
                    .enumerate()
                    .map(|(i, header)| {
                        let kind = profiles
                            .get(i)
                            .map(|p| p.kind)
                            .unwrap_or(ColumnKind::NonNumeric);
                        let cell = row.get(i).map(|s| s.as_str()).unwrap_or("");
                        (header.clone(), sample_value(cell, kind))
                    })
                    .collect()
            })
            .collect();

        Self { rows }
    }

    /// Number of sampled rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if nothing was sampled.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sampled rows, keyed by column name in column order.
    pub fn rows(&self) -> &[IndexMap<String, Value>] {
        &self.rows
    }

    /// Compact JSON encoding of the sample.
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.rows).unwrap_or_else(|_| "[]".to_string())
    }
}

fn sample_value(cell: &str, kind: ColumnKind) -> Value {
    if DataTable::is_null_value(cell) {
        return Value::String(String::new());
    }

    if kind.is_numeric() {
        if let Ok(i) = cell.trim().parse::<i64>() {
            return Value::Number(i.into());
        }
        if let Some(n) = parse_numeric(cell).and_then(Number::from_f64) {
            return Value::Number(n);
        }
    }

    Value::String(cell.to_string())
}
