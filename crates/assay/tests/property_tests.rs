//! Property-based tests for the detector and the response sanitizer.
//!
//! # Running Property Tests
//!
//! ```bash
//! cargo test -p assay --test property_tests
//!
//! # More cases (slower but more thorough)
//! PROPTEST_CASES=10000 cargo test -p assay --test property_tests
//! ```

use proptest::prelude::*;

use assay::suggestion::sanitizer::{anchor_array, balance_brackets, strip, unwrap_fence};
use assay::{DataTable, IssueKind, RuleDetector, Sanitizer, Suggestion, sanitize};

// =============================================================================
// Test Strategies
// =============================================================================

/// Short cell values, including the tokens the inspector reads as null.
fn cell() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => "[a-z]{1,6}",
        2 => "-?[0-9]{1,4}",
        1 => Just(String::new()),
        1 => prop::sample::select(vec!["NA", "n/a", "null", "NaN", "None", "#N/A"])
            .prop_map(str::to_string),
    ]
}

fn table_strategy() -> impl Strategy<Value = DataTable> {
    (1usize..5, 0usize..30).prop_flat_map(|(cols, rows)| {
        prop::collection::vec(prop::collection::vec(cell(), cols), rows).prop_map(move |rows| {
            let headers = (0..cols).map(|i| format!("c{}", i)).collect();
            DataTable::new(headers, rows)
        })
    })
}

fn suggestion_strategy() -> impl Strategy<Value = Suggestion> {
    ("[a-z]{1,8}", "[A-Za-z .]{1,12}", "[A-Za-z .]{1,12}", 0.0f64..=1.0)
        .prop_map(|(column, original, fix, confidence)| {
            Suggestion::new(column, original, fix, confidence)
        })
}

/// Text that looks roughly like model output: fragments of JSON and prose.
fn generated_text() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            Just("[".to_string()),
            Just("]".to_string()),
            Just("{".to_string()),
            Just("}".to_string()),
            Just("```json\n".to_string()),
            Just("```".to_string()),
            Just("\"column\":".to_string()),
            Just("\"original\":\"x\",".to_string()),
            Just("\"fix\":\"y\"".to_string()),
            Just("\"confidence\":0.5".to_string()),
            Just("\"".to_string()),
            Just(",".to_string()),
            Just("\\".to_string()),
            "[ a-zA-Z0-9:\n]{0,12}",
        ],
        0..40,
    )
    .prop_map(|parts| parts.concat())
}

// =============================================================================
// Detector Properties
// =============================================================================

proptest! {
    /// Reported missing counts equal the exact per-column null counts.
    #[test]
    fn missing_counts_are_exact(table in table_strategy()) {
        let issues = RuleDetector::new().detect(&table);

        for (idx, header) in table.headers.iter().enumerate() {
            let nulls = table
                .column_values(idx)
                .filter(|v| DataTable::is_null_value(v))
                .count();
            let reported = issues
                .iter()
                .find(|i| i.kind == IssueKind::MissingValues && &i.column == header)
                .map(|i| i.count);

            if nulls == 0 {
                prop_assert_eq!(reported, None);
            } else {
                prop_assert_eq!(reported, Some(nulls));
            }
        }
    }

    /// Appending n copies of existing rows reports exactly n duplicates.
    #[test]
    fn duplicate_count_is_exact(
        base in 1usize..25,
        picks in prop::collection::vec(any::<prop::sample::Index>(), 0..10),
    ) {
        let mut rows: Vec<Vec<String>> =
            (0..base).map(|i| vec![format!("id{}", i), "x".to_string()]).collect();
        for pick in &picks {
            let copy = rows[pick.index(base)].clone();
            rows.push(copy);
        }
        let table = DataTable::new(vec!["id".into(), "tag".into()], rows);

        let issues = RuleDetector::new().detect(&table);
        let duplicates = issues
            .iter()
            .find(|i| i.kind == IssueKind::DuplicateRows)
            .map(|i| i.count)
            .unwrap_or(0);

        prop_assert_eq!(duplicates, picks.len());
    }

    /// Constant numeric columns never report outliers.
    #[test]
    fn constant_columns_have_no_outliers(value in -1000i64..1000, rows in 1usize..60) {
        let table = DataTable::new(
            vec!["v".into()],
            (0..rows).map(|_| vec![value.to_string()]).collect(),
        );
        let issues = RuleDetector::new().detect(&table);
        prop_assert!(issues.iter().all(|i| i.kind != IssueKind::Outliers));
    }

    /// Detection is deterministic.
    #[test]
    fn detection_is_deterministic(table in table_strategy()) {
        let detector = RuleDetector::new();
        prop_assert_eq!(detector.detect(&table), detector.detect(&table));
    }
}

// =============================================================================
// Sanitizer Properties
// =============================================================================

proptest! {
    /// The sanitizer accepts arbitrary text.
    #[test]
    fn sanitize_is_total_on_any_string(raw in any::<String>()) {
        let suggestions = sanitize(&raw);
        for s in &suggestions {
            prop_assert!(s.is_change());
            prop_assert!((0.0..=1.0).contains(&s.confidence));
        }
    }

    /// The sanitizer accepts JSON-shaped garbage.
    #[test]
    fn sanitize_is_total_on_json_fragments(raw in generated_text()) {
        let outcome = Sanitizer::new().run(&raw);
        for s in &outcome.suggestions {
            prop_assert!(s.is_change());
            prop_assert!((0.0..=1.0).contains(&s.confidence));
        }
    }

    /// Every individual stage accepts arbitrary text.
    #[test]
    fn stages_are_total(raw in generated_text()) {
        let text = strip(&raw);
        let text = unwrap_fence(text);
        let text = anchor_array(text);
        let _ = balance_brackets(text);
    }

    /// Fenced and bare arrays sanitize identically.
    #[test]
    fn fence_does_not_change_result(
        items in prop::collection::vec(suggestion_strategy(), 0..6),
        prose in "[A-Za-z ,.!]{0,40}",
    ) {
        let array = serde_json::to_string(&items).unwrap();
        let fenced = format!("{}\n```json\n{}\n```\n", prose, array);
        prop_assert_eq!(sanitize(&fenced), sanitize(&array));
    }

    /// Cutting a well-formed array anywhere never yields entries it did
    /// not contain.
    #[test]
    fn truncation_only_loses_entries(
        items in prop::collection::vec(suggestion_strategy(), 1..6),
        cut in any::<prop::sample::Index>(),
    ) {
        let array = serde_json::to_string(&items).unwrap();
        let mut end = cut.index(array.len());
        while !array.is_char_boundary(end) {
            end -= 1;
        }
        let expected = sanitize(&array);

        for s in sanitize(&array[..end]) {
            prop_assert!(expected.contains(&s));
        }
    }
}
