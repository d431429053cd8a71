//! Fuzz target for parsing and rule-based detection.
//!
//! Arbitrary bytes go through the parser and, when they parse, the detector.
//! Neither may panic.

#![no_main]

use assay::{Parser, RuleDetector};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Only process reasonable-sized inputs to avoid OOM
    if data.len() > 100_000 {
        return;
    }

    if let Ok((table, _)) = Parser::new().parse_bytes("fuzz.csv", data) {
        let issues = RuleDetector::new().detect(&table);
        assert!(issues.iter().all(|issue| issue.count > 0));
    }
});
