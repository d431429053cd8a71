//! Fuzz target for the response sanitizer.
//!
//! Generated text is untrusted, so the sanitizer must never panic and every
//! suggestion it returns must change a value and carry a confidence in 0-1.

#![no_main]

use assay::Sanitizer;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let raw = String::from_utf8_lossy(data);
    let outcome = Sanitizer::new().run(&raw);

    for suggestion in &outcome.suggestions {
        assert!(suggestion.is_change());
        assert!((0.0..=1.0).contains(&suggestion.confidence));
    }
});
