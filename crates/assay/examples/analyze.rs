//! Example: Analyze a CSV file with Assay.
//!
//! Usage:
//!   cargo run --example analyze -- <file_path>
//!
//! The mock generator is used so no API key is needed.

use std::env;
use std::path::Path;
use std::sync::Arc;

use assay::{Assay, Identity, MockProvider};

#[tokio::main]
async fn main() -> assay::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --example analyze -- <file_path>");
        std::process::exit(1);
    }

    let file_path = &args[1];
    let path = Path::new(file_path);

    if !path.exists() {
        eprintln!("Error: File not found: {}", file_path);
        std::process::exit(1);
    }

    let separator = "=".repeat(80);
    println!("{}", separator);
    println!("Assay Analysis: {}", file_path);
    println!("{}", separator);
    println!();

    let assay = Assay::new().with_generator(Arc::new(MockProvider::new()));
    let report = assay.analyze_file(path, &Identity::new("example")).await?;

    println!("## Source Metadata");
    println!("  File: {}", report.source.file);
    println!("  Format: {}", report.source.format);
    println!("  Rows: {}", report.source.row_count);
    println!("  Columns: {}", report.source.column_count);
    println!("  Hash: {}", report.source.hash);
    println!();

    println!("## Issues ({} total)", report.issues_detected.len());
    for issue in &report.issues_detected {
        println!("  {:20} {:20} {}", issue.column, issue.kind, issue.count);
    }
    println!();

    println!("## Suggestions ({} total)", report.suggestions.len());
    for s in &report.suggestions {
        println!(
            "  [{}] '{}' -> '{}' ({:.0}%)",
            s.column,
            s.original,
            s.fix,
            s.confidence * 100.0
        );
    }

    Ok(())
}
