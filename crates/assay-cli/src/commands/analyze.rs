//! Analyze command - run both analysis layers on a local file.

use std::path::PathBuf;

use assay::{AnalysisReport, Identity};
use colored::Colorize;
use tracing::info;

use crate::cli::{AnalysisArgs, GenerationArgs};

pub fn run(
    file: PathBuf,
    output: Option<PathBuf>,
    user: Option<String>,
    generation: GenerationArgs,
    analysis: AnalysisArgs,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    println!(
        "{} {}",
        "Analyzing".cyan().bold(),
        file.display().to_string().white()
    );

    let assay = super::build_assay(&analysis, &generation)?;
    if let Some(name) = assay.generator_name() {
        info!(generator = name, "suggestions enabled");
    }

    let mut identity = Identity::new("local");
    if let Some(email) = user {
        identity = identity.with_email(email);
    }

    let runtime = tokio::runtime::Runtime::new()?;
    let report = runtime.block_on(assay.analyze_file(&file, &identity))?;

    print_report(&report, verbose);

    if let Some(path) = output {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(&path, json)?;
        println!();
        println!(
            "{} {}",
            "Saved to".green().bold(),
            path.display().to_string().white()
        );
    }

    Ok(())
}

fn print_report(report: &AnalysisReport, verbose: bool) {
    if verbose {
        println!();
        println!("{}", "Source:".yellow().bold());
        println!("  Format:  {}", report.source.format);
        println!("  Columns: {}", report.source.column_count);
        println!("  Hash:    {}", report.source.hash);
    }

    println!();
    println!(
        "Found {} issues in {} rows",
        report.issues_detected.len().to_string().white().bold(),
        report.total_rows
    );
    for issue in &report.issues_detected {
        println!(
            "  {:24} {:20} {}",
            issue.column,
            issue.kind.label().yellow(),
            issue.count.to_string().red()
        );
    }

    println!();
    println!(
        "Generated {} suggestions",
        report.suggestions.len().to_string().white().bold()
    );
    for s in &report.suggestions {
        println!(
            "  [{}] '{}' -> '{}' ({:.0}%)",
            s.column.cyan(),
            s.original,
            s.fix.green(),
            s.confidence * 100.0
        );
    }

    if report.issues_detected.is_empty() && report.suggestions.is_empty() {
        println!();
        println!("{}", "No issues found - data looks clean!".green());
    }
}
