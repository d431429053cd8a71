//! Assay CLI - data quality analysis for CSV datasets.

mod cli;
mod commands;
mod server;

use clap::Parser;
use cli::{Cli, Commands};
use dotenv::dotenv;

/// Initialize the tracing subscriber for logging.
///
/// `RUST_LOG` wins over the command-line level.
fn init_logging(level: &str, verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let effective_level = if verbose { "debug" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() {
    // Load .env before clap reads env fallbacks
    dotenv().ok();

    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.verbose);

    let result = match cli.command {
        Commands::Serve {
            port,
            host,
            auth_tokens,
            generation,
            analysis,
        } => commands::serve::run(host, port, auth_tokens, generation, analysis),

        Commands::Analyze {
            file,
            output,
            user,
            generation,
            analysis,
        } => commands::analyze::run(file, output, user, generation, analysis, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
