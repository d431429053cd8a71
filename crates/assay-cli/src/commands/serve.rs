//! Serve command - run the HTTP analysis server.

use std::sync::Arc;

use assay::StaticTokenAuthenticator;
use colored::Colorize;
use tracing::{info, warn};

use crate::cli::{AnalysisArgs, GenerationArgs};
use crate::server::{app, state::AppState};

pub fn run(
    host: String,
    port: u16,
    auth_tokens: String,
    generation: GenerationArgs,
    analysis: AnalysisArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let assay = super::build_assay(&analysis, &generation)?;
    let auth = StaticTokenAuthenticator::from_token_list(&auth_tokens)?;

    if auth.is_empty() {
        warn!("no bearer tokens configured; every analysis request will be rejected");
    }
    info!(
        generator = assay.generator_name().unwrap_or("none"),
        tokens = auth.len(),
        min_rows = analysis.min_rows,
        max_rows = analysis.max_rows,
        "starting analysis server"
    );

    let state = AppState::new(Arc::new(assay), Arc::new(auth));

    println!();
    println!(
        "{} {}",
        "Starting analysis server at".cyan().bold(),
        format!("http://{}:{}", host, port).white().bold()
    );
    println!("Press {} to stop the server", "Ctrl+C".yellow().bold());
    println!();

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(app::run_server(state, &host, port))
}
