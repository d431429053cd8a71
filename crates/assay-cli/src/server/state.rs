//! Application state for the web server.

use std::sync::Arc;

use assay::{Assay, Authenticator};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The analysis engine, built once at startup.
    pub assay: Arc<Assay>,
    /// Resolves bearer tokens to callers.
    pub auth: Arc<dyn Authenticator>,
}

impl AppState {
    /// Create new application state.
    pub fn new(assay: Arc<Assay>, auth: Arc<dyn Authenticator>) -> Self {
        Self { assay, auth }
    }
}
