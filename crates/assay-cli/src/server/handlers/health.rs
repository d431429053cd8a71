//! Health check handler.

use axum::Json;
use serde::Serialize;

/// Response for the health endpoint.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
}

/// GET / - Report that the service is up.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "online",
        message: "Assay data quality service is running",
    })
}
