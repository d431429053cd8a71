//! Upload analysis handler.

use axum::{
    Json,
    extract::{Multipart, State},
};
use tracing::debug;

use assay::AnalysisReport;

use crate::server::auth::Caller;
use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Multipart field carrying the uploaded file.
const FILE_FIELD: &str = "file";

/// POST /analyze - Analyze an uploaded CSV file.
pub async fn analyze_upload(
    State(state): State<AppState>,
    Caller(identity): Caller,
    mut multipart: Multipart,
) -> Result<Json<AnalysisReport>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {}", e)))?;
        debug!(file = %filename, size = bytes.len(), "received upload");

        let report = state.assay.analyze_bytes(&filename, &bytes, &identity).await?;
        return Ok(Json(report));
    }

    Err(ApiError::BadRequest(format!(
        "Missing multipart field '{}'",
        FILE_FIELD
    )))
}
