//! Suggestion preview handler.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use assay::CleanResponse;

use crate::server::auth::Caller;
use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Request body for the clean endpoint.
#[derive(Debug, Deserialize)]
pub struct CleanRequest {
    /// Row records keyed by column name.
    #[serde(default)]
    pub rows: Vec<IndexMap<String, Value>>,
}

/// POST /clean - Preview suggested corrections for JSON rows.
pub async fn clean_rows(
    State(state): State<AppState>,
    Caller(identity): Caller,
    request: Result<Json<CleanRequest>, JsonRejection>,
) -> Result<Json<CleanResponse>, ApiError> {
    let Json(request) = request?;
    Ok(Json(state.assay.clean(&request.rows, &identity).await))
}
