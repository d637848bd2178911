//! Progress sync handlers

use crate::error::ApiError;
use crate::identity::AuthenticatedUser;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use orbital_core::{ProgressEntry, SyncBatch};
use serde::Serialize;

/// Merge a device snapshot into the user's authoritative progress.
///
/// Success carries no body; skipped entries are not reported to the device.
pub async fn sync_progress(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(batch): Json<SyncBatch>,
) -> Result<StatusCode, ApiError> {
    tracing::debug!(user = %user, entries = batch.len(), "sync received");
    state.engine.sync(&user, &batch).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Authoritative progress response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressResponse {
    pub progresses: Vec<ProgressEntry>,
}

/// The user's authoritative progress, for devices pulling the merged view
pub async fn list_progress(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<ProgressResponse>, ApiError> {
    let records = state.engine.records(&user).await?;

    Ok(Json(ProgressResponse {
        progresses: records.into_iter().map(ProgressEntry::from).collect(),
    }))
}
