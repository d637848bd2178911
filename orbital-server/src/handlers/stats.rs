//! Reading statistics handler

use crate::error::ApiError;
use crate::identity::AuthenticatedUser;
use crate::state::AppState;
use axum::{extract::State, Json};
use orbital_core::UserStatsSnapshot;

/// Statistics for the calling user, recomputed on every request
pub async fn get_stats(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<UserStatsSnapshot>, ApiError> {
    Ok(Json(state.stats.compute_stats(&user).await?))
}
