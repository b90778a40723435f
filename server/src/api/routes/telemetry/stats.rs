//! Project statistics endpoint

use axum::extract::State;
use axum::{Extension, Json};

use super::TelemetryApiState;
use super::types::StatsResponse;
use crate::api::auth::ProjectContext;
use crate::api::types::ApiError;
use crate::data::sqlite::repositories::stats;

/// Project-wide aggregates
///
/// Recomputed from the trace table on every call; nothing is cached or
/// denormalized.
#[utoipa::path(
    get,
    path = "/v1/stats",
    tag = "stats",
    responses(
        (status = 200, description = "Totals, trailing-7-day daily costs, and top agents", body = StatsResponse),
        (status = 401, description = "Missing or invalid API key")
    )
)]
pub async fn get_stats(
    State(state): State<TelemetryApiState>,
    Extension(project): Extension<ProjectContext>,
) -> Result<Json<StatsResponse>, ApiError> {
    let totals = stats::get_totals(&state.pool, &project.project_id)
        .await
        .map_err(ApiError::from_sqlite)?;

    let daily_costs = stats::get_daily_costs(&state.pool, &project.project_id)
        .await
        .map_err(ApiError::from_sqlite)?;

    let top_agents = stats::get_top_agents(&state.pool, &project.project_id)
        .await
        .map_err(ApiError::from_sqlite)?;

    Ok(Json(StatsResponse {
        totals,
        daily_costs,
        top_agents,
    }))
}
