//! Trace ingest and query endpoints

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};

use super::TelemetryApiState;
use super::types::{
    IngestResponse, ListTracesQuery, OneOrMany, TraceDetailResponse, TraceIngest,
    TraceListResponse,
};
use crate::api::auth::ProjectContext;
use crate::api::extractors::{TracePath, ValidatedJson, ValidatedQuery};
use crate::api::types::ApiError;
use crate::data::sqlite::repositories::{span, trace};

/// Ingest one or many trace records
///
/// The whole batch is applied in one transaction; re-ingesting an id
/// replaces the stored record wholesale.
#[utoipa::path(
    post,
    path = "/v1/traces",
    tag = "traces",
    request_body = Vec<TraceIngest>,
    responses(
        (status = 201, description = "Batch ingested atomically", body = IngestResponse),
        (status = 400, description = "Invalid record in batch"),
        (status = 401, description = "Missing or invalid API key")
    )
)]
pub async fn ingest_traces(
    State(state): State<TelemetryApiState>,
    Extension(project): Extension<ProjectContext>,
    ValidatedJson(records): ValidatedJson<OneOrMany<TraceIngest>>,
) -> Result<(StatusCode, Json<IngestResponse>), ApiError> {
    let rows: Vec<_> = records
        .into_vec()
        .into_iter()
        .map(|record| record.into_row(&project.project_id))
        .collect();

    let ingested = trace::insert_traces(&state.pool, &rows)
        .await
        .map_err(ApiError::from_sqlite)?;

    tracing::debug!(project_id = %project.project_id, count = ingested, "traces ingested");

    Ok((StatusCode::CREATED, Json(IngestResponse { ingested })))
}

/// List traces with pagination and filters
#[utoipa::path(
    get,
    path = "/v1/traces",
    tag = "traces",
    params(
        ("limit" = Option<i64>, Query, description = "Page size, clamped to [1, 500]"),
        ("offset" = Option<i64>, Query, description = "Rows to skip"),
        ("status" = Option<String>, Query, description = "Exact-match status filter"),
        ("agent" = Option<String>, Query, description = "Exact-match agent name filter")
    ),
    responses(
        (status = 200, description = "Page of traces, newest first, with filtered total", body = TraceListResponse),
        (status = 401, description = "Missing or invalid API key")
    )
)]
pub async fn list_traces(
    State(state): State<TelemetryApiState>,
    Extension(project): Extension<ProjectContext>,
    ValidatedQuery(query): ValidatedQuery<ListTracesQuery>,
) -> Result<Json<TraceListResponse>, ApiError> {
    let params = query.into_params(project.project_id);

    let (data, total) = trace::list_traces(&state.pool, &params)
        .await
        .map_err(ApiError::from_sqlite)?;

    Ok(Json(TraceListResponse {
        data,
        total,
        limit: params.limit,
        offset: params.offset,
    }))
}

/// Get a single trace with its spans
///
/// Spans come back as a flat list in start-time order (execution order),
/// not reconstructed into a parent/child tree.
#[utoipa::path(
    get,
    path = "/v1/traces/{id}",
    tag = "traces",
    params(
        ("id" = String, Path, description = "Trace ID")
    ),
    responses(
        (status = 200, description = "Trace with flat time-ordered span list", body = TraceDetailResponse),
        (status = 404, description = "No such trace in this project"),
        (status = 401, description = "Missing or invalid API key")
    )
)]
pub async fn get_trace(
    State(state): State<TelemetryApiState>,
    Extension(project): Extension<ProjectContext>,
    path: TracePath,
) -> Result<Json<TraceDetailResponse>, ApiError> {
    let row = trace::get_trace(&state.pool, &project.project_id, &path.trace_id)
        .await
        .map_err(ApiError::from_sqlite)?
        .ok_or_else(|| ApiError::not_found("TRACE_NOT_FOUND", "Trace not found"))?;

    let spans = span::list_for_trace(&state.pool, &path.trace_id)
        .await
        .map_err(ApiError::from_sqlite)?;

    Ok(Json(TraceDetailResponse { trace: row, spans }))
}
