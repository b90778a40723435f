//! Span ingest endpoint

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};

use super::TelemetryApiState;
use super::types::{IngestResponse, OneOrMany, SpanIngest};
use crate::api::auth::ProjectContext;
use crate::api::extractors::ValidatedJson;
use crate::api::types::ApiError;
use crate::data::sqlite::SqliteError;
use crate::data::sqlite::repositories::span;

/// Ingest one or many span records
///
/// Spans attach to traces by `trace_id`; a record referencing an unknown
/// trace fails the whole batch. Parents must precede children within a
/// batch since references are checked per statement.
#[utoipa::path(
    post,
    path = "/v1/spans",
    tag = "spans",
    request_body = Vec<SpanIngest>,
    responses(
        (status = 201, description = "Batch ingested atomically", body = IngestResponse),
        (status = 400, description = "Invalid record or unknown trace reference"),
        (status = 401, description = "Missing or invalid API key")
    )
)]
pub async fn ingest_spans(
    State(state): State<TelemetryApiState>,
    Extension(project): Extension<ProjectContext>,
    ValidatedJson(records): ValidatedJson<OneOrMany<SpanIngest>>,
) -> Result<(StatusCode, Json<IngestResponse>), ApiError> {
    let rows: Vec<_> = records
        .into_vec()
        .into_iter()
        .map(|record| record.into_row())
        .collect();

    let ingested = span::insert_spans(&state.pool, &rows)
        .await
        .map_err(|e| {
            if let SqliteError::InvalidReference(msg) = &e {
                return ApiError::bad_request("INVALID_REFERENCE", msg.clone());
            }
            ApiError::from_sqlite(e)
        })?;

    tracing::debug!(project_id = %project.project_id, count = ingested, "spans ingested");

    Ok((StatusCode::CREATED, Json(IngestResponse { ingested })))
}
