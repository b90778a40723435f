//! Telemetry collection API endpoints
//!
//! The authenticated surface of the collector: batch trace/span ingest,
//! paginated trace listing, single-trace retrieval, and project statistics.

pub mod spans;
pub mod stats;
pub mod traces;
pub mod types;

use axum::Router;
use axum::routing::{get, post};
use sqlx::SqlitePool;

/// Shared state for telemetry endpoints
#[derive(Clone)]
pub struct TelemetryApiState {
    pub pool: SqlitePool,
}

/// Build telemetry API routes
pub fn routes(pool: SqlitePool) -> Router<()> {
    let state = TelemetryApiState { pool };

    Router::new()
        .route(
            "/traces",
            post(traces::ingest_traces).get(traces::list_traces),
        )
        .route("/traces/{id}", get(traces::get_trace))
        .route("/spans", post(spans::ingest_spans))
        .route("/stats", get(stats::get_stats))
        .with_state(state)
}
