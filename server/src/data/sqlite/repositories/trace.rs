//! Trace repository for SQLite operations
//!
//! Ingest is a whole-record replace keyed by trace id: re-sending a trace
//! overwrites every column, so omitted optional fields revert to NULL rather
//! than merging with the stored row. Batches run in a single transaction.

use sqlx::SqlitePool;

use crate::data::sqlite::SqliteError;
use crate::data::types::{ListTracesParams, TraceRow};

/// Insert or replace a batch of traces in one transaction
///
/// The whole batch commits or none of it does. Returns the number of
/// records written.
pub async fn insert_traces(pool: &SqlitePool, rows: &[TraceRow]) -> Result<u64, SqliteError> {
    let mut tx = pool.begin().await?;

    for row in rows {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO traces
              (id, project_id, agent_name, status, started_at, ended_at,
               total_tokens_in, total_tokens_out, total_cost_usd, metadata, error)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&row.id)
        .bind(&row.project_id)
        .bind(&row.agent_name)
        .bind(&row.status)
        .bind(row.started_at)
        .bind(row.ended_at)
        .bind(row.total_tokens_in)
        .bind(row.total_tokens_out)
        .bind(row.total_cost_usd)
        .bind(&row.metadata)
        .bind(&row.error)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(rows.len() as u64)
}

/// List traces for a project, newest first, with optional exact-match filters
///
/// Returns the page of rows plus the total count under the same predicate.
pub async fn list_traces(
    pool: &SqlitePool,
    params: &ListTracesParams,
) -> Result<(Vec<TraceRow>, u64), SqliteError> {
    let mut sql = String::from(
        "SELECT id, project_id, agent_name, status, started_at, ended_at, \
         total_tokens_in, total_tokens_out, total_cost_usd, metadata, error \
         FROM traces WHERE project_id = ?",
    );
    if params.status.is_some() {
        sql.push_str(" AND status = ?");
    }
    if params.agent_name.is_some() {
        sql.push_str(" AND agent_name = ?");
    }
    sql.push_str(" ORDER BY started_at DESC LIMIT ? OFFSET ?");

    let mut query = sqlx::query_as::<
        _,
        (
            String,
            String,
            Option<String>,
            String,
            f64,
            Option<f64>,
            i64,
            i64,
            f64,
            Option<String>,
            Option<String>,
        ),
    >(&sql)
    .bind(&params.project_id);
    if let Some(ref status) = params.status {
        query = query.bind(status);
    }
    if let Some(ref agent_name) = params.agent_name {
        query = query.bind(agent_name);
    }
    let rows = query
        .bind(params.limit)
        .bind(params.offset)
        .fetch_all(pool)
        .await?;

    let mut count_sql = String::from("SELECT COUNT(*) FROM traces WHERE project_id = ?");
    if params.status.is_some() {
        count_sql.push_str(" AND status = ?");
    }
    if params.agent_name.is_some() {
        count_sql.push_str(" AND agent_name = ?");
    }

    let mut count_query = sqlx::query_as::<_, (i64,)>(&count_sql).bind(&params.project_id);
    if let Some(ref status) = params.status {
        count_query = count_query.bind(status);
    }
    if let Some(ref agent_name) = params.agent_name {
        count_query = count_query.bind(agent_name);
    }
    let total = count_query.fetch_one(pool).await?;

    let traces = rows
        .into_iter()
        .map(
            |(
                id,
                project_id,
                agent_name,
                status,
                started_at,
                ended_at,
                total_tokens_in,
                total_tokens_out,
                total_cost_usd,
                metadata,
                error,
            )| TraceRow {
                id,
                project_id,
                agent_name,
                status,
                started_at,
                ended_at,
                total_tokens_in,
                total_tokens_out,
                total_cost_usd,
                metadata,
                error,
            },
        )
        .collect();

    Ok((traces, total.0 as u64))
}

/// Get a single trace by ID, scoped to a project
pub async fn get_trace(
    pool: &SqlitePool,
    project_id: &str,
    id: &str,
) -> Result<Option<TraceRow>, SqliteError> {
    let row = sqlx::query_as::<
        _,
        (
            String,
            String,
            Option<String>,
            String,
            f64,
            Option<f64>,
            i64,
            i64,
            f64,
            Option<String>,
            Option<String>,
        ),
    >(
        "SELECT id, project_id, agent_name, status, started_at, ended_at, \
         total_tokens_in, total_tokens_out, total_cost_usd, metadata, error \
         FROM traces WHERE id = ? AND project_id = ?",
    )
    .bind(id)
    .bind(project_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(
        |(
            id,
            project_id,
            agent_name,
            status,
            started_at,
            ended_at,
            total_tokens_in,
            total_tokens_out,
            total_cost_usd,
            metadata,
            error,
        )| TraceRow {
            id,
            project_id,
            agent_name,
            status,
            started_at,
            ended_at,
            total_tokens_in,
            total_tokens_out,
            total_cost_usd,
            metadata,
            error,
        },
    ))
}
