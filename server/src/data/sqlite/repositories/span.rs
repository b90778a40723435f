//! Span repository for SQLite operations
//!
//! Same replace-on-ingest contract as traces. Spans reference their trace
//! (and optionally a parent span), so a record pointing at a trace the
//! collector has never seen is rejected and the whole batch rolls back.

use sqlx::SqlitePool;

use crate::data::sqlite::SqliteError;
use crate::data::types::SpanRow;

/// Insert or replace a batch of spans in one transaction
///
/// A foreign key failure surfaces as `SqliteError::InvalidReference` naming
/// the offending span; nothing from the batch is kept in that case.
pub async fn insert_spans(pool: &SqlitePool, rows: &[SpanRow]) -> Result<u64, SqliteError> {
    let mut tx = pool.begin().await?;

    for row in rows {
        let result = sqlx::query(
            r#"
            INSERT OR REPLACE INTO spans
              (id, trace_id, parent_span_id, name, kind, started_at, ended_at,
               input, output, model, tokens_in, tokens_out, cost_usd, error)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&row.id)
        .bind(&row.trace_id)
        .bind(&row.parent_span_id)
        .bind(&row.name)
        .bind(&row.kind)
        .bind(row.started_at)
        .bind(row.ended_at)
        .bind(&row.input)
        .bind(&row.output)
        .bind(&row.model)
        .bind(row.tokens_in)
        .bind(row.tokens_out)
        .bind(row.cost_usd)
        .bind(&row.error)
        .execute(&mut *tx)
        .await;

        if let Err(e) = result {
            if e.as_database_error()
                .is_some_and(|db| db.is_foreign_key_violation())
            {
                return Err(SqliteError::InvalidReference(format!(
                    "span {} references unknown trace_id {}",
                    row.id, row.trace_id
                )));
            }
            return Err(e.into());
        }
    }

    tx.commit().await?;
    Ok(rows.len() as u64)
}

/// List all spans belonging to a trace, oldest first
pub async fn list_for_trace(
    pool: &SqlitePool,
    trace_id: &str,
) -> Result<Vec<SpanRow>, SqliteError> {
    let rows = sqlx::query_as::<
        _,
        (
            String,
            String,
            Option<String>,
            String,
            String,
            f64,
            Option<f64>,
            Option<String>,
            Option<String>,
            Option<String>,
            Option<i64>,
            Option<i64>,
            Option<f64>,
            Option<String>,
        ),
    >(
        "SELECT id, trace_id, parent_span_id, name, kind, started_at, ended_at, \
         input, output, model, tokens_in, tokens_out, cost_usd, error \
         FROM spans WHERE trace_id = ? ORDER BY started_at ASC",
    )
    .bind(trace_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(
            |(
                id,
                trace_id,
                parent_span_id,
                name,
                kind,
                started_at,
                ended_at,
                input,
                output,
                model,
                tokens_in,
                tokens_out,
                cost_usd,
                error,
            )| SpanRow {
                id,
                trace_id,
                parent_span_id,
                name,
                kind,
                started_at,
                ended_at,
                input,
                output,
                model,
                tokens_in,
                tokens_out,
                cost_usd,
                error,
            },
        )
        .collect())
}
