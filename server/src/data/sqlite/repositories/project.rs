//! Project repository for SQLite operations
//!
//! Projects are the tenancy unit: every trace and span belongs to exactly one
//! project, and API keys resolve to a project id before any query runs.

use sqlx::SqlitePool;

use crate::data::sqlite::SqliteError;
use crate::data::types::ProjectRow;

/// Create a new project with a generated CUID2 ID
///
/// The API key must be unique across all projects; a duplicate returns
/// `SqliteError::Conflict`.
pub async fn create_project(
    pool: &SqlitePool,
    name: &str,
    api_key: &str,
) -> Result<ProjectRow, SqliteError> {
    let id = cuid2::create_id();
    let now = chrono::Utc::now().timestamp();

    let result = sqlx::query(
        "INSERT INTO projects (id, name, api_key, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(name)
    .bind(api_key)
    .bind(now)
    .execute(pool)
    .await;

    match result {
        Ok(_) => Ok(ProjectRow {
            id,
            name: name.to_string(),
            api_key: api_key.to_string(),
            created_at: now,
        }),
        Err(e) => {
            if e.as_database_error()
                .is_some_and(|db| db.is_unique_violation())
            {
                return Err(SqliteError::Conflict(format!(
                    "API key already registered to another project: {}",
                    mask_key(api_key)
                )));
            }
            Err(e.into())
        }
    }
}

/// Get a project by ID
pub async fn get_project(pool: &SqlitePool, id: &str) -> Result<Option<ProjectRow>, SqliteError> {
    let row = sqlx::query_as::<_, (String, String, String, i64)>(
        "SELECT id, name, api_key, created_at FROM projects WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|(id, name, api_key, created_at)| ProjectRow {
        id,
        name,
        api_key,
        created_at,
    }))
}

/// Look up the project owning an API key (exact match)
///
/// This runs on every authenticated request, so it stays a single indexed
/// lookup against the UNIQUE api_key column.
pub async fn find_by_api_key(
    pool: &SqlitePool,
    api_key: &str,
) -> Result<Option<ProjectRow>, SqliteError> {
    let row = sqlx::query_as::<_, (String, String, String, i64)>(
        "SELECT id, name, api_key, created_at FROM projects WHERE api_key = ?",
    )
    .bind(api_key)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|(id, name, api_key, created_at)| ProjectRow {
        id,
        name,
        api_key,
        created_at,
    }))
}

/// Truncate a key for log-safe display
fn mask_key(api_key: &str) -> String {
    let prefix: String = api_key.chars().take(6).collect();
    format!("{}...", prefix)
}
