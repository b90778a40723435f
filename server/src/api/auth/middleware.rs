//! Authentication middleware

use axum::Json;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use sqlx::SqlitePool;

use crate::core::constants::API_KEY_HEADER;
use crate::data::sqlite::repositories::find_by_api_key;

/// Authentication error response
#[derive(Debug)]
pub struct AuthError {
    pub status: StatusCode,
    pub error: &'static str,
    pub code: &'static str,
    pub message: String,
}

impl AuthError {
    pub fn required() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            error: "unauthorized",
            code: "AUTH_REQUIRED",
            message: format!("Missing {} header", API_KEY_HEADER),
        }
    }

    pub fn invalid_api_key() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            error: "unauthorized",
            code: "API_KEY_INVALID",
            message: "Invalid API key".to_string(),
        }
    }

    pub fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: "internal_error",
            code: "INTERNAL",
            message: "Database operation failed".to_string(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": self.error,
            "code": self.code,
            "message": self.message,
        });
        (self.status, Json(body)).into_response()
    }
}

/// Shared auth state for middleware
#[derive(Clone)]
pub struct AuthState {
    pub pool: SqlitePool,
}

/// Project resolved from the presented API key.
///
/// Every scoped query downstream keys off this id; handlers never see the
/// raw credential.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    pub project_id: String,
}

/// Authentication middleware
///
/// Resolves the `X-AgentPulse-Key` header to a project via an exact-match
/// lookup. A missing or empty header and an unknown key are distinct 401s.
///
/// Injects into request extensions:
/// - `ProjectContext` - the tenant scope for all downstream queries
pub async fn require_auth(
    State(state): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let api_key = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty());

    let Some(api_key) = api_key else {
        return Err(AuthError::required());
    };

    let project = find_by_api_key(&state.pool, api_key)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "API key lookup failed");
            AuthError::internal()
        })?
        .ok_or_else(AuthError::invalid_api_key)?;

    request.extensions_mut().insert(ProjectContext {
        project_id: project.id,
    });

    Ok(next.run(request).await)
}
