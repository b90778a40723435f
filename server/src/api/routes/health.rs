//! Health check and service identity endpoints

use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;
use utoipa::ToSchema;

use crate::utils::time::now_iso;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub timestamp: String,
}

#[derive(Serialize, ToSchema)]
pub struct RootResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub docs: &'static str,
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/v1/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok",
            service: "agentpulse-collector",
            version: env!("CARGO_PKG_VERSION"),
            timestamp: now_iso(),
        }),
    )
}

/// Service identity at the root path
#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses(
        (status = 200, description = "Service name and docs pointer", body = RootResponse)
    )
)]
pub async fn root() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(RootResponse {
            name: "AgentPulse Collector",
            version: env!("CARGO_PKG_VERSION"),
            docs: "/v1/health",
        }),
    )
}
