//! OpenAPI specification and Swagger UI

use axum::http::header;
use axum::response::{Html, IntoResponse, Json};
use utoipa::OpenApi;

use crate::api::routes::{health, telemetry};
use crate::data::types::{DailyCost, SpanRow, StatsTotals, TopAgent, TraceRow};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "AgentPulse Collector API",
        version = env!("CARGO_PKG_VERSION"),
        description = "Multi-tenant telemetry collector for agent execution traces"
    ),
    tags(
        (name = "health", description = "Health and service identity"),
        (name = "traces", description = "Trace ingest and queries"),
        (name = "spans", description = "Span ingest"),
        (name = "stats", description = "Project statistics")
    ),
    paths(
        // Health
        health::root,
        health::health,
        // Traces
        telemetry::traces::ingest_traces,
        telemetry::traces::list_traces,
        telemetry::traces::get_trace,
        // Spans
        telemetry::spans::ingest_spans,
        // Stats
        telemetry::stats::get_stats,
    ),
    components(schemas(
        // Health
        health::HealthResponse,
        health::RootResponse,
        // Stored records
        TraceRow,
        SpanRow,
        // Telemetry types
        telemetry::types::TraceIngest,
        telemetry::types::SpanIngest,
        telemetry::types::ListTracesQuery,
        telemetry::types::IngestResponse,
        telemetry::types::TraceListResponse,
        telemetry::types::TraceDetailResponse,
        telemetry::types::StatsResponse,
        // Stats types
        StatsTotals,
        DailyCost,
        TopAgent,
    ))
)]
pub struct ApiDoc;

/// Serve OpenAPI JSON specification
pub async fn openapi_json() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        Json(ApiDoc::openapi()),
    )
}

/// Serve Swagger UI from CDN
pub async fn swagger_ui_html() -> Html<&'static str> {
    Html(SWAGGER_UI_HTML)
}

const SWAGGER_UI_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>AgentPulse Collector API Documentation</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
    <style>
        html { box-sizing: border-box; overflow-y: scroll; }
        *, *:before, *:after { box-sizing: inherit; }
        body { margin: 0; background: #fafafa; }
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-standalone-preset.js"></script>
    <script>
        window.onload = () => {
            window.ui = SwaggerUIBundle({
                url: "/api/openapi.json",
                dom_id: '#swagger-ui',
                presets: [
                    SwaggerUIBundle.presets.apis,
                    SwaggerUIStandalonePreset
                ],
                layout: "StandaloneLayout",
                deepLinking: true,
                showExtensions: true,
                showCommonExtensions: true
            });
        };
    </script>
</body>
</html>"#;
