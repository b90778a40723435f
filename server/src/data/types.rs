//! Shared row types for the SQLite collector store
//!
//! This module contains the row shapes returned by the repository layer and
//! serialized directly into API responses.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ============================================================================
// Project types
// ============================================================================

/// Project row from database
#[derive(Debug, Clone)]
pub struct ProjectRow {
    pub id: String,
    pub name: String,
    pub api_key: String,
    pub created_at: i64,
}

// ============================================================================
// Trace types
// ============================================================================

/// Trace row from database
///
/// Timestamps are epoch seconds with fractional precision, matching what
/// SDKs send on ingest.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TraceRow {
    pub id: String,
    pub project_id: String,
    pub agent_name: Option<String>,
    pub status: String,
    pub started_at: f64,
    pub ended_at: Option<f64>,
    pub total_tokens_in: i64,
    pub total_tokens_out: i64,
    pub total_cost_usd: f64,
    /// JSON-encoded metadata, stored as-is
    pub metadata: Option<String>,
    pub error: Option<String>,
}

/// Parameters for list_traces query
#[derive(Debug, Default, Clone)]
pub struct ListTracesParams {
    pub project_id: String,
    pub limit: u32,
    pub offset: u32,
    pub status: Option<String>,
    pub agent_name: Option<String>,
}

// ============================================================================
// Span types
// ============================================================================

/// Span row from database
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SpanRow {
    pub id: String,
    pub trace_id: String,
    pub parent_span_id: Option<String>,
    pub name: String,
    pub kind: String,
    pub started_at: f64,
    pub ended_at: Option<f64>,
    pub input: Option<String>,
    pub output: Option<String>,
    pub model: Option<String>,
    pub tokens_in: Option<i64>,
    pub tokens_out: Option<i64>,
    pub cost_usd: Option<f64>,
    pub error: Option<String>,
}

// ============================================================================
// Stats types
// ============================================================================

/// Aggregate totals across all traces in a project
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatsTotals {
    pub total_traces: i64,
    pub success_count: i64,
    pub error_count: i64,
    pub running_count: i64,
    pub total_tokens_in: i64,
    pub total_tokens_out: i64,
    pub total_cost_usd: f64,
    /// Average trace duration in seconds; null when no trace has ended
    pub avg_duration_s: Option<f64>,
}

/// Per-day cost bucket for the trailing window
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DailyCost {
    /// Calendar day in YYYY-MM-DD form (UTC)
    pub day: String,
    pub cost: f64,
    pub traces: i64,
}

/// Per-agent aggregate, ranked by total cost
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TopAgent {
    pub agent_name: String,
    pub trace_count: i64,
    pub total_cost: f64,
    pub avg_duration: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_row_serializes_all_columns() {
        let row = TraceRow {
            id: "tr_1".to_string(),
            project_id: "default".to_string(),
            agent_name: Some("researcher".to_string()),
            status: "success".to_string(),
            started_at: 1_700_000_000.5,
            ended_at: Some(1_700_000_002.0),
            total_tokens_in: 120,
            total_tokens_out: 40,
            total_cost_usd: 0.0031,
            metadata: Some(r#"{"env":"prod"}"#.to_string()),
            error: None,
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["id"], "tr_1");
        assert_eq!(json["status"], "success");
        assert_eq!(json["total_tokens_in"], 120);
        assert!(json["error"].is_null());
    }

    #[test]
    fn test_span_row_optional_fields_default_to_null() {
        let row = SpanRow {
            id: "sp_1".to_string(),
            trace_id: "tr_1".to_string(),
            parent_span_id: None,
            name: "llm_call".to_string(),
            kind: "llm".to_string(),
            started_at: 1_700_000_000.0,
            ended_at: None,
            input: None,
            output: None,
            model: None,
            tokens_in: None,
            tokens_out: None,
            cost_usd: None,
            error: None,
        };
        let json = serde_json::to_value(&row).unwrap();
        assert!(json["parent_span_id"].is_null());
        assert!(json["cost_usd"].is_null());
        assert_eq!(json["kind"], "llm");
    }

    #[test]
    fn test_list_traces_params_default() {
        let params = ListTracesParams::default();
        assert_eq!(params.limit, 0);
        assert_eq!(params.offset, 0);
        assert!(params.status.is_none());
    }
}
