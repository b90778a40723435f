//! Telemetry API types
//!
//! Wire-level records accepted by the ingest endpoints, the list/stats query
//! shapes, and the response envelopes. Ingest records are validated before
//! any write happens; one invalid record fails the whole batch.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::core::constants::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use crate::data::types::{DailyCost, ListTracesParams, SpanRow, StatsTotals, TopAgent, TraceRow};

/// Valid trace lifecycle states
pub const TRACE_STATUSES: [&str; 3] = ["running", "success", "error"];
/// Valid span kinds
pub const SPAN_KINDS: [&str; 3] = ["llm", "tool", "custom"];

fn validate_trace_status(status: &str) -> Result<(), ValidationError> {
    if TRACE_STATUSES.contains(&status) {
        return Ok(());
    }
    Err(ValidationError::new("status_enum")
        .with_message("status must be one of: running, success, error".into()))
}

fn validate_span_kind(kind: &str) -> Result<(), ValidationError> {
    if SPAN_KINDS.contains(&kind) {
        return Ok(());
    }
    Err(ValidationError::new("kind_enum")
        .with_message("kind must be one of: llm, tool, custom".into()))
}

fn validate_trace_times(trace: &TraceIngest) -> Result<(), ValidationError> {
    if let Some(ended_at) = trace.ended_at
        && ended_at < trace.started_at
    {
        return Err(ValidationError::new("time_order")
            .with_message("ended_at must be >= started_at".into()));
    }
    Ok(())
}

/// One record or a list of records; ingest accepts both shapes.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// Normalize to a list before processing
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::One(item) => vec![item],
            Self::Many(items) => items,
        }
    }
}

impl<T: Validate> Validate for OneOrMany<T> {
    fn validate(&self) -> Result<(), ValidationErrors> {
        match self {
            Self::One(item) => item.validate(),
            Self::Many(items) => {
                for item in items {
                    item.validate()?;
                }
                Ok(())
            }
        }
    }
}

/// Trace record accepted by `POST /v1/traces`
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_trace_times"))]
pub struct TraceIngest {
    /// Caller-supplied id, unique across the system
    #[validate(length(min = 1, max = 256, message = "id must be 1-256 characters"))]
    pub id: String,

    #[validate(length(min = 1, max = 256, message = "agent_name must be 1-256 characters"))]
    pub agent_name: Option<String>,

    /// Defaults to `running` when absent
    #[validate(custom(function = "validate_trace_status"))]
    pub status: Option<String>,

    /// Epoch seconds, fractional
    pub started_at: f64,
    pub ended_at: Option<f64>,

    #[validate(range(min = 0, message = "total_tokens_in must be >= 0"))]
    pub total_tokens_in: Option<i64>,

    #[validate(range(min = 0, message = "total_tokens_out must be >= 0"))]
    pub total_tokens_out: Option<i64>,

    #[validate(range(min = 0.0, message = "total_cost_usd must be >= 0"))]
    pub total_cost_usd: Option<f64>,

    /// Arbitrary JSON, stored as serialized text
    pub metadata: Option<serde_json::Value>,

    pub error: Option<String>,
}

impl TraceIngest {
    /// Apply ingest defaults and coerce into a storable row.
    pub fn into_row(self, project_id: &str) -> TraceRow {
        TraceRow {
            id: self.id,
            project_id: project_id.to_string(),
            agent_name: self.agent_name,
            status: self.status.unwrap_or_else(|| "running".to_string()),
            started_at: self.started_at,
            ended_at: self.ended_at,
            total_tokens_in: self.total_tokens_in.unwrap_or(0),
            total_tokens_out: self.total_tokens_out.unwrap_or(0),
            total_cost_usd: self.total_cost_usd.unwrap_or(0.0),
            metadata: self
                .metadata
                .filter(|v| !v.is_null())
                .map(|v| v.to_string()),
            error: self.error,
        }
    }
}

/// Span record accepted by `POST /v1/spans`
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SpanIngest {
    /// Caller-supplied id, unique across the system
    #[validate(length(min = 1, max = 256, message = "id must be 1-256 characters"))]
    pub id: String,

    #[validate(length(min = 1, max = 256, message = "trace_id must be 1-256 characters"))]
    pub trace_id: String,

    #[validate(length(min = 1, max = 256, message = "parent_span_id must be 1-256 characters"))]
    pub parent_span_id: Option<String>,

    #[validate(length(min = 1, max = 256, message = "name must be 1-256 characters"))]
    pub name: String,

    #[validate(custom(function = "validate_span_kind"))]
    pub kind: String,

    /// Epoch seconds, fractional
    pub started_at: f64,
    pub ended_at: Option<f64>,

    /// Arbitrary JSON, stored as serialized text
    pub input: Option<serde_json::Value>,
    /// Arbitrary JSON, stored as serialized text
    pub output: Option<serde_json::Value>,

    #[validate(length(min = 1, max = 256, message = "model must be 1-256 characters"))]
    pub model: Option<String>,

    #[validate(range(min = 0, message = "tokens_in must be >= 0"))]
    pub tokens_in: Option<i64>,

    #[validate(range(min = 0, message = "tokens_out must be >= 0"))]
    pub tokens_out: Option<i64>,

    #[validate(range(min = 0.0, message = "cost_usd must be >= 0"))]
    pub cost_usd: Option<f64>,

    pub error: Option<String>,
}

impl SpanIngest {
    /// Coerce into a storable row; spans carry no server-side defaults.
    pub fn into_row(self) -> SpanRow {
        SpanRow {
            id: self.id,
            trace_id: self.trace_id,
            parent_span_id: self.parent_span_id,
            name: self.name,
            kind: self.kind,
            started_at: self.started_at,
            ended_at: self.ended_at,
            input: self.input.filter(|v| !v.is_null()).map(|v| v.to_string()),
            output: self.output.filter(|v| !v.is_null()).map(|v| v.to_string()),
            model: self.model,
            tokens_in: self.tokens_in,
            tokens_out: self.tokens_out,
            cost_usd: self.cost_usd,
            error: self.error,
        }
    }
}

/// Query params for listing traces
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ListTracesQuery {
    /// Page size, clamped to [1, 500]
    pub limit: Option<i64>,
    /// Rows to skip, negative values clamp to 0
    pub offset: Option<i64>,
    /// Exact-match status filter
    pub status: Option<String>,
    /// Exact-match agent name filter
    pub agent: Option<String>,
}

impl ListTracesQuery {
    /// Resolve defaults and clamps into repository parameters.
    ///
    /// Out-of-range limit/offset values are clamped rather than rejected.
    /// Empty filter strings behave like an absent filter, so `?status=`
    /// lists everything.
    pub fn into_params(self, project_id: String) -> ListTracesParams {
        let limit = self
            .limit
            .unwrap_or(DEFAULT_PAGE_LIMIT as i64)
            .clamp(1, MAX_PAGE_LIMIT as i64) as u32;
        let offset = self.offset.unwrap_or(0).clamp(0, u32::MAX as i64) as u32;

        ListTracesParams {
            project_id,
            limit,
            offset,
            status: self.status.filter(|s| !s.is_empty()),
            agent_name: self.agent.filter(|s| !s.is_empty()),
        }
    }
}

/// Response for batch ingest
#[derive(Debug, Serialize, ToSchema)]
pub struct IngestResponse {
    pub ingested: u64,
}

/// Response for trace listing
#[derive(Debug, Serialize, ToSchema)]
pub struct TraceListResponse {
    pub data: Vec<TraceRow>,
    pub total: u64,
    pub limit: u32,
    pub offset: u32,
}

/// Trace merged with its flat, time-ordered span list
#[derive(Debug, Serialize, ToSchema)]
pub struct TraceDetailResponse {
    #[serde(flatten)]
    pub trace: TraceRow,
    pub spans: Vec<SpanRow>,
}

/// Response for project statistics
#[derive(Debug, Serialize, ToSchema)]
pub struct StatsResponse {
    pub totals: StatsTotals,
    pub daily_costs: Vec<DailyCost>,
    pub top_agents: Vec<TopAgent>,
}
