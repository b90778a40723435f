//! Telemetry data models
//!
//! A [`Trace`] covers one agent run; [`Span`]s are the individual steps
//! inside it (LLM calls, tool invocations, custom work). Field names match
//! the collector's wire format.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Epoch seconds with fractional precision, the collector's native time unit
fn now_epoch_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Lifecycle state of a trace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceStatus {
    Running,
    Success,
    Error,
}

/// What kind of work a span represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanKind {
    Llm,
    Tool,
    Custom,
}

/// One unit of work inside a trace
#[derive(Debug, Clone, Serialize)]
pub struct Span {
    pub id: String,
    pub trace_id: String,
    pub parent_span_id: Option<String>,
    pub name: String,
    pub kind: SpanKind,
    pub started_at: f64,
    pub ended_at: Option<f64>,
    pub input: Option<serde_json::Value>,
    pub output: Option<serde_json::Value>,
    pub model: Option<String>,
    pub tokens_in: Option<i64>,
    pub tokens_out: Option<i64>,
    pub cost_usd: Option<f64>,
    pub error: Option<String>,
}

impl Span {
    /// Create a span with a generated id, starting now
    pub fn new(trace_id: impl Into<String>, name: impl Into<String>, kind: SpanKind) -> Self {
        Self {
            id: new_id(),
            trace_id: trace_id.into(),
            parent_span_id: None,
            name: name.into(),
            kind,
            started_at: now_epoch_secs(),
            ended_at: None,
            input: None,
            output: None,
            model: None,
            tokens_in: None,
            tokens_out: None,
            cost_usd: None,
            error: None,
        }
    }

    /// Mark this span as a child of another span in the same trace
    pub fn child_of(mut self, parent_span_id: impl Into<String>) -> Self {
        self.parent_span_id = Some(parent_span_id.into());
        self
    }

    /// Record the span input. Values that fail to serialize are dropped.
    pub fn set_input(&mut self, input: impl Serialize) {
        self.input = serde_json::to_value(input).ok();
    }

    /// Record the span output. Values that fail to serialize are dropped.
    pub fn set_output(&mut self, output: impl Serialize) {
        self.output = serde_json::to_value(output).ok();
    }

    /// Stamp the end time
    pub fn end(&mut self) {
        self.ended_at = Some(now_epoch_secs());
    }

    /// Stamp the end time and record a failure message
    pub fn fail(&mut self, error: impl Into<String>) {
        self.ended_at = Some(now_epoch_secs());
        self.error = Some(error.into());
    }
}

/// One agent run, holding cumulative usage totals
///
/// Spans recorded against the trace are shipped separately; serializing a
/// trace produces only the trace row.
#[derive(Debug, Clone, Serialize)]
pub struct Trace {
    pub id: String,
    pub agent_name: Option<String>,
    pub status: TraceStatus,
    pub started_at: f64,
    pub ended_at: Option<f64>,
    pub total_tokens_in: i64,
    pub total_tokens_out: i64,
    pub total_cost_usd: f64,
    pub metadata: Option<serde_json::Value>,
    pub error: Option<String>,
    #[serde(skip)]
    pub spans: Vec<Span>,
}

impl Trace {
    /// Create a trace with a generated id, starting now
    pub fn new() -> Self {
        Self {
            id: new_id(),
            agent_name: None,
            status: TraceStatus::Running,
            started_at: now_epoch_secs(),
            ended_at: None,
            total_tokens_in: 0,
            total_tokens_out: 0,
            total_cost_usd: 0.0,
            metadata: None,
            error: None,
            spans: Vec::new(),
        }
    }

    pub fn with_agent(mut self, name: impl Into<String>) -> Self {
        self.agent_name = Some(name.into());
        self
    }

    /// Attach free-form metadata. Values that fail to serialize are dropped.
    pub fn with_metadata(mut self, metadata: impl Serialize) -> Self {
        self.metadata = serde_json::to_value(metadata).ok();
        self
    }

    /// Create a span belonging to this trace. The span is not part of the
    /// trace until passed back through [`Trace::record`].
    pub fn start_span(&self, name: impl Into<String>, kind: SpanKind) -> Span {
        Span::new(self.id.clone(), name, kind)
    }

    /// Record a finished span against this trace
    pub fn record(&mut self, span: Span) {
        self.spans.push(span);
    }

    /// End the trace successfully, folding recorded span usage into the totals
    pub fn end(&mut self) {
        self.finish(TraceStatus::Success, None);
    }

    /// End the trace as failed
    pub fn fail(&mut self, error: impl Into<String>) {
        self.finish(TraceStatus::Error, Some(error.into()));
    }

    fn finish(&mut self, status: TraceStatus, error: Option<String>) {
        self.ended_at = Some(now_epoch_secs());
        self.status = status;
        if error.is_some() {
            self.error = error;
        }
        for span in &self.spans {
            self.total_tokens_in += span.tokens_in.unwrap_or(0);
            self.total_tokens_out += span.tokens_out.unwrap_or(0);
            self.total_cost_usd += span.cost_usd.unwrap_or(0.0);
        }
    }
}

impl Default for Trace {
    fn default() -> Self {
        Self::new()
    }
}

/// Known model pricing in USD per 1K tokens: (model, input, output)
const MODEL_COSTS: &[(&str, f64, f64)] = &[
    ("gpt-4o", 0.0025, 0.01),
    ("gpt-4o-mini", 0.00015, 0.0006),
    ("gpt-4-turbo", 0.01, 0.03),
    ("gpt-4", 0.03, 0.06),
    ("gpt-3.5-turbo", 0.0005, 0.0015),
    ("claude-3-5-sonnet-20241022", 0.003, 0.015),
    ("claude-3-5-haiku-20241022", 0.0008, 0.004),
    ("claude-3-opus-20240229", 0.015, 0.075),
    ("claude-3-sonnet-20240229", 0.003, 0.015),
    ("claude-3-haiku-20240307", 0.00025, 0.00125),
];

/// Calculate the cost of a model call. Unknown models cost 0.0.
///
/// Exact model names win; otherwise the first table entry related by prefix
/// (either direction) is used, so dated variants like `gpt-4o-2024-08-06`
/// resolve to their base pricing.
pub fn calculate_cost(model: &str, tokens_in: i64, tokens_out: i64) -> f64 {
    let costs = MODEL_COSTS
        .iter()
        .find(|(name, _, _)| *name == model)
        .or_else(|| {
            MODEL_COSTS
                .iter()
                .find(|(name, _, _)| model.starts_with(name) || name.starts_with(model))
        });

    match costs {
        Some((_, input, output)) => {
            (tokens_in as f64 * input + tokens_out as f64 * output) / 1000.0
        }
        None => 0.0,
    }
}
