//! # AgentPulse
//!
//! **Lightweight observability for AI agents** — trace agent runs, LLM
//! calls, and tool calls, and ship them to an AgentPulse collector.
//!
//! ## Quick Start
//!
//! ```no_run
//! use agentpulse::{AgentPulse, SpanKind, calculate_cost};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), agentpulse::Error> {
//! let pulse = AgentPulse::builder()
//!     .endpoint("http://localhost:3000")
//!     .api_key("ap_live_...")
//!     .build()?;
//!
//! let mut trace = pulse.start_trace("research-agent");
//!
//! let mut span = trace.start_span("plan", SpanKind::Llm);
//! span.model = Some("gpt-4o".into());
//! span.tokens_in = Some(1200);
//! span.tokens_out = Some(300);
//! span.cost_usd = Some(calculate_cost("gpt-4o", 1200, 300));
//! span.end();
//! trace.record(span);
//!
//! pulse.end_trace(trace);
//! pulse.shutdown().await;
//! # Ok(())
//! # }
//! ```
//!
//! Delivery is best-effort: records are buffered and flushed in batches by
//! a background task, and failed batches are logged and dropped rather than
//! surfaced to the application.

mod client;
mod models;
mod transport;

pub use client::{AgentPulse, AgentPulseBuilder, DEFAULT_ENDPOINT, Error};
pub use models::{Span, SpanKind, Trace, TraceStatus, calculate_cost};
