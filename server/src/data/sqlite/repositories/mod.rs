//! SQLite repositories
//!
//! Row types (ProjectRow, TraceRow, etc.) should be imported from `crate::data::types`.

pub mod project;
pub mod span;
pub mod stats;
pub mod trace;

pub use project::{create_project, find_by_api_key, get_project};
pub use span::{insert_spans, list_for_trace as list_spans_for_trace};
pub use stats::{get_daily_costs, get_top_agents, get_totals};
pub use trace::{get_trace, insert_traces, list_traces};
