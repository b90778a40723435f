//! Data storage layer
//!
//! Provides database services for the collector:
//! - `sqlite` - Embedded SQLite store for projects, traces, and spans
//! - `types` - Row types shared between repositories and the API

pub mod sqlite;
pub mod types;

// Re-export the service and common handles
pub use sqlite::{SqliteError, SqlitePool, SqliteService};
