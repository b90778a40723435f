//! AgentPulse server library
//!
//! Lightweight observability collector for AI agents. Receives traces and
//! spans from SDKs, stores them in SQLite, and serves query and stats
//! endpoints over HTTP.

mod app;

pub mod api;
pub mod core;
pub mod data;
pub mod utils;
