//! taskboard: a task and subtask tracker served over HTTP and MCP.

pub mod api;
pub mod config;
pub mod mcp;

pub use taskboard_core::{db, models, reconcile};
