//! Core library for taskboard.
//!
//! This crate provides the task models, the update reconciler and the SQLite
//! store, independent of any transport layer (HTTP, MCP, etc.).
//!
//! # Usage
//!
//! ```no_run
//! use taskboard_core::db::Database;
//! use taskboard_core::models::*;
//!
//! let db = Database::open_default()?;
//! db.migrate()?;
//!
//! let id = db.create_task(CreateTaskInput {
//!     name: "release".into(),
//!     description: "cut the 0.2 release".into(),
//!     start: None,
//!     finish: None,
//!     subtasks: vec![CreateSubtaskInput { description: "tag".into() }],
//! })?;
//! let task = db.get_task(id)?;
//! # Ok::<(), taskboard_core::StoreError>(())
//! ```

pub mod db;
mod error;
pub mod models;
pub mod reconcile;

// Re-export commonly used types at crate root
pub use db::Database;
pub use error::{Result, StoreError};
