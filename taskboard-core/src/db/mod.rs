//! SQLite store for tasks and subtasks.

mod schema;
mod tasks;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use directories::ProjectDirs;
use rusqlite::Connection;

use crate::error::{Result, StoreError};

pub use schema::{Column, RecordKind, Schema, SUBTASK, TASK};

const DATABASE_FILE: &str = "taskboard.db";

/// Shared handle to the store. Cloning is cheap; clones share one connection.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
    schema: Arc<Schema>,
}

impl Database {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        tracing::debug!(path = %path.display(), "opening database");
        Self::from_connection(Connection::open(path)?, Schema::tasks())
    }

    /// Opens the database in the platform data directory.
    pub fn open_default() -> Result<Self> {
        Self::open(Self::default_path()?)
    }

    pub fn open_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?, Schema::tasks())
    }

    pub fn default_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "taskboard", "taskboard").ok_or(StoreError::NoDataDir)?;
        Ok(dirs.data_dir().join(DATABASE_FILE))
    }

    fn from_connection(conn: Connection, schema: Schema) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            schema: Arc::new(schema),
        })
    }

    /// Creates or updates every table of the schema.
    pub fn migrate(&self) -> Result<()> {
        self.with_connection(|conn| self.schema.migrate(conn))
    }

    pub fn with_connection<T>(&self, f: impl FnOnce(&mut Connection) -> Result<T>) -> Result<T> {
        let mut conn = self.conn.lock().map_err(|_| StoreError::LockPoisoned)?;
        f(&mut conn)
    }
}
