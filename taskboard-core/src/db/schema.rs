//! Record kinds and the migration that keeps their tables current.

use rusqlite::Connection;

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    /// Everything after the column name in `CREATE TABLE`.
    pub definition: &'static str,
}

const fn column(name: &'static str, definition: &'static str) -> Column {
    Column { name, definition }
}

/// A table the store knows how to create and migrate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordKind {
    pub name: &'static str,
    pub table: &'static str,
    pub columns: &'static [Column],
    pub indexes: &'static [&'static str],
}

pub const TASK: RecordKind = RecordKind {
    name: "task",
    table: "tasks",
    columns: &[
        column("id", "INTEGER PRIMARY KEY AUTOINCREMENT"),
        column("name", "TEXT NOT NULL DEFAULT ''"),
        column("description", "TEXT NOT NULL DEFAULT ''"),
        column("start", "TEXT"),
        column("finish", "TEXT"),
        column("deleted_at", "TEXT"),
        column("created_at", "TEXT NOT NULL DEFAULT ''"),
        column("updated_at", "TEXT NOT NULL DEFAULT ''"),
    ],
    indexes: &["CREATE INDEX IF NOT EXISTS idx_tasks_deleted_at ON tasks(deleted_at)"],
};

pub const SUBTASK: RecordKind = RecordKind {
    name: "task.subtask",
    table: "subtasks",
    columns: &[
        column("id", "INTEGER PRIMARY KEY AUTOINCREMENT"),
        column(
            "task_id",
            "INTEGER REFERENCES tasks(id) ON UPDATE CASCADE ON DELETE SET NULL",
        ),
        column("description", "TEXT NOT NULL DEFAULT ''"),
        column("deleted_at", "TEXT"),
        column("created_at", "TEXT NOT NULL DEFAULT ''"),
        column("updated_at", "TEXT NOT NULL DEFAULT ''"),
    ],
    indexes: &[
        "CREATE INDEX IF NOT EXISTS idx_subtasks_task ON subtasks(task_id)",
        "CREATE INDEX IF NOT EXISTS idx_subtasks_deleted_at ON subtasks(deleted_at)",
    ],
};

/// The set of record kinds a [`Database`](super::Database) migrates.
#[derive(Debug, Clone)]
pub struct Schema {
    kinds: Vec<RecordKind>,
}

impl Schema {
    /// The task and subtask kinds, in dependency order.
    pub fn tasks() -> Self {
        Self {
            kinds: vec![TASK, SUBTASK],
        }
    }

    /// Creates missing tables and adds missing columns. Never drops anything.
    pub fn migrate(&self, conn: &Connection) -> Result<()> {
        for kind in &self.kinds {
            let existing = table_columns(conn, kind.table)?;

            if existing.is_empty() {
                let columns = kind
                    .columns
                    .iter()
                    .map(|c| format!("{} {}", c.name, c.definition))
                    .collect::<Vec<_>>()
                    .join(",\n    ");
                conn.execute_batch(&format!(
                    "CREATE TABLE IF NOT EXISTS {} (\n    {}\n);",
                    kind.table, columns
                ))?;
                tracing::debug!(table = kind.table, "created table");
            } else {
                for column in kind.columns {
                    if existing.iter().any(|name| name == column.name) {
                        continue;
                    }
                    conn.execute_batch(&format!(
                        "ALTER TABLE {} ADD COLUMN {} {};",
                        kind.table, column.name, column.definition
                    ))?;
                    tracing::info!(table = kind.table, column = column.name, "added column");
                }
            }

            for index in kind.indexes {
                conn.execute_batch(index)?;
            }
        }
        Ok(())
    }
}

fn table_columns(conn: &Connection, table: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(names)
}
