use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::Database;
use crate::error::Result;
use crate::models::{timestamp_from_epoch, CreateTaskInput, Subtask, Task, UpdateTaskInput};
use crate::reconcile::{reconcile, SubtaskChange};

const TASK_COLUMNS: &str = "id, name, description, start, finish, deleted_at, created_at, updated_at";
const SUBTASK_COLUMNS: &str = "id, task_id, description, deleted_at, created_at, updated_at";

impl Database {
    /// Inserts a task and its subtasks, returning the new task id.
    pub fn create_task(&self, input: CreateTaskInput) -> Result<i64> {
        input.validate()?;
        let start = input
            .start
            .map(|secs| timestamp_from_epoch("start", secs))
            .transpose()?;
        let finish = input
            .finish
            .map(|secs| timestamp_from_epoch("finish", secs))
            .transpose()?;
        let now = Utc::now().to_rfc3339();

        self.with_connection(|conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO tasks (name, description, start, finish, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
                params![
                    input.name,
                    input.description,
                    start.map(|t| t.to_rfc3339()),
                    finish.map(|t| t.to_rfc3339()),
                    now,
                ],
            )?;
            let id = tx.last_insert_rowid();

            for subtask in &input.subtasks {
                insert_subtask(&tx, id, &subtask.description, &now)?;
            }
            tx.commit()?;

            tracing::debug!(task_id = id, subtasks = input.subtasks.len(), "created task");
            Ok(id)
        })
    }

    /// All live tasks in id order, each with its live subtasks.
    pub fn get_all_tasks(&self) -> Result<Vec<Task>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {TASK_COLUMNS} FROM tasks WHERE deleted_at IS NULL ORDER BY id"
            ))?;
            let mut tasks = stmt
                .query_map([], task_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            let mut stmt = conn.prepare(&format!(
                "SELECT {SUBTASK_COLUMNS} FROM subtasks
                 WHERE deleted_at IS NULL
                   AND task_id IN (SELECT id FROM tasks WHERE deleted_at IS NULL)
                 ORDER BY id"
            ))?;
            let mut by_task: HashMap<i64, Vec<Subtask>> = HashMap::new();
            for subtask in stmt.query_map([], subtask_from_row)? {
                let subtask = subtask?;
                if let Some(task_id) = subtask.task_id {
                    by_task.entry(task_id).or_default().push(subtask);
                }
            }

            for task in &mut tasks {
                task.subtasks = by_task.remove(&task.id).unwrap_or_default();
            }
            Ok(tasks)
        })
    }

    pub fn get_task(&self, id: i64) -> Result<Option<Task>> {
        self.with_connection(|conn| find_task(conn, id))
    }

    /// Applies a partial update. Returns `false` if no live task has `id`.
    pub fn update_task(&self, id: i64, input: UpdateTaskInput) -> Result<bool> {
        self.with_connection(|conn| {
            let tx = conn.transaction()?;
            let Some(mut task) = find_task(&tx, id)? else {
                return Ok(false);
            };

            let changes = reconcile(&mut task, input)?;
            let now = Utc::now().to_rfc3339();

            tx.execute(
                "UPDATE tasks SET name = ?1, description = ?2, start = ?3, finish = ?4, updated_at = ?5
                 WHERE id = ?6",
                params![
                    task.name,
                    task.description,
                    task.start.map(|t| t.to_rfc3339()),
                    task.finish.map(|t| t.to_rfc3339()),
                    now,
                    id,
                ],
            )?;

            for change in &changes {
                match change {
                    SubtaskChange::Rename {
                        id: subtask_id,
                        description,
                    } => {
                        tx.execute(
                            "UPDATE subtasks SET description = ?1, updated_at = ?2
                             WHERE id = ?3 AND task_id = ?4",
                            params![description, now, subtask_id, id],
                        )?;
                    }
                    SubtaskChange::Append { description } => {
                        insert_subtask(&tx, id, description, &now)?;
                    }
                }
            }
            tx.commit()?;

            tracing::debug!(task_id = id, subtask_changes = changes.len(), "updated task");
            Ok(true)
        })
    }

    /// Soft-deletes a task and detaches its subtasks. Returns `false` if no
    /// live task has `id`.
    pub fn delete_task(&self, id: i64) -> Result<bool> {
        self.with_connection(|conn| {
            let tx = conn.transaction()?;
            let live = tx
                .query_row(
                    "SELECT id FROM tasks WHERE id = ?1 AND deleted_at IS NULL",
                    [id],
                    |row| row.get::<_, i64>(0),
                )
                .optional()?;
            if live.is_none() {
                return Ok(false);
            }

            let now = Utc::now().to_rfc3339();
            let detached = tx.execute(
                "UPDATE subtasks SET task_id = NULL, updated_at = ?1 WHERE task_id = ?2",
                params![now, id],
            )?;
            tx.execute(
                "UPDATE tasks SET deleted_at = ?1 WHERE id = ?2",
                params![now, id],
            )?;
            tx.commit()?;

            tracing::debug!(task_id = id, detached, "deleted task");
            Ok(true)
        })
    }
}

fn find_task(conn: &Connection, id: i64) -> Result<Option<Task>> {
    let task = conn
        .query_row(
            &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1 AND deleted_at IS NULL"),
            [id],
            task_from_row,
        )
        .optional()?;

    let Some(mut task) = task else {
        return Ok(None);
    };

    let mut stmt = conn.prepare(&format!(
        "SELECT {SUBTASK_COLUMNS} FROM subtasks
         WHERE task_id = ?1 AND deleted_at IS NULL
         ORDER BY id"
    ))?;
    task.subtasks = stmt
        .query_map([id], subtask_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(Some(task))
}

fn insert_subtask(conn: &Connection, task_id: i64, description: &str, now: &str) -> Result<i64> {
    conn.execute(
        "INSERT INTO subtasks (task_id, description, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?3)",
        params![task_id, description, now],
    )?;
    Ok(conn.last_insert_rowid())
}

fn task_from_row(row: &Row) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        start: optional_timestamp(row, 3)?,
        finish: optional_timestamp(row, 4)?,
        deleted_at: optional_timestamp(row, 5)?,
        created_at: timestamp(row, 6)?,
        updated_at: timestamp(row, 7)?,
        subtasks: Vec::new(),
    })
}

fn subtask_from_row(row: &Row) -> rusqlite::Result<Subtask> {
    Ok(Subtask {
        id: row.get(0)?,
        task_id: row.get(1)?,
        description: row.get(2)?,
        deleted_at: optional_timestamp(row, 3)?,
        created_at: timestamp(row, 4)?,
        updated_at: timestamp(row, 5)?,
    })
}

fn optional_timestamp(row: &Row, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let value: Option<String> = row.get(idx)?;
    value
        .map(|s| {
            DateTime::parse_from_rfc3339(&s)
                .map(|t| t.with_timezone(&Utc))
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
        })
        .transpose()
}

fn timestamp(row: &Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    optional_timestamp(row, idx)?
        .ok_or_else(|| rusqlite::Error::InvalidColumnType(idx, "timestamp".into(), Type::Null))
}
