//! Merging a partial update into a stored task.
//!
//! [`reconcile`] applies scalar fields to the task in memory and decides what
//! each subtask edit means for storage. It never touches the database; the
//! store persists the merged task and the returned [`SubtaskChange`]s in one
//! transaction.

use crate::error::Result;
use crate::models::{require_text, timestamp_from_epoch, Task, UpdateTaskInput};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubtaskChange {
    /// Overwrite the description of a subtask the task already owns.
    Rename { id: i64, description: String },
    /// Insert a new subtask under the task.
    Append { description: String },
}

/// Merges `input` into `task` and returns the subtask writes it implies.
///
/// Subtasks the input does not mention are left alone. An edit whose id is
/// not one of the task's live subtasks is treated as a new subtask.
pub fn reconcile(task: &mut Task, input: UpdateTaskInput) -> Result<Vec<SubtaskChange>> {
    let UpdateTaskInput {
        name,
        description,
        start,
        finish,
        subtasks,
    } = input;

    if let Some(name) = name {
        require_text("name", &name)?;
        task.name = name;
    }

    if let Some(description) = description {
        require_text("description", &description)?;
        task.description = description;
    }

    if let Some(start) = start {
        task.start = start
            .map(|secs| timestamp_from_epoch("start", secs))
            .transpose()?;
    }

    if let Some(finish) = finish {
        task.finish = finish
            .map(|secs| timestamp_from_epoch("finish", secs))
            .transpose()?;
    }

    let mut changes = Vec::with_capacity(subtasks.len());
    for edit in subtasks {
        let owned = edit
            .id
            .filter(|id| *id > 0)
            .and_then(|id| task.subtasks.iter_mut().find(|s| s.id == id));

        match owned {
            Some(subtask) => {
                subtask.description = edit.description.clone();
                changes.push(SubtaskChange::Rename {
                    id: subtask.id,
                    description: edit.description,
                });
            }
            None => changes.push(SubtaskChange::Append {
                description: edit.description,
            }),
        }
    }

    Ok(changes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Subtask, SubtaskEdit};
    use chrono::{DateTime, Utc};

    fn stored_task() -> Task {
        let now = Utc::now();
        let subtask = |id: i64, description: &str| Subtask {
            id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            description: description.to_string(),
            task_id: Some(1),
        };

        Task {
            id: 1,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            name: "write docs".into(),
            description: "user guide".into(),
            start: DateTime::from_timestamp(1_662_631_155, 0),
            finish: DateTime::from_timestamp(1_662_717_555, 0),
            subtasks: vec![subtask(10, "outline"), subtask(11, "draft")],
        }
    }

    #[test]
    fn name_only_leaves_other_fields() {
        let mut task = stored_task();
        let before = task.clone();

        let changes = reconcile(
            &mut task,
            UpdateTaskInput {
                name: Some("write better docs".into()),
                ..Default::default()
            },
        )
        .unwrap();

        assert!(changes.is_empty());
        assert_eq!(task.name, "write better docs");
        assert_eq!(task.description, before.description);
        assert_eq!(task.start, before.start);
        assert_eq!(task.finish, before.finish);
        assert_eq!(task.subtasks, before.subtasks);
    }

    #[test]
    fn empty_name_is_rejected() {
        let mut task = stored_task();
        let err = reconcile(
            &mut task,
            UpdateTaskInput {
                name: Some(String::new()),
                ..Default::default()
            },
        )
        .unwrap_err();

        assert_eq!(err.to_string(), "name must not be empty");
    }

    #[test]
    fn start_can_be_set_to_epoch_or_cleared() {
        let mut task = stored_task();
        reconcile(
            &mut task,
            UpdateTaskInput {
                start: Some(Some(0)),
                finish: Some(None),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(task.start.map(|t| t.timestamp()), Some(0));
        assert_eq!(task.finish, None);
    }

    #[test]
    fn known_id_renames_and_unknown_id_appends() {
        let mut task = stored_task();
        let changes = reconcile(
            &mut task,
            UpdateTaskInput {
                subtasks: vec![
                    SubtaskEdit::existing(11, "second draft"),
                    SubtaskEdit::new("publish"),
                    SubtaskEdit::existing(99, "review"),
                    SubtaskEdit::existing(0, "proofread"),
                ],
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(
            changes,
            vec![
                SubtaskChange::Rename {
                    id: 11,
                    description: "second draft".into()
                },
                SubtaskChange::Append {
                    description: "publish".into()
                },
                SubtaskChange::Append {
                    description: "review".into()
                },
                SubtaskChange::Append {
                    description: "proofread".into()
                },
            ]
        );
        assert_eq!(task.subtask(11).unwrap().description, "second draft");
        assert_eq!(task.subtask(10).unwrap().description, "outline");
    }
}
