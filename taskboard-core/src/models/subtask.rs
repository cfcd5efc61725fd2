use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtask {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "deleted")]
    pub deleted_at: Option<DateTime<Utc>>,
    pub description: String,
    /// Owning task; cleared when the task is deleted.
    #[serde(skip)]
    pub task_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSubtaskInput {
    pub description: String,
}

/// One entry of an update's `subtasks` list.
///
/// With an `id` it renames that subtask; without one it appends a new subtask.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubtaskEdit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub description: String,
}

impl SubtaskEdit {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            id: None,
            description: description.into(),
        }
    }

    pub fn existing(id: i64, description: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            description: description.into(),
        }
    }
}
