use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::subtask::{CreateSubtaskInput, Subtask, SubtaskEdit};
use crate::error::{Result, StoreError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "deleted")]
    pub deleted_at: Option<DateTime<Utc>>,
    pub name: String,
    pub description: String,
    pub start: Option<DateTime<Utc>>,
    pub finish: Option<DateTime<Utc>>,
    pub subtasks: Vec<Subtask>,
}

impl Task {
    pub fn subtask(&self, id: i64) -> Option<&Subtask> {
        self.subtasks.iter().find(|s| s.id == id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaskInput {
    pub name: String,
    pub description: String,
    /// Epoch seconds. Zero is a real timestamp (the Unix epoch), not "unset".
    #[serde(default)]
    pub start: Option<i64>,
    #[serde(default)]
    pub finish: Option<i64>,
    #[serde(default)]
    pub subtasks: Vec<CreateSubtaskInput>,
}

impl CreateTaskInput {
    pub fn validate(&self) -> Result<()> {
        require_text("name", &self.name)?;
        require_text("description", &self.description)?;
        Ok(())
    }
}

/// Partial update of a task. Absent fields are left untouched.
///
/// `name` and `description` present but empty are rejected rather than
/// ignored, since neither may ever be blank.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTaskInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `Some(None)` (JSON `null`) clears the start time.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub start: Option<Option<i64>>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub finish: Option<Option<i64>>,
    #[serde(default)]
    pub subtasks: Vec<SubtaskEdit>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedTask {
    pub id: i64,
}

/// Converts epoch seconds into a UTC timestamp.
///
/// Only years 0000 through 9999 are accepted; anything else has no RFC 3339
/// form and could not be read back from the store.
pub fn timestamp_from_epoch(field: &str, secs: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
        .filter(|ts| (0..=9999).contains(&ts.year()))
        .ok_or_else(|| StoreError::validation(format!("{field} timestamp {secs} is out of range")))
}

/// Rejects blank values of fields that must always carry text.
pub fn require_text(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(StoreError::validation(format!("{field} must not be empty")));
    }
    Ok(())
}

// Distinguishes an explicit `null` from a missing field.
fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_input_defaults_optional_fields() {
        let input: CreateTaskInput =
            serde_json::from_value(json!({"name": "n", "description": "d"})).unwrap();
        assert_eq!(input.start, None);
        assert_eq!(input.finish, None);
        assert!(input.subtasks.is_empty());
        assert!(input.validate().is_ok());
    }

    #[test]
    fn create_input_requires_name() {
        let err = serde_json::from_value::<CreateTaskInput>(json!({"description": "d"}))
            .unwrap_err();
        assert!(err.to_string().contains("name"));

        let input: CreateTaskInput =
            serde_json::from_value(json!({"name": "", "description": "d"})).unwrap();
        let err = input.validate().unwrap_err();
        assert_eq!(err.to_string(), "name must not be empty");
    }

    #[test]
    fn update_input_tells_null_from_missing() {
        let input: UpdateTaskInput =
            serde_json::from_value(json!({"start": null, "finish": 10})).unwrap();
        assert_eq!(input.start, Some(None));
        assert_eq!(input.finish, Some(Some(10)));

        let input: UpdateTaskInput = serde_json::from_value(json!({"name": "x"})).unwrap();
        assert_eq!(input.start, None);
        assert_eq!(input.finish, None);
    }

    #[test]
    fn epoch_zero_is_a_timestamp() {
        let ts = timestamp_from_epoch("start", 0).unwrap();
        assert_eq!(ts.timestamp(), 0);
        assert!(timestamp_from_epoch("start", i64::MAX).is_err());
    }

    #[test]
    fn timestamps_stay_within_four_digit_years() {
        let last = timestamp_from_epoch("start", 253_402_300_799).unwrap();
        assert_eq!(last.to_rfc3339(), "9999-12-31T23:59:59+00:00");
        let first = timestamp_from_epoch("start", -62_167_219_200).unwrap();
        assert_eq!(first.year(), 0);

        let err = timestamp_from_epoch("start", 253_402_300_800).unwrap_err();
        assert_eq!(err.to_string(), "start timestamp 253402300800 is out of range");
        assert!(timestamp_from_epoch("finish", -62_167_219_201).is_err());
    }

    #[test]
    fn task_serializes_with_wire_names() {
        let now = Utc::now();
        let task = Task {
            id: 3,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            name: "n".into(),
            description: "d".into(),
            start: None,
            finish: None,
            subtasks: vec![Subtask {
                id: 7,
                created_at: now,
                updated_at: now,
                deleted_at: None,
                description: "s".into(),
                task_id: Some(3),
            }],
        };

        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["id"], 3);
        assert!(value["createdAt"].is_string());
        assert!(value["deleted"].is_null());
        assert_eq!(value["subtasks"][0]["description"], "s");
        assert!(value["subtasks"][0].get("task_id").is_none());
        assert!(value["subtasks"][0].get("taskId").is_none());
    }
}
