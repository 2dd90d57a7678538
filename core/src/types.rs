//! Domain types for the todo lifecycle engine.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a persisted todo, assigned by storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(pub i64);

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the user owning a todo.
///
/// Every repository operation is scoped to an owner; a lookup for the wrong
/// owner behaves as "not found", never as "forbidden".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Progress of a todo through its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStatus {
    /// Work has not begun.
    NotStarted,
    /// Work is underway.
    InProgress,
    /// The todo is done. A completed todo's name no longer participates in
    /// the per-owner active-name uniqueness constraint.
    Completed,
}

impl ProgressStatus {
    /// Canonical string form, matching the persisted representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

/// How a todo recurs once completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceType {
    /// One-shot todo.
    None,
    /// Next occurrence is due the following day.
    Daily,
    /// Next occurrence is due seven days later.
    Weekly,
    /// Next occurrence is due the same calendar day next month, clamped to
    /// the last valid day of the target month.
    Monthly,
}

impl RecurrenceType {
    /// Canonical string form, matching the persisted representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

/// Due-date bucket filter for the List use case, evaluated against the
/// clock's UTC-today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DueDateFilter {
    /// No due-date filtering.
    All,
    /// Due exactly today.
    Today,
    /// Due within today and the following six days.
    ThisWeek,
    /// Due strictly before today.
    Overdue,
    /// No due date set.
    None,
}

/// A persisted todo as surfaced by the repository port.
///
/// The storage-only `active_name` column is not part of this shape; it is
/// supplied on writes via [`crate::ports::NewTodoRecord`] and
/// [`crate::ports::TodoRecordPatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoItem {
    /// Storage-assigned identifier.
    pub id: TodoId,
    /// Owning user.
    pub owner_id: UserId,
    /// Display name, unique among the owner's non-completed todos.
    pub name: String,
    /// Free-form description, empty by default.
    pub detail: String,
    /// Date-only deadline, if any.
    pub due_date: Option<NaiveDate>,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
    /// Lifecycle state.
    pub progress_status: ProgressStatus,
    /// Recurrence policy. Always [`RecurrenceType::None`] for subtasks.
    pub recurrence_type: RecurrenceType,
    /// Parent todo for subtasks; parents themselves are always root-level.
    pub parent_id: Option<TodoId>,
    /// The completed recurring todo this one was spawned from, if any.
    pub previous_todo_id: Option<TodoId>,
}

impl TodoItem {
    /// Whether this todo is a subtask of another todo.
    #[must_use]
    pub const fn is_subtask(&self) -> bool {
        self.parent_id.is_some()
    }
}

/// The externally visible shape of a todo, assembled from the persisted
/// entity plus its subtask statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoListItem {
    /// Storage-assigned identifier.
    pub id: TodoId,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub detail: String,
    /// Deadline rendered as `YYYY-MM-DD`, if set.
    pub due_date: Option<String>,
    /// Creation instant rendered as ISO-8601.
    pub created_at: String,
    /// Lifecycle state.
    pub progress_status: ProgressStatus,
    /// Recurrence policy.
    pub recurrence_type: RecurrenceType,
    /// Parent todo for subtasks.
    pub parent_id: Option<TodoId>,
    /// Number of completed subtasks.
    pub completed_subtask_count: u64,
    /// Total number of subtasks.
    pub total_subtask_count: u64,
    /// `floor(completed * 100 / total)`; `0` when there are no subtasks.
    pub subtask_progress_percent: u8,
}

/// Why a field failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationReason {
    /// The field is mandatory in this context but was absent or empty.
    Required,
    /// The value collides with another non-completed todo's name.
    UniqueViolation,
    /// The value exceeds the field's length limit.
    MaxLength,
    /// The value is not in the expected format.
    InvalidFormat,
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Name of the offending input field.
    pub field: String,
    /// Classification of the failure.
    pub reason: ValidationReason,
    /// Length limit that was exceeded, for [`ValidationReason::MaxLength`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl FieldError {
    /// Build a validation failure for `field` with the given `reason`.
    #[must_use]
    pub fn new(field: impl Into<String>, reason: ValidationReason) -> Self {
        Self {
            field: field.into(),
            reason,
            limit: None,
        }
    }

    /// Build a [`ValidationReason::MaxLength`] failure carrying the limit.
    #[must_use]
    pub fn max_length(field: impl Into<String>, limit: u32) -> Self {
        Self {
            field: field.into(),
            reason: ValidationReason::MaxLength,
            limit: Some(limit),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn progress_status_round_trips_through_str() {
        for status in [
            ProgressStatus::NotStarted,
            ProgressStatus::InProgress,
            ProgressStatus::Completed,
        ] {
            let json = format!("\"{}\"", status.as_str());
            let parsed: ProgressStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn recurrence_type_round_trips_through_str() {
        for recurrence in [
            RecurrenceType::None,
            RecurrenceType::Daily,
            RecurrenceType::Weekly,
            RecurrenceType::Monthly,
        ] {
            let json = format!("\"{}\"", recurrence.as_str());
            let parsed: RecurrenceType = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, recurrence);
        }
    }

    #[test]
    fn field_error_limit_is_omitted_when_absent() {
        let json = serde_json::to_string(&FieldError::new("name", ValidationReason::Required))
            .unwrap();
        assert!(!json.contains("limit"));

        let json = serde_json::to_string(&FieldError::max_length("name", 100)).unwrap();
        assert!(json.contains("\"limit\":100"));
    }
}
