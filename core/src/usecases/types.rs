//! Typed inputs for the use-case orchestrators.
//!
//! The route collaborator parses and shapes requests into these records;
//! the use cases only ever see typed values.

use crate::types::{DueDateFilter, ProgressStatus, RecurrenceType, TodoId, UserId};
use chrono::NaiveDate;

/// Input for [`super::ListTodos`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListTodosInput {
    /// Calling user; results are scoped to this owner.
    pub user_id: UserId,
    /// Substring keyword matched case-sensitively against name or detail.
    /// Trimmed before matching; empty matches everything.
    pub keyword: Option<String>,
    /// Optional progress-status filter.
    pub progress_status: Option<ProgressStatus>,
    /// Optional due-date bucket filter, relative to the clock's UTC-today.
    pub due_date_filter: Option<DueDateFilter>,
}

/// Input for [`super::GetTodo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetTodoInput {
    /// Calling user.
    pub user_id: UserId,
    /// Todo to fetch.
    pub todo_id: TodoId,
}

/// Input for [`super::CreateTodo`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTodoInput {
    /// Calling user, who becomes the owner.
    pub user_id: UserId,
    /// Display name; trimmed, non-empty, at most 100 characters.
    pub name: String,
    /// Free-form description, at most 500 characters.
    pub detail: String,
    /// Date-only deadline. Mandatory when `recurrence_type` is not `None`.
    pub due_date: Option<NaiveDate>,
    /// Initial lifecycle state.
    pub progress_status: ProgressStatus,
    /// Recurrence policy. Must be `None` for subtasks.
    pub recurrence_type: RecurrenceType,
    /// Parent todo, when creating a subtask.
    pub parent_id: Option<TodoId>,
}

/// Input for [`super::UpdateTodo`].
///
/// Partial patch: `None` leaves a field unchanged. For `due_date` the inner
/// `Option` distinguishes "set to this date" from "clear".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTodoInput {
    /// Calling user.
    pub user_id: UserId,
    /// Todo to patch.
    pub todo_id: TodoId,
    /// New name, if changing.
    pub name: Option<String>,
    /// New detail, if changing.
    pub detail: Option<String>,
    /// New due date (`Some(None)` clears it), if changing.
    pub due_date: Option<Option<NaiveDate>>,
    /// New lifecycle state, if changing.
    pub progress_status: Option<ProgressStatus>,
    /// New recurrence policy, if changing.
    pub recurrence_type: Option<RecurrenceType>,
}

/// Input for [`super::DeleteTodo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteTodoInput {
    /// Calling user.
    pub user_id: UserId,
    /// Todo to delete.
    pub todo_id: TodoId,
}
