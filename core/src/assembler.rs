//! List-item assembler.
//!
//! Turns a persisted [`TodoItem`] plus its subtask statistics into the
//! externally visible [`TodoListItem`] shape.

use crate::types::{TodoItem, TodoListItem};
use chrono::SecondsFormat;

/// Subtask completion statistics for a single todo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SubtaskStats {
    /// Number of subtasks in `completed` state.
    pub completed_subtask_count: u64,
    /// Total number of subtasks.
    pub total_subtask_count: u64,
}

/// Assemble the external list-item shape for a todo.
///
/// The progress percentage is integer floor division
/// (`completed * 100 / total`), `0` when the todo has no subtasks. The due
/// date renders date-only (`YYYY-MM-DD`); the creation instant renders as
/// full ISO-8601 with millisecond precision.
#[must_use]
pub fn to_todo_list_item(todo: &TodoItem, stats: SubtaskStats) -> TodoListItem {
    let subtask_progress_percent = if stats.total_subtask_count == 0 {
        0
    } else {
        #[allow(clippy::cast_possible_truncation)] // quotient is always <= 100
        {
            (stats.completed_subtask_count * 100 / stats.total_subtask_count) as u8
        }
    };

    TodoListItem {
        id: todo.id,
        name: todo.name.clone(),
        detail: todo.detail.clone(),
        due_date: todo.due_date.map(|date| date.format("%Y-%m-%d").to_string()),
        created_at: todo
            .created_at
            .to_rfc3339_opts(SecondsFormat::Millis, true),
        progress_status: todo.progress_status,
        recurrence_type: todo.recurrence_type,
        parent_id: todo.parent_id,
        completed_subtask_count: stats.completed_subtask_count,
        total_subtask_count: stats.total_subtask_count,
        subtask_progress_percent,
    }
}
