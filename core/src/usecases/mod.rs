//! Use-case orchestrators.
//!
//! One orchestrator per operation, each constructed with a
//! [`TodoEnvironment`](crate::environment::TodoEnvironment) and exposing a
//! single `execute` method. Orchestrators sequence repository calls, apply
//! the domain invariants, and map every repository failure into the closed
//! [`TodoUseCaseError`](crate::error::TodoUseCaseError) taxonomy.

mod create;
mod delete;
mod get;
mod list;
mod types;
mod update;

pub use create::CreateTodo;
pub use delete::DeleteTodo;
pub use get::GetTodo;
pub use list::ListTodos;
pub use types::{
    CreateTodoInput, DeleteTodoInput, GetTodoInput, ListTodosInput, UpdateTodoInput,
};
pub use update::UpdateTodo;

use crate::assembler::SubtaskStats;
use crate::error::TodoUseCaseError;
use crate::ports::{TodoRepoError, TodoRepository};
use crate::types::{FieldError, TodoId, UserId, ValidationReason};

/// The single-entry validation error for a name colliding with another
/// non-completed todo.
fn name_unique_violation() -> TodoUseCaseError {
    TodoUseCaseError::invalid_field("name", ValidationReason::UniqueViolation)
}

/// Log an unanticipated repository failure and return the opaque internal
/// error. The cause never crosses the use-case boundary.
fn internal(error: &TodoRepoError) -> TodoUseCaseError {
    tracing::error!(error = %error, "repository failure");
    TodoUseCaseError::Internal
}

/// Map a repository failure from a write whose duplicate-active-name case
/// surfaces as a field validation error.
fn map_write_error(error: TodoRepoError) -> TodoUseCaseError {
    match error {
        TodoRepoError::DuplicateActiveName => name_unique_violation(),
        TodoRepoError::DuplicateSuccessor | TodoRepoError::Unexpected(_) => internal(&error),
    }
}

/// Accumulated field errors, or `Ok` when all supplied fields validate.
fn ensure_valid(errors: Vec<FieldError>) -> Result<(), TodoUseCaseError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(TodoUseCaseError::validation(errors))
    }
}

/// Fetch both subtask counters for a todo.
async fn subtask_stats<R: TodoRepository>(
    repo: &R,
    id: TodoId,
    owner_id: UserId,
) -> Result<SubtaskStats, TodoRepoError> {
    let (total_subtask_count, completed_subtask_count) = futures::try_join!(
        repo.count_by_parent_id(id, owner_id),
        repo.count_completed_by_parent_id(id, owner_id),
    )?;

    Ok(SubtaskStats {
        completed_subtask_count,
        total_subtask_count,
    })
}
