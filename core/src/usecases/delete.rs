//! Delete use case.

use super::internal;
use crate::environment::TodoEnvironment;
use crate::error::{Result, TodoUseCaseError};
use crate::ports::{Clock, TodoRepository};
use crate::usecases::DeleteTodoInput;

/// Hard-delete a todo.
///
/// Subtasks of a deleted parent are left in place with a dangling
/// `parent_id`; no cascade is performed.
#[derive(Debug, Clone)]
pub struct DeleteTodo<R, C>
where
    R: TodoRepository + Clone,
    C: Clock + Clone,
{
    env: TodoEnvironment<R, C>,
}

impl<R, C> DeleteTodo<R, C>
where
    R: TodoRepository + Clone,
    C: Clock + Clone,
{
    /// Create the use case with its environment.
    #[must_use]
    pub const fn new(env: TodoEnvironment<R, C>) -> Self {
        Self { env }
    }

    /// Execute the deletion.
    ///
    /// # Errors
    ///
    /// [`TodoUseCaseError::NotFound`] when the todo does not exist for this
    /// owner, [`TodoUseCaseError::Internal`] on repository failure.
    pub async fn execute(&self, input: DeleteTodoInput) -> Result<()> {
        let target = self
            .env
            .repo
            .find_by_id_for_owner(input.todo_id, input.user_id)
            .await
            .map_err(|error| internal(&error))?;
        if target.is_none() {
            return Err(TodoUseCaseError::NotFound);
        }

        self.env
            .repo
            .delete_by_id(input.todo_id, input.user_id)
            .await
            .map_err(|error| internal(&error))?;

        tracing::debug!(todo_id = %input.todo_id, owner_id = %input.user_id, "todo deleted");

        Ok(())
    }
}
