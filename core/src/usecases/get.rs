//! Get use case.

use super::{internal, subtask_stats};
use crate::assembler::to_todo_list_item;
use crate::environment::TodoEnvironment;
use crate::error::{Result, TodoUseCaseError};
use crate::ports::{Clock, TodoRepository};
use crate::types::TodoListItem;
use crate::usecases::GetTodoInput;

/// Fetch a single todo with its subtask statistics.
#[derive(Debug, Clone)]
pub struct GetTodo<R, C>
where
    R: TodoRepository + Clone,
    C: Clock + Clone,
{
    env: TodoEnvironment<R, C>,
}

impl<R, C> GetTodo<R, C>
where
    R: TodoRepository + Clone,
    C: Clock + Clone,
{
    /// Create the use case with its environment.
    #[must_use]
    pub const fn new(env: TodoEnvironment<R, C>) -> Self {
        Self { env }
    }

    /// Execute the lookup. A todo belonging to another owner is absent, not
    /// forbidden.
    ///
    /// # Errors
    ///
    /// [`TodoUseCaseError::NotFound`] or [`TodoUseCaseError::Internal`].
    pub async fn execute(&self, input: GetTodoInput) -> Result<TodoListItem> {
        let todo = self
            .env
            .repo
            .find_by_id_for_owner(input.todo_id, input.user_id)
            .await
            .map_err(|error| internal(&error))?
            .ok_or(TodoUseCaseError::NotFound)?;

        let stats = subtask_stats(&self.env.repo, todo.id, input.user_id)
            .await
            .map_err(|error| internal(&error))?;

        Ok(to_todo_list_item(&todo, stats))
    }
}
