//! List use case.

use super::{internal, subtask_stats};
use crate::assembler::to_todo_list_item;
use crate::environment::TodoEnvironment;
use crate::error::Result;
use crate::ports::{Clock, TodoQuery, TodoRepository};
use crate::types::TodoListItem;
use crate::usecases::ListTodosInput;

/// List an owner's todos with storage-level status/due-date filtering and an
/// in-memory keyword match.
#[derive(Debug, Clone)]
pub struct ListTodos<R, C>
where
    R: TodoRepository + Clone,
    C: Clock + Clone,
{
    env: TodoEnvironment<R, C>,
}

impl<R, C> ListTodos<R, C>
where
    R: TodoRepository + Clone,
    C: Clock + Clone,
{
    /// Create the use case with its environment.
    #[must_use]
    pub const fn new(env: TodoEnvironment<R, C>) -> Self {
        Self { env }
    }

    /// Execute the listing.
    ///
    /// The repository applies owner scoping, the optional status filter and
    /// the due-date bucket (anchored to the clock's UTC-today) and returns
    /// rows newest first. The keyword is trimmed and matched here as a
    /// case-sensitive substring against name OR detail; an empty keyword
    /// matches everything. Repository ordering is preserved.
    ///
    /// # Errors
    ///
    /// [`crate::error::TodoUseCaseError::Internal`] on repository failure.
    pub async fn execute(&self, input: ListTodosInput) -> Result<Vec<TodoListItem>> {
        let todos = self
            .env
            .repo
            .list_by_owner(TodoQuery {
                owner_id: input.user_id,
                now: self.env.clock.now(),
                progress_status: input.progress_status,
                due_date_filter: input.due_date_filter,
            })
            .await
            .map_err(|error| internal(&error))?;

        let keyword = input
            .keyword
            .as_deref()
            .map(str::trim)
            .unwrap_or_default();
        let matching = todos.into_iter().filter(|todo| {
            keyword.is_empty() || todo.name.contains(keyword) || todo.detail.contains(keyword)
        });

        let mut items = Vec::new();
        for todo in matching {
            let stats = subtask_stats(&self.env.repo, todo.id, input.user_id)
                .await
                .map_err(|error| internal(&error))?;
            items.push(to_todo_list_item(&todo, stats));
        }

        Ok(items)
    }
}
