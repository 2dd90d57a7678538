//! Create use case.

use super::{ensure_valid, internal, map_write_error, name_unique_violation, subtask_stats};
use crate::assembler::to_todo_list_item;
use crate::environment::TodoEnvironment;
use crate::error::{Result, TodoUseCaseError};
use crate::ports::{Clock, NewTodoRecord, TodoRepository};
use crate::types::{FieldError, ProgressStatus, RecurrenceType, TodoListItem, ValidationReason};
use crate::usecases::CreateTodoInput;
use crate::validation::{validate_detail, validate_name};

/// Create a new todo for its owner, enforcing the hierarchy, recurrence and
/// active-name invariants.
#[derive(Debug, Clone)]
pub struct CreateTodo<R, C>
where
    R: TodoRepository + Clone,
    C: Clock + Clone,
{
    env: TodoEnvironment<R, C>,
}

impl<R, C> CreateTodo<R, C>
where
    R: TodoRepository + Clone,
    C: Clock + Clone,
{
    /// Create the use case with its environment.
    #[must_use]
    pub const fn new(env: TodoEnvironment<R, C>) -> Self {
        Self { env }
    }

    /// Execute the creation.
    ///
    /// Steps short-circuit on the first failure: field validation,
    /// recurrence-requires-due-date, parent checks (existence, nesting,
    /// recurrence), duplicate active name, then the insert itself. A
    /// uniqueness violation surfacing from the insert (a race with a
    /// concurrent create) maps to the same `name` validation error as the
    /// pre-check.
    ///
    /// # Errors
    ///
    /// [`TodoUseCaseError::Validation`], [`TodoUseCaseError::Conflict`] or
    /// [`TodoUseCaseError::Internal`].
    pub async fn execute(&self, input: CreateTodoInput) -> Result<TodoListItem> {
        let name = input.name.trim().to_string();

        let mut field_errors: Vec<FieldError> = Vec::new();
        field_errors.extend(validate_name(&name));
        field_errors.extend(validate_detail(&input.detail));
        ensure_valid(field_errors)?;

        if input.recurrence_type != RecurrenceType::None && input.due_date.is_none() {
            return Err(TodoUseCaseError::invalid_field(
                "dueDate",
                ValidationReason::Required,
            ));
        }

        if let Some(parent_id) = input.parent_id {
            let parent = self
                .env
                .repo
                .find_by_id_for_owner(parent_id, input.user_id)
                .await
                .map_err(|error| internal(&error))?
                .ok_or_else(|| TodoUseCaseError::conflict("parent todo does not exist"))?;

            if parent.is_subtask() {
                return Err(TodoUseCaseError::conflict(
                    "a subtask cannot be used as a parent",
                ));
            }

            if input.recurrence_type != RecurrenceType::None {
                return Err(TodoUseCaseError::conflict(
                    "subtasks cannot have a recurrence",
                ));
            }
        }

        let duplicated = self
            .env
            .repo
            .find_duplicate_active_name(input.user_id, &name, None)
            .await
            .map_err(|error| internal(&error))?;
        if duplicated.is_some() {
            return Err(name_unique_violation());
        }

        let active_name = if input.progress_status == ProgressStatus::Completed {
            None
        } else {
            Some(name.clone())
        };

        let created = self
            .env
            .repo
            .create(NewTodoRecord {
                owner_id: input.user_id,
                name,
                detail: input.detail,
                due_date: input.due_date,
                progress_status: input.progress_status,
                recurrence_type: input.recurrence_type,
                parent_id: input.parent_id,
                active_name,
                previous_todo_id: None,
            })
            .await
            .map_err(map_write_error)?;

        tracing::debug!(todo_id = %created.id, owner_id = %created.owner_id, "todo created");

        let stats = subtask_stats(&self.env.repo, created.id, input.user_id)
            .await
            .map_err(|error| internal(&error))?;

        Ok(to_todo_list_item(&created, stats))
    }
}
