//! Update use case.
//!
//! Partial patch with invariant re-checks and, when a recurring todo is
//! completed, transactional successor creation.

use super::{ensure_valid, internal, map_write_error, name_unique_violation, subtask_stats};
use crate::assembler::to_todo_list_item;
use crate::environment::TodoEnvironment;
use crate::error::{Result, TodoUseCaseError};
use crate::ports::{Clock, NewTodoRecord, TodoRecordPatch, TodoRepoError, TodoRepository};
use crate::recurrence::next_due_date;
use crate::types::{
    FieldError, ProgressStatus, RecurrenceType, TodoItem, TodoListItem, ValidationReason,
};
use crate::usecases::UpdateTodoInput;
use crate::validation::{validate_detail, validate_name};

/// Patch a todo in place, spawning the recurrence successor inside the same
/// transaction when the patch completes a recurring todo.
#[derive(Debug, Clone)]
pub struct UpdateTodo<R, C>
where
    R: TodoRepository + Clone,
    C: Clock + Clone,
{
    env: TodoEnvironment<R, C>,
}

impl<R, C> UpdateTodo<R, C>
where
    R: TodoRepository + Clone,
    C: Clock + Clone,
{
    /// Create the use case with its environment.
    #[must_use]
    pub const fn new(env: TodoEnvironment<R, C>) -> Self {
        Self { env }
    }

    /// Execute the patch.
    ///
    /// Invariants are re-checked against the *effective* next values
    /// (patch value if supplied, else the current one). The patch and the
    /// successor insert run in a single transaction; a concurrent
    /// completion racing on the successor's uniqueness constraint is
    /// absorbed as a no-op, so neither caller sees a failure and at most
    /// one successor ever exists.
    ///
    /// # Errors
    ///
    /// [`TodoUseCaseError::NotFound`], [`TodoUseCaseError::Validation`],
    /// [`TodoUseCaseError::Conflict`] or [`TodoUseCaseError::Internal`].
    pub async fn execute(&self, input: UpdateTodoInput) -> Result<TodoListItem> {
        let name = input.name.as_ref().map(|name| name.trim().to_string());

        let mut field_errors: Vec<FieldError> = Vec::new();
        if let Some(name) = &name {
            field_errors.extend(validate_name(name));
        }
        if let Some(detail) = &input.detail {
            field_errors.extend(validate_detail(detail));
        }
        ensure_valid(field_errors)?;

        let target = self
            .env
            .repo
            .find_by_id_for_owner(input.todo_id, input.user_id)
            .await
            .map_err(|error| internal(&error))?
            .ok_or(TodoUseCaseError::NotFound)?;

        let next_due_date_value = match input.due_date {
            Some(patched) => patched,
            None => target.due_date,
        };
        let next_recurrence_type = input.recurrence_type.unwrap_or(target.recurrence_type);

        if next_recurrence_type != RecurrenceType::None && next_due_date_value.is_none() {
            return Err(TodoUseCaseError::invalid_field(
                "dueDate",
                ValidationReason::Required,
            ));
        }

        if target.is_subtask() && next_recurrence_type != RecurrenceType::None {
            return Err(TodoUseCaseError::conflict(
                "subtasks cannot have a recurrence",
            ));
        }

        if let Some(name) = &name {
            let duplicated = self
                .env
                .repo
                .find_duplicate_active_name(input.user_id, name, Some(target.id))
                .await
                .map_err(|error| internal(&error))?;
            if duplicated.is_some() {
                return Err(name_unique_violation());
            }
        }

        let next_progress_status = input.progress_status.unwrap_or(target.progress_status);

        if !target.is_subtask()
            && target.progress_status != ProgressStatus::Completed
            && next_progress_status == ProgressStatus::Completed
        {
            let incomplete = self
                .env
                .repo
                .find_incomplete_subtask(target.id, input.user_id)
                .await
                .map_err(|error| internal(&error))?;
            if incomplete.is_some() {
                return Err(TodoUseCaseError::conflict(
                    "cannot complete a todo while subtasks are incomplete",
                ));
            }
        }

        let next_name = name.clone().unwrap_or_else(|| target.name.clone());
        let should_generate_successor = target.progress_status != ProgressStatus::Completed
            && next_progress_status == ProgressStatus::Completed
            && next_recurrence_type != RecurrenceType::None
            && next_due_date_value.is_some();

        let patch = TodoRecordPatch {
            name,
            detail: input.detail,
            due_date: input.due_date,
            progress_status: input.progress_status,
            recurrence_type: input.recurrence_type,
            active_name: Some(if next_progress_status == ProgressStatus::Completed {
                None
            } else {
                Some(next_name)
            }),
        };

        let utc_today = self.env.clock.now().date_naive();
        let todo_id = input.todo_id;
        let owner_id = input.user_id;

        let updated = self
            .env
            .repo
            .in_transaction::<TodoItem>(Box::new(move |tx| {
                Box::pin(async move {
                    let updated = tx.update(todo_id, owner_id, patch).await?;

                    if should_generate_successor {
                        let successor = NewTodoRecord {
                            owner_id,
                            name: updated.name.clone(),
                            detail: updated.detail.clone(),
                            due_date: Some(next_due_date(next_recurrence_type, utc_today)),
                            progress_status: ProgressStatus::NotStarted,
                            recurrence_type: updated.recurrence_type,
                            parent_id: None,
                            active_name: Some(updated.name.clone()),
                            previous_todo_id: Some(updated.id),
                        };

                        match tx.create(successor).await {
                            Ok(spawned) => {
                                tracing::debug!(
                                    todo_id = %updated.id,
                                    successor_id = %spawned.id,
                                    "successor spawned for completed recurring todo"
                                );
                            }
                            Err(TodoRepoError::DuplicateSuccessor) => {
                                // Lost a concurrent completion race; the
                                // successor already exists.
                                tracing::warn!(
                                    todo_id = %updated.id,
                                    "successor already exists, skipping"
                                );
                            }
                            Err(error) => return Err(error),
                        }
                    }

                    Ok(updated)
                })
            }))
            .await
            .map_err(map_write_error)?;

        tracing::debug!(todo_id = %updated.id, owner_id = %updated.owner_id, "todo updated");

        let stats = subtask_stats(&self.env.repo, updated.id, input.user_id)
            .await
            .map_err(|error| internal(&error))?;

        Ok(to_todo_list_item(&updated, stats))
    }
}
