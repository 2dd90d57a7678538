//! Todo repository port.
//!
//! The abstract persistence contract the use cases depend on: point
//! lookups, filtered listing, counts, duplicate detection, and a
//! higher-order transaction scope.
//!
//! # Dyn compatibility
//!
//! [`TodoWriter`] uses explicit `Pin<Box<dyn Future>>` returns instead of
//! `async fn` so it can be used as a trait object: the transaction callback
//! receives `&dyn TodoWriter` scoped to the running transaction.
//! [`TodoRepository`] itself is used through generics and keeps native
//! `async fn` methods.

use crate::types::{DueDateFilter, ProgressStatus, RecurrenceType, TodoId, TodoItem, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Boxed future returned by the dyn-compatible writer methods.
pub type RepoFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Boxed transaction callback for [`TodoRepository::in_transaction`].
///
/// The callback receives the transaction-scoped write handle and returns a
/// future borrowing that handle.
pub type TxWork<'a, T> = Box<
    dyn for<'tx> FnOnce(&'tx dyn TodoWriter) -> RepoFuture<'tx, Result<T, TodoRepoError>>
        + Send
        + 'a,
>;

/// Failures reported by repository implementations.
///
/// The duplicate variants are the only failure modes the use cases handle
/// specially; everything else is [`TodoRepoError::Unexpected`] and never
/// reaches the caller in raw form.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TodoRepoError {
    /// A write collided with the per-owner `active_name` uniqueness
    /// constraint: another non-completed todo of this owner has the same
    /// name.
    #[error("duplicate active name")]
    DuplicateActiveName,

    /// A successor insert collided with the `previous_todo_id` uniqueness
    /// constraint: the completed todo already has a successor.
    #[error("duplicate successor for previous todo")]
    DuplicateSuccessor,

    /// Any other storage failure.
    #[error("unexpected repository error: {0}")]
    Unexpected(String),
}

/// Listing query for [`TodoRepository::list_by_owner`].
///
/// `now` anchors the due-date buckets: "today" is the UTC calendar date of
/// the supplied instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoQuery {
    /// Owner whose todos are listed.
    pub owner_id: UserId,
    /// Current instant, for due-date bucket boundaries.
    pub now: DateTime<Utc>,
    /// Optional progress-status filter.
    pub progress_status: Option<ProgressStatus>,
    /// Optional due-date bucket filter.
    pub due_date_filter: Option<DueDateFilter>,
}

/// Input for [`TodoWriter::create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodoRecord {
    /// Owning user.
    pub owner_id: UserId,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub detail: String,
    /// Date-only deadline, if any.
    pub due_date: Option<NaiveDate>,
    /// Initial lifecycle state.
    pub progress_status: ProgressStatus,
    /// Recurrence policy.
    pub recurrence_type: RecurrenceType,
    /// Parent todo, for subtasks.
    pub parent_id: Option<TodoId>,
    /// Uniqueness-constraint column: the name while not completed, `None`
    /// once completed.
    pub active_name: Option<String>,
    /// Set on successors only: the completed todo this one was spawned from.
    pub previous_todo_id: Option<TodoId>,
}

/// Partial patch for [`TodoWriter::update`].
///
/// `None` means "leave unchanged"; for the nullable columns the inner
/// `Option` distinguishes "set" from "clear".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoRecordPatch {
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
    /// New active-name value (`Some(None)` clears it on completion), if
    /// changing.
    pub active_name: Option<Option<String>>,
}

impl TodoRecordPatch {
    /// Returns `true` if the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.detail.is_none()
            && self.due_date.is_none()
            && self.progress_status.is_none()
            && self.recurrence_type.is_none()
            && self.active_name.is_none()
    }
}

/// Dyn-compatible write subset of the repository.
///
/// Implemented both by full repositories and by their transaction-scoped
/// handles, so the same orchestration code works inside and outside
/// [`TodoRepository::in_transaction`].
pub trait TodoWriter: Send + Sync {
    /// Persist a new todo and return it with its storage-assigned fields.
    ///
    /// # Errors
    ///
    /// - [`TodoRepoError::DuplicateActiveName`] on an active-name collision
    /// - [`TodoRepoError::DuplicateSuccessor`] when `previous_todo_id` is
    ///   already taken
    /// - [`TodoRepoError::Unexpected`] for any other storage failure
    fn create(&self, input: NewTodoRecord) -> RepoFuture<'_, Result<TodoItem, TodoRepoError>>;

    /// Apply a partial patch to the todo identified by `id` and `owner_id`
    /// and return the updated row.
    ///
    /// # Errors
    ///
    /// - [`TodoRepoError::DuplicateActiveName`] on an active-name collision
    /// - [`TodoRepoError::Unexpected`] for any other storage failure,
    ///   including a target row that has vanished
    fn update(
        &self,
        id: TodoId,
        owner_id: UserId,
        patch: TodoRecordPatch,
    ) -> RepoFuture<'_, Result<TodoItem, TodoRepoError>>;
}

/// Abstract todo storage contract.
///
/// Every operation taking a todo id also takes the caller's owner id and
/// treats a cross-owner match as absent.
pub trait TodoRepository: TodoWriter {
    /// List the owner's todos matching the query, newest first.
    fn list_by_owner(
        &self,
        query: TodoQuery,
    ) -> impl Future<Output = Result<Vec<TodoItem>, TodoRepoError>> + Send;

    /// Point lookup by id, scoped to the owner.
    fn find_by_id_for_owner(
        &self,
        id: TodoId,
        owner_id: UserId,
    ) -> impl Future<Output = Result<Option<TodoItem>, TodoRepoError>> + Send;

    /// Hard-delete the todo if it exists for this owner; absent rows are a
    /// no-op.
    fn delete_by_id(
        &self,
        id: TodoId,
        owner_id: UserId,
    ) -> impl Future<Output = Result<(), TodoRepoError>> + Send;

    /// Count the subtasks of `parent_id`.
    fn count_by_parent_id(
        &self,
        parent_id: TodoId,
        owner_id: UserId,
    ) -> impl Future<Output = Result<u64, TodoRepoError>> + Send;

    /// Count the completed subtasks of `parent_id`.
    fn count_completed_by_parent_id(
        &self,
        parent_id: TodoId,
        owner_id: UserId,
    ) -> impl Future<Output = Result<u64, TodoRepoError>> + Send;

    /// Find any non-completed subtask of `parent_id`, if one exists.
    fn find_incomplete_subtask(
        &self,
        parent_id: TodoId,
        owner_id: UserId,
    ) -> impl Future<Output = Result<Option<TodoItem>, TodoRepoError>> + Send;

    /// Find a non-completed todo of this owner carrying `name`, optionally
    /// excluding one id (the todo being renamed).
    fn find_duplicate_active_name(
        &self,
        owner_id: UserId,
        name: &str,
        exclude_id: Option<TodoId>,
    ) -> impl Future<Output = Result<Option<TodoItem>, TodoRepoError>> + Send;

    /// Run `work` inside a single storage transaction.
    ///
    /// The callback receives a write handle scoped to the transaction; the
    /// transaction commits when the callback returns `Ok` and rolls back
    /// when it returns `Err`. Implementations without real transactional
    /// semantics (in-memory doubles) may invoke the callback on themselves.
    ///
    /// # Errors
    ///
    /// Returns the callback's error, or [`TodoRepoError::Unexpected`] if
    /// beginning or committing the transaction fails.
    fn in_transaction<T>(
        &self,
        work: TxWork<'_, T>,
    ) -> impl Future<Output = Result<T, TodoRepoError>> + Send
    where
        T: Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_patch_is_detected() {
        assert!(TodoRecordPatch::default().is_empty());
        let patch = TodoRecordPatch {
            name: Some("renamed".to_string()),
            ..TodoRecordPatch::default()
        };
        assert!(!patch.is_empty());
    }
}
