//! # Taskdeck Testing
//!
//! Deterministic test doubles for the todo engine:
//!
//! - [`mocks::InMemoryTodoRepo`]: a full in-memory implementation of the
//!   repository port, including both uniqueness constraints, so use-case
//!   tests exercise the same failure modes as real storage.
//! - [`mocks::FixedClock`]: a clock that always returns the same instant.
//!
//! ## Example
//!
//! ```ignore
//! use taskdeck_core::TodoEnvironment;
//! use taskdeck_testing::mocks::{FixedClock, InMemoryTodoRepo};
//!
//! let env = TodoEnvironment::new(
//!     InMemoryTodoRepo::new(),
//!     FixedClock::new("2025-01-10T12:00:00Z".parse()?),
//! );
//! ```

/// Mock implementations of the core ports.
pub mod mocks {
    use chrono::{DateTime, Utc};
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex, MutexGuard};
    use taskdeck_core::ports::{
        Clock, NewTodoRecord, RepoFuture, TodoQuery, TodoRecordPatch, TodoRepoError,
        TodoRepository, TodoWriter, TxWork,
    };
    use taskdeck_core::types::{
        DueDateFilter, ProgressStatus, TodoId, TodoItem, UserId,
    };

    /// Fixed clock for deterministic tests.
    ///
    /// Always returns the same instant, making recurrence and due-date
    /// bucket tests reproducible.
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time.
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    #[derive(Debug, Clone)]
    struct StoredTodo {
        item: TodoItem,
        active_name: Option<String>,
    }

    #[derive(Debug, Default)]
    struct RepoState {
        next_id: i64,
        todos: BTreeMap<TodoId, StoredTodo>,
    }

    /// In-memory todo repository.
    ///
    /// Behaves like the real adapter for everything the use cases can
    /// observe: owner scoping, list filters and ordering, and the
    /// `active_name` / `previous_todo_id` uniqueness constraints.
    /// `in_transaction` simply runs the callback against the repository
    /// itself; there is no rollback.
    #[derive(Debug, Clone, Default)]
    pub struct InMemoryTodoRepo {
        state: Arc<Mutex<RepoState>>,
    }

    impl InMemoryTodoRepo {
        /// Create an empty in-memory repository.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        fn lock(&self) -> Result<MutexGuard<'_, RepoState>, TodoRepoError> {
            self.state
                .lock()
                .map_err(|_| TodoRepoError::Unexpected("poisoned repository lock".to_string()))
        }

        fn insert(&self, input: NewTodoRecord) -> Result<TodoItem, TodoRepoError> {
            let mut state = self.lock()?;

            if let Some(previous_todo_id) = input.previous_todo_id {
                if state
                    .todos
                    .values()
                    .any(|stored| stored.item.previous_todo_id == Some(previous_todo_id))
                {
                    return Err(TodoRepoError::DuplicateSuccessor);
                }
            }

            if let Some(active_name) = &input.active_name {
                if state.todos.values().any(|stored| {
                    stored.item.owner_id == input.owner_id
                        && stored.active_name.as_ref() == Some(active_name)
                }) {
                    return Err(TodoRepoError::DuplicateActiveName);
                }
            }

            state.next_id += 1;
            let id = TodoId(state.next_id);
            let item = TodoItem {
                id,
                owner_id: input.owner_id,
                name: input.name,
                detail: input.detail,
                due_date: input.due_date,
                created_at: Utc::now(),
                progress_status: input.progress_status,
                recurrence_type: input.recurrence_type,
                parent_id: input.parent_id,
                previous_todo_id: input.previous_todo_id,
            };
            state.todos.insert(
                id,
                StoredTodo {
                    item: item.clone(),
                    active_name: input.active_name,
                },
            );

            Ok(item)
        }

        fn apply_patch(
            &self,
            id: TodoId,
            owner_id: UserId,
            patch: TodoRecordPatch,
        ) -> Result<TodoItem, TodoRepoError> {
            let mut state = self.lock()?;

            if let Some(Some(active_name)) = &patch.active_name {
                if state.todos.values().any(|stored| {
                    stored.item.id != id
                        && stored.item.owner_id == owner_id
                        && stored.active_name.as_ref() == Some(active_name)
                }) {
                    return Err(TodoRepoError::DuplicateActiveName);
                }
            }

            let stored = state
                .todos
                .get_mut(&id)
                .filter(|stored| stored.item.owner_id == owner_id)
                .ok_or_else(|| {
                    TodoRepoError::Unexpected("todo not found for update".to_string())
                })?;

            if let Some(name) = patch.name {
                stored.item.name = name;
            }
            if let Some(detail) = patch.detail {
                stored.item.detail = detail;
            }
            if let Some(due_date) = patch.due_date {
                stored.item.due_date = due_date;
            }
            if let Some(progress_status) = patch.progress_status {
                stored.item.progress_status = progress_status;
            }
            if let Some(recurrence_type) = patch.recurrence_type {
                stored.item.recurrence_type = recurrence_type;
            }
            if let Some(active_name) = patch.active_name {
                stored.active_name = active_name;
            }

            Ok(stored.item.clone())
        }

        /// The stored `active_name` for a todo, for asserting on the
        /// uniqueness-constraint column in tests.
        ///
        /// # Errors
        ///
        /// Returns [`TodoRepoError::Unexpected`] when the lock is poisoned
        /// or the todo does not exist.
        pub fn active_name_of(&self, id: TodoId) -> Result<Option<String>, TodoRepoError> {
            let state = self.lock()?;
            state
                .todos
                .get(&id)
                .map(|stored| stored.active_name.clone())
                .ok_or_else(|| TodoRepoError::Unexpected("todo not found".to_string()))
        }
    }

    fn matches_due_filter(
        item: &TodoItem,
        filter: DueDateFilter,
        today: chrono::NaiveDate,
    ) -> bool {
        match filter {
            DueDateFilter::All => true,
            DueDateFilter::Today => item.due_date == Some(today),
            DueDateFilter::ThisWeek => item.due_date.is_some_and(|due| {
                due >= today && due <= today + chrono::Days::new(6)
            }),
            DueDateFilter::Overdue => item.due_date.is_some_and(|due| due < today),
            DueDateFilter::None => item.due_date.is_none(),
        }
    }

    impl TodoWriter for InMemoryTodoRepo {
        fn create(
            &self,
            input: NewTodoRecord,
        ) -> RepoFuture<'_, Result<TodoItem, TodoRepoError>> {
            Box::pin(async move { self.insert(input) })
        }

        fn update(
            &self,
            id: TodoId,
            owner_id: UserId,
            patch: TodoRecordPatch,
        ) -> RepoFuture<'_, Result<TodoItem, TodoRepoError>> {
            Box::pin(async move { self.apply_patch(id, owner_id, patch) })
        }
    }

    impl TodoRepository for InMemoryTodoRepo {
        async fn list_by_owner(&self, query: TodoQuery) -> Result<Vec<TodoItem>, TodoRepoError> {
            let today = query.now.date_naive();
            let state = self.lock()?;

            let mut items: Vec<TodoItem> = state
                .todos
                .values()
                .map(|stored| &stored.item)
                .filter(|item| item.owner_id == query.owner_id)
                .filter(|item| {
                    query
                        .progress_status
                        .is_none_or(|status| item.progress_status == status)
                })
                .filter(|item| {
                    query
                        .due_date_filter
                        .is_none_or(|filter| matches_due_filter(item, filter, today))
                })
                .cloned()
                .collect();

            // Newest first; id breaks ties for rows created the same instant.
            items.sort_by(|a, b| {
                b.created_at
                    .cmp(&a.created_at)
                    .then_with(|| b.id.cmp(&a.id))
            });

            Ok(items)
        }

        async fn find_by_id_for_owner(
            &self,
            id: TodoId,
            owner_id: UserId,
        ) -> Result<Option<TodoItem>, TodoRepoError> {
            let state = self.lock()?;
            Ok(state
                .todos
                .get(&id)
                .filter(|stored| stored.item.owner_id == owner_id)
                .map(|stored| stored.item.clone()))
        }

        async fn delete_by_id(&self, id: TodoId, owner_id: UserId) -> Result<(), TodoRepoError> {
            let mut state = self.lock()?;
            let owned = state
                .todos
                .get(&id)
                .is_some_and(|stored| stored.item.owner_id == owner_id);
            if owned {
                state.todos.remove(&id);
            }
            Ok(())
        }

        async fn count_by_parent_id(
            &self,
            parent_id: TodoId,
            owner_id: UserId,
        ) -> Result<u64, TodoRepoError> {
            let state = self.lock()?;
            Ok(state
                .todos
                .values()
                .filter(|stored| {
                    stored.item.owner_id == owner_id && stored.item.parent_id == Some(parent_id)
                })
                .count() as u64)
        }

        async fn count_completed_by_parent_id(
            &self,
            parent_id: TodoId,
            owner_id: UserId,
        ) -> Result<u64, TodoRepoError> {
            let state = self.lock()?;
            Ok(state
                .todos
                .values()
                .filter(|stored| {
                    stored.item.owner_id == owner_id
                        && stored.item.parent_id == Some(parent_id)
                        && stored.item.progress_status == ProgressStatus::Completed
                })
                .count() as u64)
        }

        async fn find_incomplete_subtask(
            &self,
            parent_id: TodoId,
            owner_id: UserId,
        ) -> Result<Option<TodoItem>, TodoRepoError> {
            let state = self.lock()?;
            Ok(state
                .todos
                .values()
                .find(|stored| {
                    stored.item.owner_id == owner_id
                        && stored.item.parent_id == Some(parent_id)
                        && stored.item.progress_status != ProgressStatus::Completed
                })
                .map(|stored| stored.item.clone()))
        }

        async fn find_duplicate_active_name(
            &self,
            owner_id: UserId,
            name: &str,
            exclude_id: Option<TodoId>,
        ) -> Result<Option<TodoItem>, TodoRepoError> {
            let state = self.lock()?;
            Ok(state
                .todos
                .values()
                .find(|stored| {
                    stored.item.owner_id == owner_id
                        && stored.item.name == name
                        && stored.item.progress_status != ProgressStatus::Completed
                        && exclude_id != Some(stored.item.id)
                })
                .map(|stored| stored.item.clone()))
        }

        async fn in_transaction<T>(&self, work: TxWork<'_, T>) -> Result<T, TodoRepoError>
        where
            T: Send,
        {
            // No real transactional semantics: the callback runs directly
            // against this repository.
            work(self).await
        }
    }

    #[cfg(test)]
    #[allow(clippy::unwrap_used)]
    mod tests {
        use super::*;
        use taskdeck_core::types::RecurrenceType;

        fn record(owner: i64, name: &str) -> NewTodoRecord {
            NewTodoRecord {
                owner_id: UserId(owner),
                name: name.to_string(),
                detail: String::new(),
                due_date: None,
                progress_status: ProgressStatus::NotStarted,
                recurrence_type: RecurrenceType::None,
                parent_id: None,
                active_name: Some(name.to_string()),
                previous_todo_id: None,
            }
        }

        #[tokio::test]
        async fn create_assigns_sequential_ids() {
            let repo = InMemoryTodoRepo::new();
            let first = repo.create(record(1, "a")).await.unwrap();
            let second = repo.create(record(1, "b")).await.unwrap();
            assert!(second.id > first.id);
        }

        #[tokio::test]
        async fn active_name_constraint_is_scoped_to_owner() {
            let repo = InMemoryTodoRepo::new();
            repo.create(record(1, "report")).await.unwrap();

            let duplicate = repo.create(record(1, "report")).await;
            assert_eq!(duplicate, Err(TodoRepoError::DuplicateActiveName));

            // Another owner can reuse the name.
            assert!(repo.create(record(2, "report")).await.is_ok());
        }

        #[tokio::test]
        async fn previous_todo_constraint_allows_one_successor() {
            let repo = InMemoryTodoRepo::new();
            let completed = repo.create(record(1, "origin")).await.unwrap();

            let successor = NewTodoRecord {
                previous_todo_id: Some(completed.id),
                ..record(1, "origin-next")
            };
            repo.create(successor.clone()).await.unwrap();

            let rival = NewTodoRecord {
                name: "origin-rival".to_string(),
                active_name: Some("origin-rival".to_string()),
                ..successor
            };
            assert_eq!(
                repo.create(rival).await,
                Err(TodoRepoError::DuplicateSuccessor)
            );
        }

        #[tokio::test]
        async fn cross_owner_rows_are_invisible() {
            let repo = InMemoryTodoRepo::new();
            let todo = repo.create(record(1, "mine")).await.unwrap();

            let other = repo.find_by_id_for_owner(todo.id, UserId(2)).await.unwrap();
            assert_eq!(other, None);

            repo.delete_by_id(todo.id, UserId(2)).await.unwrap();
            let still_there = repo.find_by_id_for_owner(todo.id, UserId(1)).await.unwrap();
            assert!(still_there.is_some());
        }
    }
}
