//! Integration tests for the Create use case against the in-memory
//! repository.

#![allow(clippy::unwrap_used)]

use chrono::{NaiveDate, TimeZone, Utc};
use taskdeck_core::environment::TodoEnvironment;
use taskdeck_core::error::TodoUseCaseError;
use taskdeck_core::ports::{NewTodoRecord, TodoWriter};
use taskdeck_core::types::{ProgressStatus, RecurrenceType, TodoId, UserId, ValidationReason};
use taskdeck_core::usecases::{CreateTodo, CreateTodoInput};
use taskdeck_testing::mocks::{FixedClock, InMemoryTodoRepo};

fn test_env() -> TodoEnvironment<InMemoryTodoRepo, FixedClock> {
    TodoEnvironment::new(
        InMemoryTodoRepo::new(),
        FixedClock::new(Utc.with_ymd_and_hms(2025, 1, 10, 12, 0, 0).unwrap()),
    )
}

fn input(owner: i64, name: &str) -> CreateTodoInput {
    CreateTodoInput {
        user_id: UserId(owner),
        name: name.to_string(),
        detail: String::new(),
        due_date: None,
        progress_status: ProgressStatus::NotStarted,
        recurrence_type: RecurrenceType::None,
        parent_id: None,
    }
}

#[tokio::test]
async fn creates_a_minimal_todo() {
    let env = test_env();
    let create = CreateTodo::new(env);

    let item = create.execute(input(1, "report")).await.unwrap();

    assert_eq!(item.name, "report");
    assert_eq!(item.detail, "");
    assert_eq!(item.due_date, None);
    assert_eq!(item.progress_status, ProgressStatus::NotStarted);
    assert_eq!(item.total_subtask_count, 0);
    assert_eq!(item.completed_subtask_count, 0);
    assert_eq!(item.subtask_progress_percent, 0);
}

#[tokio::test]
async fn renders_due_date_date_only() {
    let env = test_env();
    let create = CreateTodo::new(env);

    let item = create
        .execute(CreateTodoInput {
            due_date: NaiveDate::from_ymd_opt(2025, 2, 1),
            ..input(1, "with due")
        })
        .await
        .unwrap();

    assert_eq!(item.due_date.as_deref(), Some("2025-02-01"));
}

#[tokio::test]
async fn trims_the_supplied_name() {
    let env = test_env();
    let create = CreateTodo::new(env);

    let item = create.execute(input(1, "  report  ")).await.unwrap();
    assert_eq!(item.name, "report");
}

#[tokio::test]
async fn recurring_todo_requires_a_due_date() {
    let env = test_env();
    let create = CreateTodo::new(env);

    let error = create
        .execute(CreateTodoInput {
            recurrence_type: RecurrenceType::Daily,
            ..input(1, "standup")
        })
        .await
        .unwrap_err();

    let TodoUseCaseError::Validation { errors } = error else {
        panic!("expected a validation error");
    };
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field, "dueDate");
    assert_eq!(errors[0].reason, ValidationReason::Required);
}

#[tokio::test]
async fn rejects_an_overlong_name() {
    let env = test_env();
    let create = CreateTodo::new(env);

    let error = create.execute(input(1, &"n".repeat(101))).await.unwrap_err();

    let TodoUseCaseError::Validation { errors } = error else {
        panic!("expected a validation error");
    };
    assert_eq!(errors[0].field, "name");
    assert_eq!(errors[0].reason, ValidationReason::MaxLength);
    assert_eq!(errors[0].limit, Some(100));
}

#[tokio::test]
async fn rejects_an_overlong_detail() {
    let env = test_env();
    let create = CreateTodo::new(env);

    let error = create
        .execute(CreateTodoInput {
            detail: "d".repeat(501),
            ..input(1, "bounded")
        })
        .await
        .unwrap_err();

    let TodoUseCaseError::Validation { errors } = error else {
        panic!("expected a validation error");
    };
    assert_eq!(errors[0].field, "detail");
    assert_eq!(errors[0].limit, Some(500));
}

#[tokio::test]
async fn rejects_a_duplicate_active_name() {
    let env = test_env();
    let create = CreateTodo::new(env.clone());

    create.execute(input(1, "report")).await.unwrap();
    let error = create.execute(input(1, "report")).await.unwrap_err();

    let TodoUseCaseError::Validation { errors } = error else {
        panic!("expected a validation error");
    };
    assert_eq!(errors[0].field, "name");
    assert_eq!(errors[0].reason, ValidationReason::UniqueViolation);
}

#[tokio::test]
async fn other_owners_can_reuse_a_name() {
    let env = test_env();
    let create = CreateTodo::new(env);

    create.execute(input(1, "report")).await.unwrap();
    assert!(create.execute(input(2, "report")).await.is_ok());
}

#[tokio::test]
async fn storage_level_name_race_maps_to_unique_violation() {
    let env = test_env();

    // A row whose display name differs from its active name slips past the
    // pre-check and trips the storage constraint instead.
    env.repo
        .create(NewTodoRecord {
            owner_id: UserId(1),
            name: "renamed elsewhere".to_string(),
            detail: String::new(),
            due_date: None,
            progress_status: ProgressStatus::NotStarted,
            recurrence_type: RecurrenceType::None,
            parent_id: None,
            active_name: Some("report".to_string()),
            previous_todo_id: None,
        })
        .await
        .unwrap();

    let create = CreateTodo::new(env);
    let error = create.execute(input(1, "report")).await.unwrap_err();

    let TodoUseCaseError::Validation { errors } = error else {
        panic!("expected a validation error, not an internal one");
    };
    assert_eq!(errors[0].reason, ValidationReason::UniqueViolation);
}

#[tokio::test]
async fn missing_parent_is_a_conflict() {
    let env = test_env();
    let create = CreateTodo::new(env);

    let error = create
        .execute(CreateTodoInput {
            parent_id: Some(TodoId(999)),
            ..input(1, "orphan")
        })
        .await
        .unwrap_err();

    assert!(matches!(error, TodoUseCaseError::Conflict { .. }));
}

#[tokio::test]
async fn parent_owned_by_someone_else_is_a_conflict() {
    let env = test_env();
    let create = CreateTodo::new(env);

    let parent = create.execute(input(1, "theirs")).await.unwrap();

    let error = create
        .execute(CreateTodoInput {
            parent_id: Some(parent.id),
            ..input(2, "intruder")
        })
        .await
        .unwrap_err();

    assert!(matches!(error, TodoUseCaseError::Conflict { .. }));
}

#[tokio::test]
async fn subtasks_cannot_nest() {
    let env = test_env();
    let create = CreateTodo::new(env);

    let parent = create.execute(input(1, "parent")).await.unwrap();
    let subtask = create
        .execute(CreateTodoInput {
            parent_id: Some(parent.id),
            ..input(1, "child")
        })
        .await
        .unwrap();

    let error = create
        .execute(CreateTodoInput {
            parent_id: Some(subtask.id),
            ..input(1, "grandchild")
        })
        .await
        .unwrap_err();

    assert!(matches!(error, TodoUseCaseError::Conflict { .. }));
}

#[tokio::test]
async fn subtasks_cannot_recur() {
    let env = test_env();
    let create = CreateTodo::new(env);

    let parent = create.execute(input(1, "parent")).await.unwrap();

    let error = create
        .execute(CreateTodoInput {
            parent_id: Some(parent.id),
            recurrence_type: RecurrenceType::Daily,
            due_date: NaiveDate::from_ymd_opt(2025, 1, 11),
            ..input(1, "child")
        })
        .await
        .unwrap_err();

    assert!(matches!(error, TodoUseCaseError::Conflict { .. }));
}

#[tokio::test]
async fn completed_on_create_has_no_active_name() {
    let env = test_env();
    let create = CreateTodo::new(env.clone());

    let item = create
        .execute(CreateTodoInput {
            progress_status: ProgressStatus::Completed,
            ..input(1, "done already")
        })
        .await
        .unwrap();

    assert_eq!(env.repo.active_name_of(item.id).unwrap(), None);
}
