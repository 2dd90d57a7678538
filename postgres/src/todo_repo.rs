//! `PostgreSQL` todo repository.

use chrono::{DateTime, Days, NaiveDate, Utc};
use sqlx::postgres::PgPool;
use sqlx::{FromRow, PgExecutor, Postgres, QueryBuilder, Transaction};
use taskdeck_core::ports::{
    NewTodoRecord, RepoFuture, TodoQuery, TodoRecordPatch, TodoRepoError, TodoRepository,
    TodoWriter, TxWork,
};
use taskdeck_core::types::{DueDateFilter, TodoId, TodoItem, UserId};
use taskdeck_core::validation::{progress_status_or_default, recurrence_type_or_default};
use tokio::sync::Mutex;

const TODO_COLUMNS: &str = "id, owner_id, name, detail, due_date, created_at, \
     progress_status, recurrence_type, parent_id, previous_todo_id";

/// Raw `todos` row. Status and recurrence are stored as text and normalized
/// through the coerce-with-default helpers when mapped to the domain type.
#[derive(Debug, FromRow)]
struct TodoRow {
    id: i64,
    owner_id: i64,
    name: String,
    detail: String,
    due_date: Option<NaiveDate>,
    created_at: DateTime<Utc>,
    progress_status: String,
    recurrence_type: String,
    parent_id: Option<i64>,
    previous_todo_id: Option<i64>,
}

impl From<TodoRow> for TodoItem {
    fn from(row: TodoRow) -> Self {
        Self {
            id: TodoId(row.id),
            owner_id: UserId(row.owner_id),
            name: row.name,
            detail: row.detail,
            due_date: row.due_date,
            created_at: row.created_at,
            progress_status: progress_status_or_default(&row.progress_status),
            recurrence_type: recurrence_type_or_default(&row.recurrence_type),
            parent_id: row.parent_id.map(TodoId),
            previous_todo_id: row.previous_todo_id.map(TodoId),
        }
    }
}

/// Map a violated uniqueness constraint to the port error it represents.
fn constraint_error(constraint: &str) -> TodoRepoError {
    match constraint {
        "todos_previous_todo_id_key" => TodoRepoError::DuplicateSuccessor,
        "todos_owner_id_active_name_key" => TodoRepoError::DuplicateActiveName,
        other => TodoRepoError::Unexpected(format!("constraint violation: {other}")),
    }
}

fn map_db_error(error: sqlx::Error) -> TodoRepoError {
    if let sqlx::Error::Database(db_error) = &error {
        if let Some(constraint) = db_error.constraint() {
            return constraint_error(constraint);
        }
    }
    TodoRepoError::Unexpected(error.to_string())
}

async fn insert_todo<'e, E>(executor: E, input: NewTodoRecord) -> Result<TodoItem, TodoRepoError>
where
    E: PgExecutor<'e>,
{
    let row: TodoRow = sqlx::query_as(
        r"
        INSERT INTO todos (
            owner_id, name, detail, due_date, progress_status,
            recurrence_type, parent_id, active_name, previous_todo_id
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING id, owner_id, name, detail, due_date, created_at,
                  progress_status, recurrence_type, parent_id, previous_todo_id
        ",
    )
    .bind(input.owner_id.0)
    .bind(&input.name)
    .bind(&input.detail)
    .bind(input.due_date)
    .bind(input.progress_status.as_str())
    .bind(input.recurrence_type.as_str())
    .bind(input.parent_id.map(|id| id.0))
    .bind(&input.active_name)
    .bind(input.previous_todo_id.map(|id| id.0))
    .fetch_one(executor)
    .await
    .map_err(map_db_error)?;

    Ok(row.into())
}

async fn update_todo<'e, E>(
    executor: E,
    id: TodoId,
    owner_id: UserId,
    patch: TodoRecordPatch,
) -> Result<TodoItem, TodoRepoError>
where
    E: PgExecutor<'e>,
{
    if patch.is_empty() {
        let row: Option<TodoRow> = sqlx::query_as(
            r"
            SELECT id, owner_id, name, detail, due_date, created_at,
                   progress_status, recurrence_type, parent_id, previous_todo_id
            FROM todos
            WHERE id = $1 AND owner_id = $2
            ",
        )
        .bind(id.0)
        .bind(owner_id.0)
        .fetch_optional(executor)
        .await
        .map_err(map_db_error)?;

        return row
            .map(TodoItem::from)
            .ok_or_else(|| TodoRepoError::Unexpected(format!("todo {id} not found for update")));
    }

    let mut builder = QueryBuilder::<Postgres>::new("UPDATE todos SET ");
    {
        let mut assignments = builder.separated(", ");
        if let Some(name) = patch.name {
            assignments.push("name = ").push_bind_unseparated(name);
        }
        if let Some(detail) = patch.detail {
            assignments.push("detail = ").push_bind_unseparated(detail);
        }
        if let Some(due_date) = patch.due_date {
            assignments.push("due_date = ").push_bind_unseparated(due_date);
        }
        if let Some(progress_status) = patch.progress_status {
            assignments
                .push("progress_status = ")
                .push_bind_unseparated(progress_status.as_str());
        }
        if let Some(recurrence_type) = patch.recurrence_type {
            assignments
                .push("recurrence_type = ")
                .push_bind_unseparated(recurrence_type.as_str());
        }
        if let Some(active_name) = patch.active_name {
            assignments
                .push("active_name = ")
                .push_bind_unseparated(active_name);
        }
    }
    builder.push(" WHERE id = ");
    builder.push_bind(id.0);
    builder.push(" AND owner_id = ");
    builder.push_bind(owner_id.0);
    builder.push(" RETURNING ");
    builder.push(TODO_COLUMNS);

    let row: Option<TodoRow> = builder
        .build_query_as()
        .fetch_optional(executor)
        .await
        .map_err(map_db_error)?;

    row.map(TodoItem::from)
        .ok_or_else(|| TodoRepoError::Unexpected(format!("todo {id} not found for update")))
}

/// `PostgreSQL` todo repository.
///
/// # Example
///
/// ```no_run
/// use sqlx::PgPool;
/// use taskdeck_postgres::PgTodoRepo;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = PgPool::connect("postgresql://localhost/taskdeck").await?;
/// let repo = PgTodoRepo::new(pool);
/// repo.migrate().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PgTodoRepo {
    /// `PostgreSQL` connection pool.
    pool: PgPool,
}

impl PgTodoRepo {
    /// Create a new `PostgreSQL` todo repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run database migrations.
    ///
    /// # Errors
    ///
    /// Returns [`TodoRepoError::Unexpected`] if migrations fail.
    pub async fn migrate(&self) -> Result<(), TodoRepoError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| TodoRepoError::Unexpected(format!("migration failed: {e}")))?;
        Ok(())
    }
}

/// Write handle scoped to a running transaction.
///
/// The transaction sits behind an async mutex so the boxed [`TodoWriter`]
/// futures can borrow it one at a time.
struct PgTodoTx {
    tx: Mutex<Transaction<'static, Postgres>>,
}

impl TodoWriter for PgTodoTx {
    fn create(&self, input: NewTodoRecord) -> RepoFuture<'_, Result<TodoItem, TodoRepoError>> {
        Box::pin(async move {
            let mut tx = self.tx.lock().await;
            insert_todo(&mut **tx, input).await
        })
    }

    fn update(
        &self,
        id: TodoId,
        owner_id: UserId,
        patch: TodoRecordPatch,
    ) -> RepoFuture<'_, Result<TodoItem, TodoRepoError>> {
        Box::pin(async move {
            let mut tx = self.tx.lock().await;
            update_todo(&mut **tx, id, owner_id, patch).await
        })
    }
}

impl TodoWriter for PgTodoRepo {
    fn create(&self, input: NewTodoRecord) -> RepoFuture<'_, Result<TodoItem, TodoRepoError>> {
        Box::pin(async move { insert_todo(&self.pool, input).await })
    }

    fn update(
        &self,
        id: TodoId,
        owner_id: UserId,
        patch: TodoRecordPatch,
    ) -> RepoFuture<'_, Result<TodoItem, TodoRepoError>> {
        Box::pin(async move { update_todo(&self.pool, id, owner_id, patch).await })
    }
}

impl TodoRepository for PgTodoRepo {
    async fn list_by_owner(&self, query: TodoQuery) -> Result<Vec<TodoItem>, TodoRepoError> {
        let today = query.now.date_naive();

        let mut builder = QueryBuilder::<Postgres>::new("SELECT ");
        builder.push(TODO_COLUMNS);
        builder.push(" FROM todos WHERE owner_id = ");
        builder.push_bind(query.owner_id.0);

        if let Some(progress_status) = query.progress_status {
            builder.push(" AND progress_status = ");
            builder.push_bind(progress_status.as_str());
        }

        match query.due_date_filter {
            Option::None | Some(DueDateFilter::All) => {}
            Some(DueDateFilter::Today) => {
                builder.push(" AND due_date = ");
                builder.push_bind(today);
            }
            Some(DueDateFilter::ThisWeek) => {
                builder.push(" AND due_date >= ");
                builder.push_bind(today);
                builder.push(" AND due_date <= ");
                builder.push_bind(today + Days::new(6));
            }
            Some(DueDateFilter::Overdue) => {
                builder.push(" AND due_date < ");
                builder.push_bind(today);
            }
            Some(DueDateFilter::None) => {
                builder.push(" AND due_date IS NULL");
            }
        }

        builder.push(" ORDER BY created_at DESC, id DESC");

        let rows: Vec<TodoRow> = builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(rows.into_iter().map(TodoItem::from).collect())
    }

    async fn find_by_id_for_owner(
        &self,
        id: TodoId,
        owner_id: UserId,
    ) -> Result<Option<TodoItem>, TodoRepoError> {
        let row: Option<TodoRow> = sqlx::query_as(
            r"
            SELECT id, owner_id, name, detail, due_date, created_at,
                   progress_status, recurrence_type, parent_id, previous_todo_id
            FROM todos
            WHERE id = $1 AND owner_id = $2
            ",
        )
        .bind(id.0)
        .bind(owner_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.map(TodoItem::from))
    }

    async fn delete_by_id(&self, id: TodoId, owner_id: UserId) -> Result<(), TodoRepoError> {
        sqlx::query("DELETE FROM todos WHERE id = $1 AND owner_id = $2")
            .bind(id.0)
            .bind(owner_id.0)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(())
    }

    async fn count_by_parent_id(
        &self,
        parent_id: TodoId,
        owner_id: UserId,
    ) -> Result<u64, TodoRepoError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM todos WHERE parent_id = $1 AND owner_id = $2")
                .bind(parent_id.0)
                .bind(owner_id.0)
                .fetch_one(&self.pool)
                .await
                .map_err(map_db_error)?;

        Ok(count.unsigned_abs())
    }

    async fn count_completed_by_parent_id(
        &self,
        parent_id: TodoId,
        owner_id: UserId,
    ) -> Result<u64, TodoRepoError> {
        let (count,): (i64,) = sqlx::query_as(
            r"
            SELECT COUNT(*) FROM todos
            WHERE parent_id = $1 AND owner_id = $2 AND progress_status = 'completed'
            ",
        )
        .bind(parent_id.0)
        .bind(owner_id.0)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(count.unsigned_abs())
    }

    async fn find_incomplete_subtask(
        &self,
        parent_id: TodoId,
        owner_id: UserId,
    ) -> Result<Option<TodoItem>, TodoRepoError> {
        let row: Option<TodoRow> = sqlx::query_as(
            r"
            SELECT id, owner_id, name, detail, due_date, created_at,
                   progress_status, recurrence_type, parent_id, previous_todo_id
            FROM todos
            WHERE parent_id = $1 AND owner_id = $2 AND progress_status <> 'completed'
            LIMIT 1
            ",
        )
        .bind(parent_id.0)
        .bind(owner_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.map(TodoItem::from))
    }

    async fn find_duplicate_active_name(
        &self,
        owner_id: UserId,
        name: &str,
        exclude_id: Option<TodoId>,
    ) -> Result<Option<TodoItem>, TodoRepoError> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT ");
        builder.push(TODO_COLUMNS);
        builder.push(" FROM todos WHERE owner_id = ");
        builder.push_bind(owner_id.0);
        builder.push(" AND name = ");
        builder.push_bind(name.to_string());
        builder.push(" AND progress_status <> 'completed'");
        if let Some(exclude_id) = exclude_id {
            builder.push(" AND id <> ");
            builder.push_bind(exclude_id.0);
        }
        builder.push(" LIMIT 1");

        let row: Option<TodoRow> = builder
            .build_query_as()
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(row.map(TodoItem::from))
    }

    async fn in_transaction<T>(&self, work: TxWork<'_, T>) -> Result<T, TodoRepoError>
    where
        T: Send,
    {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| TodoRepoError::Unexpected(format!("failed to begin transaction: {e}")))?;

        let scoped = PgTodoTx { tx: Mutex::new(tx) };
        let result = work(&scoped).await;
        let tx = scoped.tx.into_inner();

        match result {
            Ok(value) => {
                tx.commit().await.map_err(|e| {
                    TodoRepoError::Unexpected(format!("failed to commit transaction: {e}"))
                })?;
                Ok(value)
            }
            Err(error) => {
                if let Err(rollback_error) = tx.rollback().await {
                    tracing::warn!(
                        error = %rollback_error,
                        "transaction rollback failed"
                    );
                }
                Err(error)
            }
        }
    }
}
