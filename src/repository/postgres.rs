//! # PostgreSQL Repository
//!
//! Runtime-checked sqlx queries over the `tasks`, `categories`, and
//! `task_comments` tables. Row-level helpers are generic over the executor so
//! the same statements run on the pool or inside a [`PgUnitOfWork`]
//! transaction without duplication.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use sqlx::{PgExecutor, PgPool, Postgres, Transaction};
use tracing::warn;

use crate::error::{DomainError, DomainResult};
use crate::models::{Category, Comment, NewCategory, NewComment, NewTask, Task};
use crate::repository::filter::TaskFilter;
use crate::repository::query::TaskQuery;
use crate::repository::store::TaskStore;

const INSERT_TASK: &str = "
INSERT INTO tasks (user_id, title, description, status, priority, due_date, category_id)
VALUES ($1, $2, $3, $4, $5, $6, $7)
RETURNING id, created_at, updated_at
";

const UPDATE_TASK: &str = "
UPDATE tasks
SET title = $1,
    description = $2,
    status = $3,
    priority = $4,
    due_date = $5,
    category_id = $6,
    updated_at = NOW()
WHERE id = $7
  AND user_id = $8
  AND deleted_at IS NULL
RETURNING updated_at
";

const TOMBSTONE_TASK: &str = "
UPDATE tasks
SET deleted_at = $1,
    updated_at = NOW()
WHERE id = $2
  AND user_id = $3
  AND deleted_at IS NULL
";

const INSERT_CATEGORY: &str = "
INSERT INTO categories (user_id, name)
VALUES ($1, $2)
RETURNING id, created_at, updated_at
";

const LIST_CATEGORIES: &str = "
SELECT id, user_id, name, created_at, updated_at
FROM categories
WHERE user_id = $1
ORDER BY name ASC
";

const GET_CATEGORY: &str = "
SELECT id, user_id, name, created_at, updated_at
FROM categories
WHERE id = $1
  AND user_id = $2
";

const DELETE_CATEGORY: &str = "
DELETE FROM categories
WHERE id = $1
  AND user_id = $2
";

const INSERT_COMMENT: &str = "
INSERT INTO task_comments (task_id, user_id, content)
VALUES ($1, $2, $3)
RETURNING id, created_at
";

const LIST_COMMENTS: &str = "
SELECT id, task_id, user_id, content, created_at
FROM task_comments
WHERE task_id = $1
  AND user_id = $2
ORDER BY created_at ASC
";

/// Collapse a driver error into the catalog, keeping it as cause
fn storage_error(err: sqlx::Error) -> DomainError {
    DomainError::internal().with_cause(err)
}

/// Owner-scoped task persistence over a PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct PgTaskRepository {
    pool: PgPool,
}

impl PgTaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run `f` inside a transaction, handing it an explicit unit-of-work
    /// handle. Commits when `f` succeeds, rolls back and propagates the error
    /// when it fails. The handle never outlives this call.
    pub async fn with_transaction<T, F>(&self, f: F) -> DomainResult<T>
    where
        T: Send,
        F: for<'t> FnOnce(&'t mut PgUnitOfWork) -> BoxFuture<'t, DomainResult<T>> + Send,
    {
        let tx = self.pool.begin().await.map_err(storage_error)?;
        let mut uow = PgUnitOfWork { tx };

        match f(&mut uow).await {
            Ok(value) => {
                uow.commit().await?;
                Ok(value)
            }
            Err(err) => {
                uow.rollback().await;
                Err(err)
            }
        }
    }
}

#[async_trait]
impl TaskStore for PgTaskRepository {
    async fn create_task(&self, new_task: NewTask) -> DomainResult<Task> {
        insert_task(&self.pool, new_task).await
    }

    async fn update_task(&self, task: &Task) -> DomainResult<Task> {
        persist_task(&self.pool, task).await
    }

    async fn soft_delete_task(
        &self,
        user_id: i64,
        task_id: i64,
        when: DateTime<Utc>,
    ) -> DomainResult<()> {
        tombstone_task(&self.pool, user_id, task_id, when).await
    }

    async fn get_task(&self, user_id: i64, task_id: i64) -> DomainResult<Task> {
        fetch_task(&self.pool, user_id, task_id).await
    }

    async fn list_tasks(&self, user_id: i64, filter: &TaskFilter) -> DomainResult<Vec<Task>> {
        TaskQuery::from_filter(user_id, filter)
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error)
    }

    async fn create_category(&self, new_category: NewCategory) -> DomainResult<Category> {
        insert_category(&self.pool, new_category).await
    }

    async fn list_categories(&self, user_id: i64) -> DomainResult<Vec<Category>> {
        sqlx::query_as::<_, Category>(LIST_CATEGORIES)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error)
    }

    async fn get_category(&self, user_id: i64, category_id: i64) -> DomainResult<Category> {
        fetch_category(&self.pool, user_id, category_id).await
    }

    async fn delete_category(&self, user_id: i64, category_id: i64) -> DomainResult<()> {
        remove_category(&self.pool, user_id, category_id).await
    }

    async fn create_comment(&self, new_comment: NewComment) -> DomainResult<Comment> {
        insert_comment(&self.pool, new_comment).await
    }

    async fn list_comments(&self, user_id: i64, task_id: i64) -> DomainResult<Vec<Comment>> {
        sqlx::query_as::<_, Comment>(LIST_COMMENTS)
            .bind(task_id)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error)
    }
}

/// Explicit transaction handle for composing multi-step writes.
///
/// Obtained only through [`PgTaskRepository::with_transaction`]; every
/// operation on it runs on the open transaction. Dropping the handle without
/// commit rolls the transaction back with the connection.
pub struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

impl PgUnitOfWork {
    pub async fn create_task(&mut self, new_task: NewTask) -> DomainResult<Task> {
        insert_task(&mut *self.tx, new_task).await
    }

    pub async fn update_task(&mut self, task: &Task) -> DomainResult<Task> {
        persist_task(&mut *self.tx, task).await
    }

    pub async fn soft_delete_task(
        &mut self,
        user_id: i64,
        task_id: i64,
        when: DateTime<Utc>,
    ) -> DomainResult<()> {
        tombstone_task(&mut *self.tx, user_id, task_id, when).await
    }

    pub async fn get_task(&mut self, user_id: i64, task_id: i64) -> DomainResult<Task> {
        fetch_task(&mut *self.tx, user_id, task_id).await
    }

    pub async fn create_category(&mut self, new_category: NewCategory) -> DomainResult<Category> {
        insert_category(&mut *self.tx, new_category).await
    }

    pub async fn get_category(&mut self, user_id: i64, category_id: i64) -> DomainResult<Category> {
        fetch_category(&mut *self.tx, user_id, category_id).await
    }

    pub async fn delete_category(&mut self, user_id: i64, category_id: i64) -> DomainResult<()> {
        remove_category(&mut *self.tx, user_id, category_id).await
    }

    pub async fn create_comment(&mut self, new_comment: NewComment) -> DomainResult<Comment> {
        insert_comment(&mut *self.tx, new_comment).await
    }

    async fn commit(self) -> DomainResult<()> {
        self.tx.commit().await.map_err(storage_error)
    }

    async fn rollback(self) {
        if let Err(err) = self.tx.rollback().await {
            warn!(error = %err, "transaction rollback failed");
        }
    }
}

async fn insert_task<'e, E>(executor: E, new_task: NewTask) -> DomainResult<Task>
where
    E: PgExecutor<'e>,
{
    let (id, created_at, updated_at) =
        sqlx::query_as::<_, (i64, DateTime<Utc>, DateTime<Utc>)>(INSERT_TASK)
            .bind(new_task.user_id)
            .bind(&new_task.title)
            .bind(&new_task.description)
            .bind(new_task.status)
            .bind(new_task.priority)
            .bind(new_task.due_date)
            .bind(new_task.category_id)
            .fetch_one(executor)
            .await
            .map_err(storage_error)?;

    Ok(Task {
        id,
        user_id: new_task.user_id,
        title: new_task.title,
        description: new_task.description,
        status: new_task.status,
        priority: new_task.priority,
        due_date: new_task.due_date,
        category_id: new_task.category_id,
        category_name: None,
        created_at,
        updated_at,
    })
}

async fn persist_task<'e, E>(executor: E, task: &Task) -> DomainResult<Task>
where
    E: PgExecutor<'e>,
{
    let row = sqlx::query_as::<_, (DateTime<Utc>,)>(UPDATE_TASK)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status)
        .bind(task.priority)
        .bind(task.due_date)
        .bind(task.category_id)
        .bind(task.id)
        .bind(task.user_id)
        .fetch_optional(executor)
        .await
        .map_err(storage_error)?
        .ok_or_else(DomainError::task_not_found)?;

    Ok(Task {
        updated_at: row.0,
        ..task.clone()
    })
}

async fn tombstone_task<'e, E>(
    executor: E,
    user_id: i64,
    task_id: i64,
    when: DateTime<Utc>,
) -> DomainResult<()>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query(TOMBSTONE_TASK)
        .bind(when)
        .bind(task_id)
        .bind(user_id)
        .execute(executor)
        .await
        .map_err(storage_error)?;

    if result.rows_affected() == 0 {
        return Err(DomainError::task_not_found());
    }

    Ok(())
}

async fn fetch_task<'e, E>(executor: E, user_id: i64, task_id: i64) -> DomainResult<Task>
where
    E: PgExecutor<'e>,
{
    TaskQuery::new()
        .owned_by(user_id)
        .live()
        .with_id(task_id)
        .fetch_optional(executor)
        .await
        .map_err(storage_error)?
        .ok_or_else(DomainError::task_not_found)
}

async fn insert_category<'e, E>(executor: E, new_category: NewCategory) -> DomainResult<Category>
where
    E: PgExecutor<'e>,
{
    let (id, created_at, updated_at) =
        sqlx::query_as::<_, (i64, DateTime<Utc>, DateTime<Utc>)>(INSERT_CATEGORY)
            .bind(new_category.user_id)
            .bind(&new_category.name)
            .fetch_one(executor)
            .await
            .map_err(storage_error)?;

    Ok(Category {
        id,
        user_id: new_category.user_id,
        name: new_category.name,
        created_at,
        updated_at,
    })
}

async fn fetch_category<'e, E>(executor: E, user_id: i64, category_id: i64) -> DomainResult<Category>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Category>(GET_CATEGORY)
        .bind(category_id)
        .bind(user_id)
        .fetch_optional(executor)
        .await
        .map_err(storage_error)?
        .ok_or_else(DomainError::category_not_found)
}

async fn remove_category<'e, E>(executor: E, user_id: i64, category_id: i64) -> DomainResult<()>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query(DELETE_CATEGORY)
        .bind(category_id)
        .bind(user_id)
        .execute(executor)
        .await
        .map_err(storage_error)?;

    if result.rows_affected() == 0 {
        return Err(DomainError::category_not_found());
    }

    Ok(())
}

async fn insert_comment<'e, E>(executor: E, new_comment: NewComment) -> DomainResult<Comment>
where
    E: PgExecutor<'e>,
{
    let (id, created_at) = sqlx::query_as::<_, (i64, DateTime<Utc>)>(INSERT_COMMENT)
        .bind(new_comment.task_id)
        .bind(new_comment.user_id)
        .bind(&new_comment.content)
        .fetch_one(executor)
        .await
        .map_err(storage_error)?;

    Ok(Comment {
        id,
        task_id: new_comment.task_id,
        user_id: new_comment.user_id,
        content: new_comment.content,
        created_at,
    })
}
