use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::DomainResult;
use crate::models::{Category, Comment, NewCategory, NewComment, NewTask, Task};
use crate::repository::filter::TaskFilter;

/// Persistence operations the orchestrator depends on.
///
/// All operations are owner-scoped. Implementations translate "zero rows
/// matched" on updates and deletes into the matching not-found catalog error
/// rather than reporting success.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Insert a task and return the stored row.
    ///
    /// The returned task carries no category name snapshot; callers that
    /// already resolved the category attach it themselves.
    async fn create_task(&self, new_task: NewTask) -> DomainResult<Task>;

    /// Write every mutable column of the task, keyed by owner and id.
    ///
    /// Returns the task with the refreshed `updated_at`. Zero matched rows
    /// surface as task-not-found.
    async fn update_task(&self, task: &Task) -> DomainResult<Task>;

    /// Tombstone a task at the given instant.
    ///
    /// Already-tombstoned and never-existing rows are indistinguishable to
    /// callers: both surface as task-not-found.
    async fn soft_delete_task(
        &self,
        user_id: i64,
        task_id: i64,
        when: DateTime<Utc>,
    ) -> DomainResult<()>;

    /// Fetch a live task with its category name snapshot.
    async fn get_task(&self, user_id: i64, task_id: i64) -> DomainResult<Task>;

    /// List live tasks matching the filter, ordered by due date ascending
    /// with undated tasks last, ties broken by creation time ascending.
    async fn list_tasks(&self, user_id: i64, filter: &TaskFilter) -> DomainResult<Vec<Task>>;

    async fn create_category(&self, new_category: NewCategory) -> DomainResult<Category>;

    /// List the user's categories ordered by name.
    async fn list_categories(&self, user_id: i64) -> DomainResult<Vec<Category>>;

    async fn get_category(&self, user_id: i64, category_id: i64) -> DomainResult<Category>;

    /// Delete a category. Zero matched rows surface as category-not-found.
    async fn delete_category(&self, user_id: i64, category_id: i64) -> DomainResult<()>;

    async fn create_comment(&self, new_comment: NewComment) -> DomainResult<Comment>;

    /// List a task's comments oldest first.
    async fn list_comments(&self, user_id: i64, task_id: i64) -> DomainResult<Vec<Comment>>;
}
