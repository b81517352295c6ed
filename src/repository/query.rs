//! # Task Query Builder
//!
//! Composable scopes over the task listing select. Scopes chain and append
//! AND predicates; terminal methods execute against any Postgres executor so
//! the same query runs on the pool or inside a transaction.

use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, Postgres, QueryBuilder};

use crate::models::{Task, TaskPriority, TaskStatus};
use crate::repository::filter::TaskFilter;

/// Shared select list: task columns plus the category name snapshot.
pub(crate) const BASE_TASK_SELECT: &str =
    "SELECT t.id, t.user_id, t.title, t.description, t.status, t.priority, \
     t.due_date, t.category_id, c.name AS category_name, t.created_at, t.updated_at \
     FROM tasks t LEFT JOIN categories c ON c.id = t.category_id";

/// Query builder for task scopes
pub struct TaskQuery {
    query: QueryBuilder<'static, Postgres>,
    has_conditions: bool,
}

impl TaskQuery {
    /// Start building a task query
    pub fn new() -> Self {
        Self {
            query: QueryBuilder::new(BASE_TASK_SELECT),
            has_conditions: false,
        }
    }

    /// Add WHERE clause helper
    fn add_condition(&mut self, condition: &str) {
        if self.has_conditions {
            self.query.push(" AND ");
        } else {
            self.query.push(" WHERE ");
            self.has_conditions = true;
        }
        self.query.push(condition);
    }

    /// Scope: rows owned by the given user
    pub fn owned_by(mut self, user_id: i64) -> Self {
        self.add_condition("t.user_id = ");
        self.query.push_bind(user_id);
        self
    }

    /// Scope: rows without a tombstone
    pub fn live(mut self) -> Self {
        self.add_condition("t.deleted_at IS NULL");
        self
    }

    /// Scope: a single task by id
    pub fn with_id(mut self, task_id: i64) -> Self {
        self.add_condition("t.id = ");
        self.query.push_bind(task_id);
        self
    }

    /// Scope: status membership
    pub fn with_status_in(mut self, statuses: &[TaskStatus]) -> Self {
        if statuses.is_empty() {
            return self;
        }
        let values: Vec<String> = statuses.iter().map(|status| status.to_string()).collect();
        self.add_condition("t.status = ANY(");
        self.query.push_bind(values);
        self.query.push(")");
        self
    }

    /// Scope: priority membership
    pub fn with_priority_in(mut self, priorities: &[TaskPriority]) -> Self {
        if priorities.is_empty() {
            return self;
        }
        let values: Vec<String> = priorities
            .iter()
            .map(|priority| priority.to_string())
            .collect();
        self.add_condition("t.priority = ANY(");
        self.query.push_bind(values);
        self.query.push(")");
        self
    }

    /// Scope: category equality
    pub fn in_category(mut self, category_id: i64) -> Self {
        self.add_condition("t.category_id = ");
        self.query.push_bind(category_id);
        self
    }

    /// Scope: case-insensitive substring match over title or description
    pub fn search(mut self, term: &str) -> Self {
        let pattern = format!("%{}%", term.trim().to_lowercase());
        self.add_condition("(LOWER(t.title) LIKE ");
        self.query.push_bind(pattern.clone());
        self.query.push(" OR LOWER(t.description) LIKE ");
        self.query.push_bind(pattern);
        self.query.push(")");
        self
    }

    /// Scope: due on or after the given instant (inclusive)
    pub fn due_on_or_after(mut self, when: DateTime<Utc>) -> Self {
        self.add_condition("t.due_date >= ");
        self.query.push_bind(when);
        self
    }

    /// Scope: due on or before the given instant (inclusive)
    pub fn due_on_or_before(mut self, when: DateTime<Utc>) -> Self {
        self.add_condition("t.due_date <= ");
        self.query.push_bind(when);
        self
    }

    /// Contract ordering for listings: due date ascending with undated tasks
    /// last, ties broken by creation time ascending
    pub fn order_by_due_date(mut self) -> Self {
        self.query
            .push(" ORDER BY t.due_date ASC NULLS LAST, t.created_at ASC");
        self
    }

    /// Add bound LIMIT and OFFSET
    pub fn paginate(mut self, limit: i64, offset: i64) -> Self {
        self.query.push(" LIMIT ");
        self.query.push_bind(limit);
        self.query.push(" OFFSET ");
        self.query.push_bind(offset);
        self
    }

    /// Compose the full listing query for a user and filter
    pub fn from_filter(user_id: i64, filter: &TaskFilter) -> Self {
        let mut query = Self::new().owned_by(user_id).live();

        query = query.with_status_in(&filter.statuses);
        query = query.with_priority_in(&filter.priorities);

        if let Some(category_id) = filter.category_id {
            query = query.in_category(category_id);
        }
        if filter.has_search() {
            if let Some(term) = filter.search.as_deref() {
                query = query.search(term);
            }
        }
        if let Some(due_from) = filter.due_from {
            query = query.due_on_or_after(due_from);
        }
        if let Some(due_to) = filter.due_to {
            query = query.due_on_or_before(due_to);
        }

        query
            .order_by_due_date()
            .paginate(filter.bind_limit(), filter.bind_offset())
    }

    /// The SQL accumulated so far, with positional placeholders
    pub fn sql(&self) -> &str {
        self.query.sql()
    }

    /// Execute and collect every matching row
    pub async fn fetch_all<'e, E>(mut self, executor: E) -> Result<Vec<Task>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        self.query.build_query_as::<Task>().fetch_all(executor).await
    }

    /// Execute and return the first matching row, if any
    pub async fn fetch_optional<'e, E>(mut self, executor: E) -> Result<Option<Task>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        self.query
            .build_query_as::<Task>()
            .fetch_optional(executor)
            .await
    }
}

impl Default for TaskQuery {
    fn default() -> Self {
        Self::new()
    }
}
