//! Operation inputs for the task orchestrator.
//!
//! Status and priority arrive as the raw strings transports received, not as
//! parsed enums. The orchestrator owns membership validation, so an
//! unsupported value surfaces as a catalog error instead of a
//! deserialization failure at the edge.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Payload for creating a task.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTaskInput {
    pub user_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Raw status; absent or blank defaults to `pending`
    #[serde(default)]
    pub status: Option<String>,
    /// Raw priority; absent or blank defaults to `medium`
    #[serde(default)]
    pub priority: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub category_id: Option<i64>,
}

/// Partial update for a task: only present fields are touched.
///
/// Due date and category each pair an optional set-value with a clear flag.
/// The set-value wins; the clear flag takes effect only when the set-value
/// is absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTaskInput {
    pub user_id: i64,
    pub task_id: i64,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub clear_due_date: bool,
    pub category_id: Option<i64>,
    #[serde(default)]
    pub clear_category: bool,
}

/// Payload for attaching a comment to a task.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddCommentInput {
    pub user_id: i64,
    pub task_id: i64,
    pub content: String,
}

/// Payload for creating a category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateCategoryInput {
    pub user_id: i64,
    pub name: String,
}
