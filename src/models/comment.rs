//! # Comment Model
//!
//! Free-text note attached to a task. Maps to the `task_comments` table;
//! comments are immutable once written and listed oldest first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Comment {
    pub id: i64,
    pub task_id: i64,
    pub user_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// New comment for creation (without generated fields)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewComment {
    pub task_id: i64,
    pub user_id: i64,
    pub content: String,
}
