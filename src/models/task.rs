//! # Task Model
//!
//! Core task record owned by a single user, carrying lifecycle status,
//! priority, optional scheduling metadata, and an optional category link.
//!
//! ## Overview
//!
//! `Task` is the primary unit the orchestration layer operates on. Status and
//! priority are closed enumerations validated at the orchestration edge, so a
//! stored row can always be decoded without a fallback arm.
//!
//! ## Database Schema
//!
//! Maps to the `tasks` table with the following key columns:
//! - `id`: Primary key (BIGINT)
//! - `user_id`: Owning user (BIGINT)
//! - `status` / `priority`: TEXT columns constrained to the enum values
//! - `due_date`: Optional TIMESTAMPTZ
//! - `category_id`: Optional reference into `categories`
//! - `deleted_at`: Tombstone; live reads always filter `deleted_at IS NULL`
//!
//! The `category_name` field is not a physical column. It is a snapshot joined
//! from `categories` at read time so list responses need no second query.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// Task lifecycle states matching the database constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "text", rename_all = "snake_case")]
pub enum TaskStatus {
    /// Initial state when a task is created
    #[default]
    Pending,
    /// Task is actively being worked
    InProgress,
    /// Task finished successfully
    Completed,
    /// Task was shelved without completion
    Archived,
}

impl TaskStatus {
    /// Every status the system accepts, in lifecycle order
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
        TaskStatus::Archived,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Archived => "archived",
        }
    }

    /// Check if this is a terminal state (no further transitions expected)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Archived)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "archived" => Ok(Self::Archived),
            _ => Err(format!("Invalid task status: {s}")),
        }
    }
}

/// Task priority levels matching the database constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "text", rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    /// Every priority the system accepts, in ascending order
    pub const ALL: [TaskPriority; 3] =
        [TaskPriority::Low, TaskPriority::Medium, TaskPriority::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TaskPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(format!("Invalid task priority: {s}")),
        }
    }
}

/// A stored task row as surfaced to callers.
///
/// Rows with a tombstone (`deleted_at` set) never reach this type; every read
/// path filters them out at the SQL level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<DateTime<Utc>>,
    pub category_id: Option<i64>,
    /// Category name joined from `categories` at read time
    pub category_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New task for creation (without generated fields)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTask {
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<DateTime<Utc>>,
    pub category_id: Option<i64>,
}
