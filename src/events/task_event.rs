//! # Task Lifecycle Events
//!
//! Wire format for the events emitted after a successful task mutation.
//! Field names are camelCase on the wire so downstream consumers written
//! against the JSON contract keep working unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::models::{Task, TaskPriority, TaskStatus};

/// Lifecycle event kinds carried in the `type` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskEventKind {
    #[serde(rename = "task.created")]
    Created,
    #[serde(rename = "task.completed")]
    Completed,
    #[serde(rename = "task.deleted")]
    Deleted,
}

impl TaskEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskEventKind::Created => crate::constants::events::TASK_CREATED,
            TaskEventKind::Completed => crate::constants::events::TASK_COMPLETED,
            TaskEventKind::Deleted => crate::constants::events::TASK_DELETED,
        }
    }
}

impl fmt::Display for TaskEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Snapshot of a task at the moment a lifecycle event fired.
///
/// The snapshot is self-contained: consumers never need to read the task row
/// back, which matters because delete events describe a row that is already
/// tombstoned by the time they are handled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskEvent {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: TaskEventKind,
    pub task_id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    pub user_email: String,
    pub created_at: DateTime<Utc>,
}

impl TaskEvent {
    /// Build an event snapshot for a task owned by the given user, stamped
    /// with the caller's clock
    pub fn for_task(
        kind: TaskEventKind,
        task: &Task,
        user_id: i64,
        user_email: &str,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            task_id: task.id,
            user_id,
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
            priority: task.priority,
            due_date: task.due_date,
            user_email: user_email.to_string(),
            created_at: at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_task() -> Task {
        Task {
            id: 42,
            user_id: 7,
            title: "Buy milk".to_string(),
            description: "Two liters".to_string(),
            status: TaskStatus::Pending,
            priority: TaskPriority::Medium,
            due_date: None,
            category_id: None,
            category_name: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_kind_strings() {
        assert_eq!(TaskEventKind::Created.as_str(), "task.created");
        assert_eq!(TaskEventKind::Completed.as_str(), "task.completed");
        assert_eq!(TaskEventKind::Deleted.as_str(), "task.deleted");
    }

    #[test]
    fn test_wire_format_field_names() {
        let event =
            TaskEvent::for_task(TaskEventKind::Created, &sample_task(), 7, "a@b.com", Utc::now());
        let value = serde_json::to_value(&event).unwrap();
        let object = value.as_object().unwrap();

        for key in [
            "id",
            "type",
            "taskId",
            "userId",
            "title",
            "description",
            "status",
            "priority",
            "userEmail",
            "createdAt",
        ] {
            assert!(object.contains_key(key), "missing wire field {key}");
        }
        assert_eq!(object["type"], "task.created");
        assert_eq!(object["taskId"], 42);
        assert_eq!(object["status"], "pending");
    }

    #[test]
    fn test_due_date_omitted_when_absent() {
        let event = TaskEvent::for_task(TaskEventKind::Deleted, &sample_task(), 7, "a@b.com", Utc::now());
        let value = serde_json::to_value(&event).unwrap();
        assert!(!value.as_object().unwrap().contains_key("dueDate"));

        let mut task = sample_task();
        task.due_date = Some(Utc::now());
        let event = TaskEvent::for_task(TaskEventKind::Deleted, &task, 7, "a@b.com", Utc::now());
        let value = serde_json::to_value(&event).unwrap();
        assert!(value.as_object().unwrap().contains_key("dueDate"));
    }

    #[test]
    fn test_each_event_gets_a_fresh_id() {
        let task = sample_task();
        let first = TaskEvent::for_task(TaskEventKind::Created, &task, 7, "a@b.com", Utc::now());
        let second = TaskEvent::for_task(TaskEventKind::Created, &task, 7, "a@b.com", Utc::now());
        assert_ne!(first.id, second.id);
    }
}
