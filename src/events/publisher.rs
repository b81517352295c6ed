//! Task lifecycle event publishing.
//!
//! [`EventPublisher`] is the outbound seam the orchestrator fans lifecycle
//! events into. [`InProcessEventPublisher`] is the in-process implementation,
//! backed by a broadcast channel so any number of consumers can follow along:
//!
//! ```rust
//! use chrono::Utc;
//! use tasklane_core::events::{EventPublisher, InProcessEventPublisher, TaskEvent, TaskEventKind};
//! # use tasklane_core::models::Task;
//!
//! # tokio_test::block_on(async {
//! let publisher = InProcessEventPublisher::default();
//! let mut updates = publisher.subscribe();
//!
//! # let now = Utc::now();
//! # let task = Task {
//! #     id: 7,
//! #     user_id: 1,
//! #     title: "Pack boxes".to_string(),
//! #     description: String::new(),
//! #     status: Default::default(),
//! #     priority: Default::default(),
//! #     due_date: None,
//! #     category_id: None,
//! #     category_name: None,
//! #     created_at: now,
//! #     updated_at: now,
//! # };
//! let event = TaskEvent::for_task(TaskEventKind::Created, &task, 1, "ana@example.com", Utc::now());
//! publisher.publish(event).await.unwrap();
//!
//! let received = updates.recv().await.unwrap();
//! assert_eq!(received.task_id, 7);
//! # });
//! ```

use async_trait::async_trait;
use tokio::sync::broadcast;

use super::task_event::TaskEvent;

/// Error types for event publishing
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("Event channel is closed")]
    ChannelClosed,
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Outbound seam for task lifecycle events.
///
/// Implementations may talk to a broker or stay in-process; callers treat
/// publishing as best-effort and never let a failure roll back a mutation.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: TaskEvent) -> Result<(), PublishError>;
}

/// In-process publisher backed by a broadcast channel
#[derive(Debug, Clone)]
pub struct InProcessEventPublisher {
    sender: broadcast::Sender<TaskEvent>,
}

impl InProcessEventPublisher {
    /// Create a new publisher with the specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to published events
    pub fn subscribe(&self) -> broadcast::Receiver<TaskEvent> {
        self.sender.subscribe()
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for InProcessEventPublisher {
    fn default() -> Self {
        Self::new(1000)
    }
}

#[async_trait]
impl EventPublisher for InProcessEventPublisher {
    async fn publish(&self, event: TaskEvent) -> Result<(), PublishError> {
        // broadcast::send errors only when no subscriber exists; publishing
        // with nobody listening still counts as delivered
        match self.sender.send(event) {
            Ok(_) => Ok(()),
            Err(broadcast::error::SendError(_)) => Ok(()),
        }
    }
}
