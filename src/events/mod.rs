pub mod publisher;
pub mod task_event;

// Re-export key types for convenience
pub use publisher::{EventPublisher, InProcessEventPublisher, PublishError};
pub use task_event::{TaskEvent, TaskEventKind};
