pub mod category;
pub mod comment;
pub mod export;
pub mod task;

// Re-export core models for easy access
pub use category::{Category, NewCategory};
pub use comment::{Comment, NewComment};
pub use export::{ExportArtifact, ExportFormat};
pub use task::{NewTask, Task, TaskPriority, TaskStatus};
