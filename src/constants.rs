//! # System Constants
//!
//! Core constants that define the operational boundaries of the task
//! orchestration service: field length limits, pagination bounds, and
//! timeout budgets for best-effort side effects.

/// Event kind strings carried on the task event wire format
pub mod events {
    pub const TASK_CREATED: &str = "task.created";
    pub const TASK_COMPLETED: &str = "task.completed";
    pub const TASK_DELETED: &str = "task.deleted";
}

/// Maximum lengths for user-supplied text fields, enforced at the
/// orchestration edge before any row is written
pub mod limits {
    /// Maximum task title length in characters
    pub const MAX_TITLE_LENGTH: usize = 200;

    /// Maximum task description length in characters
    pub const MAX_DESCRIPTION_LENGTH: usize = 2000;

    /// Maximum category name length in characters
    pub const MAX_CATEGORY_NAME_LENGTH: usize = 120;

    /// Maximum comment content length in characters
    pub const MAX_COMMENT_LENGTH: usize = 1000;
}

/// Pagination bounds applied to list queries
pub mod pagination {
    /// Page size used when the caller supplies none (or a non-positive one)
    pub const DEFAULT_LIMIT: i64 = 20;

    /// Largest page size a caller may request
    pub const MAX_LIMIT: i64 = 100;

    /// Row cap for export queries, which bypass the page-size clamp
    pub const EXPORT_ROW_CAP: i64 = 10_000;
}

/// Timeout budgets for calls that must never stall a mutation
pub mod timeouts {
    use std::time::Duration;

    /// Per-call budget for inline analytics tracking
    pub const ANALYTICS_TRACK: Duration = Duration::from_secs(2);

    /// Budget for a detached event publish before it is abandoned
    pub const EVENT_PUBLISH: Duration = Duration::from_secs(3);

    /// Per-call budget for user directory lookups
    pub const DIRECTORY_LOOKUP: Duration = Duration::from_secs(3);
}
