use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::pagination;
use crate::models::{TaskPriority, TaskStatus};

/// Composable predicates for task listings.
///
/// Empty collections and `None` fields add no predicate; everything present
/// is combined with logical AND. The due-date range is inclusive on both
/// ends. Search matches a case-insensitive substring of title or description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskFilter {
    pub statuses: Vec<TaskStatus>,
    pub priorities: Vec<TaskPriority>,
    pub category_id: Option<i64>,
    pub search: Option<String>,
    pub due_from: Option<DateTime<Utc>>,
    pub due_to: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl TaskFilter {
    /// Clamp pagination to the service contract: limit in (0, 100] defaulting
    /// to 20, offset non-negative defaulting to 0.
    ///
    /// Callers that legitimately need more than a page, like exports, build
    /// their filter with an explicit row cap and skip this.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        let limit = match self.limit {
            Some(limit) if limit > 0 => limit.min(pagination::MAX_LIMIT),
            _ => pagination::DEFAULT_LIMIT,
        };
        let offset = match self.offset {
            Some(offset) if offset >= 0 => offset,
            _ => 0,
        };
        self.limit = Some(limit);
        self.offset = Some(offset);
        self
    }

    /// Filter used by exports: no predicates, a large fixed row cap instead
    /// of the page-size clamp.
    #[must_use]
    pub fn for_export() -> Self {
        Self {
            limit: Some(pagination::EXPORT_ROW_CAP),
            ..Default::default()
        }
    }

    /// Limit to bind, falling back to the default page size
    pub fn bind_limit(&self) -> i64 {
        self.limit.unwrap_or(pagination::DEFAULT_LIMIT)
    }

    /// Offset to bind, falling back to zero
    pub fn bind_offset(&self) -> i64 {
        self.offset.unwrap_or(0)
    }

    /// True when the search term is non-empty after trimming
    pub fn has_search(&self) -> bool {
        self.search
            .as_deref()
            .is_some_and(|term| !term.trim().is_empty())
    }
}
