//! Analytics tracking seam.
//!
//! Usage counters live in the analytics service. Tracking is best-effort: the
//! orchestrator calls it inline under a short timeout and logs failures
//! without surfacing them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tonic::Status;

use crate::error::{DomainError, DomainResult};
use crate::events::TaskEventKind;
use crate::models::{TaskPriority, TaskStatus};

/// Usage data point recorded after a successful task mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    pub kind: TaskEventKind,
    pub user_id: i64,
    pub task_id: i64,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub occurred_at: DateTime<Utc>,
}

/// Tracking operations required from the analytics service.
#[async_trait]
pub trait AnalyticsTracker: Send + Sync {
    async fn track_task_event(&self, event: AnalyticsEvent) -> DomainResult<()>;
}

/// Map an analytics gRPC status onto a tracking result.
///
/// The analytics service rejects malformed data points with InvalidArgument.
/// A rejected point is dropped data, not a failure worth retrying or logging
/// loudly, so it maps to success. Everything else surfaces as an internal
/// error carrying the status as cause.
pub fn translate_analytics_status(status: Status) -> DomainResult<()> {
    if status.code() == tonic::Code::InvalidArgument {
        return Ok(());
    }
    Err(DomainError::internal().with_cause(status))
}
