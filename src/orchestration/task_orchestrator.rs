//! # Task Orchestrator
//!
//! Sequences every task, category, and comment operation as authorization,
//! validation, persistence, then side effects, strictly in that order. This
//! is the only place business rules live: transports hand raw inputs in,
//! storage and remote services are reached exclusively through the injected
//! seams.
//!
//! ## Overview
//!
//! The orchestrator owns four collaborator seams:
//!
//! - **TaskStore** (required): row persistence, owner-scoped
//! - **UserDirectory** (optional): ownership and liveness checks against the
//!   user service; absent in deployments that authenticate upstream
//! - **AnalyticsTracker** (optional): usage counters, tracked inline under a
//!   short timeout
//! - **EventPublisher** (optional): lifecycle notifications, published on a
//!   detached task so they survive the inbound request
//!
//! ## Side-Effect Policy
//!
//! Side effects fire only after the primary row mutation committed, and only
//! for creation, completion, and deletion. A failed or timed-out side effect
//! is logged at `warn` and discarded; the operation still reports success.
//! Plain updates fire nothing.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument, warn};

use crate::clients::{AnalyticsEvent, AnalyticsTracker, UserDirectory, UserProfile};
use crate::constants::{limits, timeouts};
use crate::error::{DomainError, DomainResult};
use crate::events::{EventPublisher, TaskEvent, TaskEventKind};
use crate::export::FormatterRegistry;
use crate::models::{
    Category, Comment, ExportArtifact, ExportFormat, NewCategory, NewComment, NewTask, Task,
    TaskPriority, TaskStatus,
};
use crate::orchestration::inputs::{
    AddCommentInput, CreateCategoryInput, CreateTaskInput, UpdateTaskInput,
};
use crate::repository::{TaskFilter, TaskStore};

/// Time source for event stamps, tombstones, and export filenames.
///
/// Injectable so tests pin the date instead of racing the wall clock.
type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Entry point for every task-domain operation.
///
/// Construct with [`TaskOrchestrator::new`] and attach optional collaborators
/// with the `with_*` builders:
///
/// ```ignore
/// let orchestrator = TaskOrchestrator::new(store)
///     .with_user_directory(users)
///     .with_analytics(analytics)
///     .with_publisher(publisher);
/// ```
pub struct TaskOrchestrator {
    store: Arc<dyn TaskStore>,
    users: Option<Arc<dyn UserDirectory>>,
    analytics: Option<Arc<dyn AnalyticsTracker>>,
    publisher: Option<Arc<dyn EventPublisher>>,
    formatters: Arc<FormatterRegistry>,
    analytics_timeout: Duration,
    publish_timeout: Duration,
    clock: Clock,
}

impl TaskOrchestrator {
    /// Create an orchestrator backed by the given store, with no optional
    /// collaborators, no export formatters, and default side-effect timeouts.
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self {
            store,
            users: None,
            analytics: None,
            publisher: None,
            formatters: Arc::new(FormatterRegistry::new()),
            analytics_timeout: timeouts::ANALYTICS_TRACK,
            publish_timeout: timeouts::EVENT_PUBLISH,
            clock: Arc::new(Utc::now),
        }
    }

    /// Attach a user directory; mutations will require the owner to resolve
    /// to an active profile (unless the owner id is zero).
    pub fn with_user_directory(mut self, users: Arc<dyn UserDirectory>) -> Self {
        self.users = Some(users);
        self
    }

    /// Attach an analytics tracker for created/completed/deleted events.
    pub fn with_analytics(mut self, analytics: Arc<dyn AnalyticsTracker>) -> Self {
        self.analytics = Some(analytics);
        self
    }

    /// Attach a notification publisher for created/completed/deleted events.
    pub fn with_publisher(mut self, publisher: Arc<dyn EventPublisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    /// Replace the export formatter registry.
    pub fn with_formatters(mut self, formatters: FormatterRegistry) -> Self {
        self.formatters = Arc::new(formatters);
        self
    }

    /// Override the side-effect timeout budgets.
    pub fn with_side_effect_timeouts(mut self, analytics: Duration, publish: Duration) -> Self {
        self.analytics_timeout = analytics;
        self.publish_timeout = publish;
        self
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    // ---------------------------------------------------------------------
    // Task operations
    // ---------------------------------------------------------------------

    /// Create a task for the given owner.
    ///
    /// Blank status and priority default to `pending` and `medium`; any other
    /// unrecognized value is rejected before a row is written. A supplied
    /// category id must resolve owner-scoped, and its name is denormalized
    /// onto the returned task. On success a "created" analytics event is
    /// tracked inline and a "created" notification is published detached.
    #[instrument(skip(self, input), fields(user_id = input.user_id))]
    pub async fn create_task(&self, input: CreateTaskInput) -> DomainResult<Task> {
        let user = self.ensure_user(input.user_id).await?;

        let title = validated_title(&input.title)?;
        let description = validated_description(&input.description)?;
        let status = status_or_default(input.status.as_deref())?;
        let priority = priority_or_default(input.priority.as_deref())?;
        let category = self.resolve_category(input.user_id, input.category_id).await?;

        let mut task = self
            .store
            .create_task(NewTask {
                user_id: input.user_id,
                title,
                description,
                status,
                priority,
                due_date: input.due_date,
                category_id: input.category_id,
            })
            .await?;
        task.category_name = category.map(|category| category.name);

        info!(task_id = task.id, status = %task.status, "task created");

        self.track_task_event(TaskEventKind::Created, &task).await;
        self.publish_task_notification(TaskEventKind::Created, &task, user.as_ref());

        Ok(task)
    }

    /// Patch a task: only fields present in the input are touched.
    ///
    /// Due date and category each pair a set-value with a clear flag; the
    /// clear flag applies only when the set-value is absent. Changing the
    /// category re-resolves it owner-scoped. Plain updates fire no side
    /// effects.
    #[instrument(skip(self, input), fields(user_id = input.user_id, task_id = input.task_id))]
    pub async fn update_task(&self, input: UpdateTaskInput) -> DomainResult<Task> {
        self.ensure_user(input.user_id).await?;

        let mut task = self.store.get_task(input.user_id, input.task_id).await?;

        if let Some(title) = &input.title {
            task.title = validated_title(title)?;
        }
        if let Some(description) = &input.description {
            task.description = validated_description(description)?;
        }
        if let Some(status) = &input.status {
            task.status = parse_status(status)?;
        }
        if let Some(priority) = &input.priority {
            task.priority = parse_priority(priority)?;
        }

        if input.due_date.is_some() {
            task.due_date = input.due_date;
        } else if input.clear_due_date {
            task.due_date = None;
        }

        if let Some(category_id) = input.category_id {
            let category = self.store.get_category(input.user_id, category_id).await?;
            task.category_id = Some(category_id);
            task.category_name = Some(category.name);
        } else if input.clear_category {
            task.category_id = None;
            task.category_name = None;
        }

        let task = self.store.update_task(&task).await?;
        debug!(task_id = task.id, "task updated");
        Ok(task)
    }

    /// Move a task to a new lifecycle status.
    ///
    /// The status string is validated before the task is even loaded. When
    /// the new status is exactly `completed`, "completed" side effects fire;
    /// every other target status fires nothing.
    #[instrument(skip(self))]
    pub async fn update_task_status(
        &self,
        user_id: i64,
        task_id: i64,
        status: &str,
    ) -> DomainResult<Task> {
        let user = self.ensure_user(user_id).await?;
        let status = parse_status(status)?;

        let mut task = self.store.get_task(user_id, task_id).await?;
        task.status = status;
        let task = self.store.update_task(&task).await?;

        info!(task_id = task.id, status = %task.status, "task status updated");

        if status == TaskStatus::Completed {
            self.track_task_event(TaskEventKind::Completed, &task).await;
            self.publish_task_notification(TaskEventKind::Completed, &task, user.as_ref());
        }

        Ok(task)
    }

    /// Tombstone a task.
    ///
    /// The task is loaded before the delete because the "deleted" side
    /// effects need its payload after the row is no longer readable.
    #[instrument(skip(self))]
    pub async fn delete_task(&self, user_id: i64, task_id: i64) -> DomainResult<()> {
        let user = self.ensure_user(user_id).await?;

        let task = self.store.get_task(user_id, task_id).await?;
        self.store.soft_delete_task(user_id, task_id, self.now()).await?;

        info!(task_id, "task deleted");

        self.track_task_event(TaskEventKind::Deleted, &task).await;
        self.publish_task_notification(TaskEventKind::Deleted, &task, user.as_ref());

        Ok(())
    }

    /// Fetch a single live task owned by the caller.
    #[instrument(skip(self))]
    pub async fn get_task(&self, user_id: i64, task_id: i64) -> DomainResult<Task> {
        self.ensure_user(user_id).await?;
        self.store.get_task(user_id, task_id).await
    }

    /// List live tasks matching the filter.
    ///
    /// Pagination is normalized before the query runs: a missing or
    /// non-positive limit becomes the default page size, an oversized limit
    /// is clamped, and a negative offset becomes zero.
    #[instrument(skip(self, filter))]
    pub async fn list_tasks(&self, user_id: i64, filter: TaskFilter) -> DomainResult<Vec<Task>> {
        self.ensure_user(user_id).await?;
        let filter = filter.normalized();
        self.store.list_tasks(user_id, &filter).await
    }

    // ---------------------------------------------------------------------
    // Category operations
    // ---------------------------------------------------------------------

    /// Create a category for the given owner.
    #[instrument(skip(self, input), fields(user_id = input.user_id))]
    pub async fn create_category(&self, input: CreateCategoryInput) -> DomainResult<Category> {
        self.ensure_user(input.user_id).await?;

        let name = validated_category_name(&input.name)?;
        let category = self
            .store
            .create_category(NewCategory { user_id: input.user_id, name })
            .await?;

        info!(category_id = category.id, "category created");
        Ok(category)
    }

    /// List the caller's categories ordered by name.
    #[instrument(skip(self))]
    pub async fn list_categories(&self, user_id: i64) -> DomainResult<Vec<Category>> {
        self.ensure_user(user_id).await?;
        self.store.list_categories(user_id).await
    }

    /// Delete a category owned by the caller.
    #[instrument(skip(self))]
    pub async fn delete_category(&self, user_id: i64, category_id: i64) -> DomainResult<()> {
        self.ensure_user(user_id).await?;
        self.store.delete_category(user_id, category_id).await?;
        info!(category_id, "category deleted");
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Comment operations
    // ---------------------------------------------------------------------

    /// Attach a comment to a task the caller owns.
    ///
    /// The task must exist and be live; the existence check runs before any
    /// row is written so a comment can never point at a tombstoned task.
    #[instrument(skip(self, input), fields(user_id = input.user_id, task_id = input.task_id))]
    pub async fn add_comment(&self, input: AddCommentInput) -> DomainResult<Comment> {
        self.ensure_user(input.user_id).await?;

        let content = validated_comment(&input.content)?;
        self.store.get_task(input.user_id, input.task_id).await?;

        let comment = self
            .store
            .create_comment(NewComment {
                task_id: input.task_id,
                user_id: input.user_id,
                content,
            })
            .await?;

        debug!(comment_id = comment.id, "comment added");
        Ok(comment)
    }

    /// List a task's comments oldest first.
    #[instrument(skip(self))]
    pub async fn list_comments(&self, user_id: i64, task_id: i64) -> DomainResult<Vec<Comment>> {
        self.ensure_user(user_id).await?;
        self.store.get_task(user_id, task_id).await?;
        self.store.list_comments(user_id, task_id).await
    }

    // ---------------------------------------------------------------------
    // Export
    // ---------------------------------------------------------------------

    /// Render the caller's live tasks into a downloadable artifact.
    ///
    /// The export query ignores the normal page-size clamp and fetches up to
    /// the export row cap. The filename carries the current date from the
    /// orchestrator's clock, e.g. `tasks_2025-06-01.csv`.
    #[instrument(skip(self))]
    pub async fn export_tasks(
        &self,
        user_id: i64,
        format: ExportFormat,
    ) -> DomainResult<ExportArtifact> {
        self.ensure_user(user_id).await?;

        let formatter = self.formatters.resolve(format)?;
        let filter = TaskFilter::for_export();
        let tasks = self.store.list_tasks(user_id, &filter).await?;
        let data = formatter.format(&tasks)?;

        let artifact = ExportArtifact {
            filename: export_filename(self.now(), format),
            content_type: format.content_type().to_string(),
            data,
        };

        info!(rows = tasks.len(), filename = %artifact.filename, "tasks exported");
        Ok(artifact)
    }

    // ---------------------------------------------------------------------
    // Authorization and side effects
    // ---------------------------------------------------------------------

    /// Resolve the owner through the user directory, when one is configured.
    ///
    /// Without a directory, or with a zero owner id, the gate is absent and
    /// `None` comes back. Directory errors propagate verbatim; a profile that
    /// resolves but is inactive is replaced by an access-denied error no
    /// matter what the directory reported.
    async fn ensure_user(&self, user_id: i64) -> DomainResult<Option<UserProfile>> {
        let Some(directory) = &self.users else {
            return Ok(None);
        };
        if user_id == 0 {
            return Ok(None);
        }

        let profile = directory.get_user(user_id).await?;
        if !profile.active {
            warn!(user_id, "inactive user denied task access");
            return Err(DomainError::forbidden());
        }
        Ok(Some(profile))
    }

    async fn resolve_category(
        &self,
        user_id: i64,
        category_id: Option<i64>,
    ) -> DomainResult<Option<Category>> {
        match category_id {
            Some(id) => Ok(Some(self.store.get_category(user_id, id).await?)),
            None => Ok(None),
        }
    }

    /// Track a usage event inline, bounded by the analytics timeout.
    async fn track_task_event(&self, kind: TaskEventKind, task: &Task) {
        let Some(analytics) = &self.analytics else {
            return;
        };

        let event = AnalyticsEvent {
            kind,
            user_id: task.user_id,
            task_id: task.id,
            status: task.status,
            priority: task.priority,
            occurred_at: self.now(),
        };

        match tokio::time::timeout(self.analytics_timeout, analytics.track_task_event(event)).await
        {
            Ok(Ok(())) => debug!(kind = %kind, task_id = task.id, "analytics event tracked"),
            Ok(Err(err)) => {
                warn!(kind = %kind, task_id = task.id, error = %err, "analytics tracking failed");
            }
            Err(_) => {
                warn!(
                    kind = %kind,
                    task_id = task.id,
                    timeout_ms = self.analytics_timeout.as_millis() as u64,
                    "analytics tracking timed out"
                );
            }
        }
    }

    /// Publish a lifecycle notification on a detached task.
    ///
    /// Skipped when no publisher is configured or no owner email was
    /// resolved. The spawned publish is bounded by the publish timeout and
    /// outlives the inbound request.
    fn publish_task_notification(
        &self,
        kind: TaskEventKind,
        task: &Task,
        user: Option<&UserProfile>,
    ) {
        let Some(publisher) = &self.publisher else {
            return;
        };
        let Some(user) = user else {
            return;
        };
        if user.email.is_empty() {
            return;
        }

        let event = TaskEvent::for_task(kind, task, user.id, &user.email, self.now());
        let publisher = Arc::clone(publisher);
        let timeout = self.publish_timeout;
        let task_id = task.id;

        tokio::spawn(async move {
            match tokio::time::timeout(timeout, publisher.publish(event)).await {
                Ok(Ok(())) => debug!(kind = %kind, task_id, "task notification published"),
                Ok(Err(err)) => {
                    warn!(kind = %kind, task_id, error = %err, "notification publish failed");
                }
                Err(_) => {
                    warn!(
                        kind = %kind,
                        task_id,
                        timeout_ms = timeout.as_millis() as u64,
                        "notification publish timed out"
                    );
                }
            }
        });
    }
}

impl fmt::Debug for TaskOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskOrchestrator")
            .field("users", &self.users.is_some())
            .field("analytics", &self.analytics.is_some())
            .field("publisher", &self.publisher.is_some())
            .field("formatters", &self.formatters)
            .field("analytics_timeout", &self.analytics_timeout)
            .field("publish_timeout", &self.publish_timeout)
            .finish()
    }
}

// -------------------------------------------------------------------------
// Validation helpers
// -------------------------------------------------------------------------

fn validated_title(raw: &str) -> DomainResult<String> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(DomainError::validation().with_message("title is required"));
    }
    if title.chars().count() > limits::MAX_TITLE_LENGTH {
        return Err(DomainError::validation().with_message(format!(
            "title must be at most {} characters",
            limits::MAX_TITLE_LENGTH
        )));
    }
    Ok(title.to_string())
}

fn validated_description(raw: &str) -> DomainResult<String> {
    let description = raw.trim();
    if description.chars().count() > limits::MAX_DESCRIPTION_LENGTH {
        return Err(DomainError::validation().with_message(format!(
            "description must be at most {} characters",
            limits::MAX_DESCRIPTION_LENGTH
        )));
    }
    Ok(description.to_string())
}

fn validated_category_name(raw: &str) -> DomainResult<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(DomainError::validation().with_message("category name is required"));
    }
    if name.chars().count() > limits::MAX_CATEGORY_NAME_LENGTH {
        return Err(DomainError::validation().with_message(format!(
            "category name must be at most {} characters",
            limits::MAX_CATEGORY_NAME_LENGTH
        )));
    }
    Ok(name.to_string())
}

fn validated_comment(raw: &str) -> DomainResult<String> {
    let content = raw.trim();
    if content.is_empty() {
        return Err(DomainError::validation().with_message("comment cannot be empty"));
    }
    if content.chars().count() > limits::MAX_COMMENT_LENGTH {
        return Err(DomainError::validation().with_message(format!(
            "comment must be at most {} characters",
            limits::MAX_COMMENT_LENGTH
        )));
    }
    Ok(content.to_string())
}

/// Parse a caller-supplied status; membership only, no transition rules.
fn parse_status(raw: &str) -> DomainResult<TaskStatus> {
    raw.parse::<TaskStatus>().map_err(|_| {
        DomainError::invalid_task_status().with_message(format!("unsupported status: {raw}"))
    })
}

/// Parse a caller-supplied priority; membership only.
fn parse_priority(raw: &str) -> DomainResult<TaskPriority> {
    raw.parse::<TaskPriority>().map_err(|_| {
        DomainError::invalid_priority().with_message(format!("unsupported priority: {raw}"))
    })
}

/// Like [`parse_status`], but an absent or blank value takes the default so
/// RPC-style callers that omit the field behave like everyone else.
fn status_or_default(raw: Option<&str>) -> DomainResult<TaskStatus> {
    match raw {
        None => Ok(TaskStatus::default()),
        Some(value) if value.trim().is_empty() => Ok(TaskStatus::default()),
        Some(value) => parse_status(value),
    }
}

/// Like [`parse_priority`], but an absent or blank value takes the default.
fn priority_or_default(raw: Option<&str>) -> DomainResult<TaskPriority> {
    match raw {
        None => Ok(TaskPriority::default()),
        Some(value) if value.trim().is_empty() => Ok(TaskPriority::default()),
        Some(value) => parse_priority(value),
    }
}

fn export_filename(at: DateTime<Utc>, format: ExportFormat) -> String {
    format!("tasks_{}.{}", at.format("%Y-%m-%d"), format.file_extension())
}
