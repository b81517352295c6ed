//! Mock collaborators for orchestrator tests.
//!
//! In-memory stand-ins for the persistence store, user directory, analytics
//! tracker, event publisher, and export formatter. Each records the calls it
//! receives behind an `Arc<Mutex<State>>` so tests assert on ordering and
//! counts, and each has `with_*` knobs to simulate failures and slowness.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use tasklane_core::clients::{AnalyticsEvent, AnalyticsTracker, UserDirectory, UserProfile};
use tasklane_core::error::{DomainError, DomainResult};
use tasklane_core::events::{EventPublisher, PublishError, TaskEvent};
use tasklane_core::export::ExportFormatter;
use tasklane_core::models::{
    Category, Comment, NewCategory, NewComment, NewTask, Task, TaskPriority, TaskStatus,
};
use tasklane_core::repository::{TaskFilter, TaskStore};

// -------------------------------------------------------------------------
// Builders for seeded rows
// -------------------------------------------------------------------------

/// A live task row with sensible defaults for seeding the mock store.
pub fn task_fixture(id: i64, user_id: i64, title: &str) -> Task {
    Task {
        id,
        user_id,
        title: title.to_string(),
        description: String::new(),
        status: TaskStatus::Pending,
        priority: TaskPriority::Medium,
        due_date: None,
        category_id: None,
        category_name: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn category_fixture(id: i64, user_id: i64, name: &str) -> Category {
    Category {
        id,
        user_id,
        name: name.to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn active_profile(id: i64, email: &str) -> UserProfile {
    UserProfile {
        id,
        email: email.to_string(),
        name: format!("user-{id}"),
        role: "member".to_string(),
        active: true,
    }
}

// -------------------------------------------------------------------------
// MockTaskStore
// -------------------------------------------------------------------------

/// Recorded state of the in-memory store.
#[derive(Debug, Default, Clone)]
pub struct MockStoreState {
    pub tasks: HashMap<i64, Task>,
    pub categories: HashMap<i64, Category>,
    pub comments: Vec<Comment>,
    /// Method names in call order
    pub calls: Vec<String>,
    /// Filters captured from `list_tasks`
    pub list_filters: Vec<TaskFilter>,
    /// `(user_id, task_id, when)` captured from `soft_delete_task`
    pub deletes: Vec<(i64, i64, DateTime<Utc>)>,
    next_id: i64,
}

/// In-memory `TaskStore` that records every call.
pub struct MockTaskStore {
    state: Arc<Mutex<MockStoreState>>,
}

impl MockTaskStore {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockStoreState {
                next_id: 1000,
                ..Default::default()
            })),
        }
    }

    /// Seed a live task row.
    pub fn with_task(self, task: Task) -> Self {
        self.state.lock().unwrap().tasks.insert(task.id, task);
        self
    }

    /// Seed a category row.
    pub fn with_category(self, category: Category) -> Self {
        self.state.lock().unwrap().categories.insert(category.id, category);
        self
    }

    /// Snapshot of the recorded state for assertions.
    pub fn state(&self) -> MockStoreState {
        self.state.lock().unwrap().clone()
    }

    /// Method names in the order they were called.
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    fn record(&self, method: &str) {
        self.state.lock().unwrap().calls.push(method.to_string());
    }

    fn fresh_id(&self) -> i64 {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        state.next_id
    }
}

#[async_trait]
impl TaskStore for MockTaskStore {
    async fn create_task(&self, new_task: NewTask) -> DomainResult<Task> {
        self.record("create_task");
        let now = Utc::now();
        let task = Task {
            id: self.fresh_id(),
            user_id: new_task.user_id,
            title: new_task.title,
            description: new_task.description,
            status: new_task.status,
            priority: new_task.priority,
            due_date: new_task.due_date,
            category_id: new_task.category_id,
            category_name: None,
            created_at: now,
            updated_at: now,
        };
        self.state.lock().unwrap().tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn update_task(&self, task: &Task) -> DomainResult<Task> {
        self.record("update_task");
        let mut state = self.state.lock().unwrap();
        match state.tasks.get(&task.id) {
            Some(existing) if existing.user_id == task.user_id => {
                let updated = Task {
                    updated_at: Utc::now(),
                    ..task.clone()
                };
                state.tasks.insert(updated.id, updated.clone());
                Ok(updated)
            }
            _ => Err(DomainError::task_not_found()),
        }
    }

    async fn soft_delete_task(
        &self,
        user_id: i64,
        task_id: i64,
        when: DateTime<Utc>,
    ) -> DomainResult<()> {
        self.record("soft_delete_task");
        let mut state = self.state.lock().unwrap();
        match state.tasks.get(&task_id) {
            Some(existing) if existing.user_id == user_id => {
                state.tasks.remove(&task_id);
                state.deletes.push((user_id, task_id, when));
                Ok(())
            }
            _ => Err(DomainError::task_not_found()),
        }
    }

    async fn get_task(&self, user_id: i64, task_id: i64) -> DomainResult<Task> {
        self.record("get_task");
        let state = self.state.lock().unwrap();
        state
            .tasks
            .get(&task_id)
            .filter(|task| task.user_id == user_id)
            .cloned()
            .ok_or_else(DomainError::task_not_found)
    }

    async fn list_tasks(&self, user_id: i64, filter: &TaskFilter) -> DomainResult<Vec<Task>> {
        self.record("list_tasks");
        let mut state = self.state.lock().unwrap();
        state.list_filters.push(filter.clone());
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| task.user_id == user_id)
            .cloned()
            .collect();
        tasks.sort_by_key(|task| task.id);
        Ok(tasks)
    }

    async fn create_category(&self, new_category: NewCategory) -> DomainResult<Category> {
        self.record("create_category");
        let now = Utc::now();
        let category = Category {
            id: self.fresh_id(),
            user_id: new_category.user_id,
            name: new_category.name,
            created_at: now,
            updated_at: now,
        };
        self.state
            .lock()
            .unwrap()
            .categories
            .insert(category.id, category.clone());
        Ok(category)
    }

    async fn list_categories(&self, user_id: i64) -> DomainResult<Vec<Category>> {
        self.record("list_categories");
        let state = self.state.lock().unwrap();
        let mut categories: Vec<Category> = state
            .categories
            .values()
            .filter(|category| category.user_id == user_id)
            .cloned()
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn get_category(&self, user_id: i64, category_id: i64) -> DomainResult<Category> {
        self.record("get_category");
        let state = self.state.lock().unwrap();
        state
            .categories
            .get(&category_id)
            .filter(|category| category.user_id == user_id)
            .cloned()
            .ok_or_else(DomainError::category_not_found)
    }

    async fn delete_category(&self, user_id: i64, category_id: i64) -> DomainResult<()> {
        self.record("delete_category");
        let mut state = self.state.lock().unwrap();
        match state.categories.get(&category_id) {
            Some(existing) if existing.user_id == user_id => {
                state.categories.remove(&category_id);
                Ok(())
            }
            _ => Err(DomainError::category_not_found()),
        }
    }

    async fn create_comment(&self, new_comment: NewComment) -> DomainResult<Comment> {
        self.record("create_comment");
        let comment = Comment {
            id: self.fresh_id(),
            task_id: new_comment.task_id,
            user_id: new_comment.user_id,
            content: new_comment.content,
            created_at: Utc::now(),
        };
        self.state.lock().unwrap().comments.push(comment.clone());
        Ok(comment)
    }

    async fn list_comments(&self, user_id: i64, task_id: i64) -> DomainResult<Vec<Comment>> {
        self.record("list_comments");
        let state = self.state.lock().unwrap();
        Ok(state
            .comments
            .iter()
            .filter(|comment| comment.user_id == user_id && comment.task_id == task_id)
            .cloned()
            .collect())
    }
}

// -------------------------------------------------------------------------
// MockUserDirectory
// -------------------------------------------------------------------------

#[derive(Debug, Default)]
struct DirectoryState {
    profiles: HashMap<i64, UserProfile>,
    lookups: Vec<i64>,
    failure: Option<DomainError>,
}

/// In-memory `UserDirectory` that records lookups.
pub struct MockUserDirectory {
    state: Arc<Mutex<DirectoryState>>,
}

impl MockUserDirectory {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(DirectoryState::default())),
        }
    }

    /// Seed a profile returned verbatim on lookup.
    pub fn with_profile(self, profile: UserProfile) -> Self {
        self.state.lock().unwrap().profiles.insert(profile.id, profile);
        self
    }

    /// Seed an active profile with the given email.
    pub fn with_active_user(self, id: i64, email: &str) -> Self {
        self.with_profile(active_profile(id, email))
    }

    /// Seed a resolvable but inactive profile.
    pub fn with_inactive_user(self, id: i64) -> Self {
        let profile = UserProfile {
            active: false,
            ..active_profile(id, "inactive@example.com")
        };
        self.with_profile(profile)
    }

    /// Fail every lookup with the given error.
    #[allow(dead_code)]
    pub fn with_failure(self, error: DomainError) -> Self {
        self.state.lock().unwrap().failure = Some(error);
        self
    }

    /// User ids looked up, in order.
    pub fn lookups(&self) -> Vec<i64> {
        self.state.lock().unwrap().lookups.clone()
    }
}

#[async_trait]
impl UserDirectory for MockUserDirectory {
    async fn get_user(&self, user_id: i64) -> DomainResult<UserProfile> {
        let mut state = self.state.lock().unwrap();
        state.lookups.push(user_id);
        if let Some(failure) = &state.failure {
            return Err(failure.clone());
        }
        state
            .profiles
            .get(&user_id)
            .cloned()
            .ok_or_else(DomainError::user_not_found)
    }
}

// -------------------------------------------------------------------------
// MockAnalyticsTracker
// -------------------------------------------------------------------------

#[derive(Debug, Default)]
struct AnalyticsState {
    events: Vec<AnalyticsEvent>,
    failure: Option<DomainError>,
}

/// Recording `AnalyticsTracker` with failure and delay knobs.
pub struct MockAnalyticsTracker {
    state: Arc<Mutex<AnalyticsState>>,
    delay: Option<Duration>,
}

impl MockAnalyticsTracker {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(AnalyticsState::default())),
            delay: None,
        }
    }

    /// Fail every tracking call with the given error.
    pub fn with_failure(self, error: DomainError) -> Self {
        self.state.lock().unwrap().failure = Some(error);
        self
    }

    /// Sleep before answering, to exercise the inline timeout.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Events received so far. A delayed call records its event before
    /// sleeping, so abandoned calls are still observable.
    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.state.lock().unwrap().events.clone()
    }
}

#[async_trait]
impl AnalyticsTracker for MockAnalyticsTracker {
    async fn track_task_event(&self, event: AnalyticsEvent) -> DomainResult<()> {
        let failure = {
            let mut state = self.state.lock().unwrap();
            state.events.push(event);
            state.failure.clone()
        };
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match failure {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

// -------------------------------------------------------------------------
// MockEventPublisher
// -------------------------------------------------------------------------

#[derive(Debug, Default)]
struct PublisherState {
    published: Vec<TaskEvent>,
    failure_message: Option<String>,
}

/// Recording `EventPublisher`.
///
/// Publishes happen on a detached task in the orchestrator, so alongside the
/// recorded state this mock forwards every event to an `mpsc` channel; tests
/// await the receiver under `tokio::time::timeout` to observe them.
pub struct MockEventPublisher {
    state: Arc<Mutex<PublisherState>>,
    notify: mpsc::UnboundedSender<TaskEvent>,
}

impl MockEventPublisher {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TaskEvent>) {
        let (notify, receiver) = mpsc::unbounded_channel();
        (
            Self {
                state: Arc::new(Mutex::new(PublisherState::default())),
                notify,
            },
            receiver,
        )
    }

    /// Fail every publish with a transport error, after recording it.
    pub fn with_failure(self, message: &str) -> Self {
        self.state.lock().unwrap().failure_message = Some(message.to_string());
        self
    }

    /// Events received so far.
    pub fn published(&self) -> Vec<TaskEvent> {
        self.state.lock().unwrap().published.clone()
    }
}

#[async_trait]
impl EventPublisher for MockEventPublisher {
    async fn publish(&self, event: TaskEvent) -> Result<(), PublishError> {
        let failure = {
            let mut state = self.state.lock().unwrap();
            state.published.push(event.clone());
            state.failure_message.clone()
        };
        let _ = self.notify.send(event);
        match failure {
            Some(message) => Err(PublishError::Transport(message)),
            None => Ok(()),
        }
    }
}

// -------------------------------------------------------------------------
// StubFormatter
// -------------------------------------------------------------------------

/// Export formatter that renders one line per task id.
pub struct StubFormatter;

impl ExportFormatter for StubFormatter {
    fn format(&self, tasks: &[Task]) -> DomainResult<Vec<u8>> {
        let mut out = Vec::new();
        for task in tasks {
            out.extend_from_slice(format!("{}\n", task.id).as_bytes());
        }
        Ok(out)
    }
}
