#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Tasklane Core
//!
//! Orchestration core for the Tasklane task-management service.
//!
//! ## Overview
//!
//! This crate is the task service's business layer: everything between a
//! transport (HTTP handler, gRPC service) and the infrastructure it talks to.
//! It owns the error taxonomy, the owner-scoped PostgreSQL repository, and
//! the orchestrator that sequences every mutation as authorization,
//! validation, persistence, then best-effort side effects.
//!
//! ## Architecture
//!
//! Operations flow through the [`orchestration::TaskOrchestrator`], which
//! reaches infrastructure only through injected seams:
//!
//! - [`repository::TaskStore`] - row persistence, implemented by
//!   [`repository::PgTaskRepository`] over SQLx
//! - [`clients::UserDirectory`] - ownership and liveness checks against the
//!   user service (optional)
//! - [`clients::AnalyticsTracker`] - usage counters, tracked inline under a
//!   short timeout (optional)
//! - [`events::EventPublisher`] - lifecycle notifications, published on a
//!   detached task (optional)
//! - [`export::ExportFormatter`] - task list serializers resolved per format
//!
//! Side effects never decide an operation's outcome: once the row mutation
//! committed, the operation succeeds even if every side effect fails.
//!
//! ## Module Organization
//!
//! - [`error`] - Closed error-code catalog with HTTP and RPC mappings
//! - [`models`] - Task, category, comment, and export records
//! - [`repository`] - Owner-scoped queries, tombstone soft-delete, unit of work
//! - [`orchestration`] - Operation sequencing and side-effect fan-out
//! - [`clients`] - gRPC seams for the user and analytics services
//! - [`events`] - Task lifecycle event wire format and publisher seam
//! - [`export`] - Formatter registry for task downloads
//! - [`config`] - Embedder configuration with env and file loading
//! - [`logging`] - Console + JSON file tracing setup
//! - [`constants`] - Field limits, pagination bounds, timeout budgets
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tasklane_core::orchestration::{CreateTaskInput, TaskOrchestrator};
//! use tasklane_core::repository::PgTaskRepository;
//!
//! # async fn example(pool: sqlx::PgPool) -> Result<(), Box<dyn std::error::Error>> {
//! tasklane_core::logging::init_structured_logging();
//!
//! let store = Arc::new(PgTaskRepository::new(pool));
//! let orchestrator = TaskOrchestrator::new(store);
//!
//! let task = orchestrator
//!     .create_task(CreateTaskInput {
//!         user_id: 7,
//!         title: "Ship the release".to_string(),
//!         ..Default::default()
//!     })
//!     .await?;
//! println!("created task {}", task.id);
//! # Ok(())
//! # }
//! ```

pub mod clients;
pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod export;
pub mod logging;
pub mod models;
pub mod orchestration;
pub mod repository;

pub use config::{ConfigError, OrchestratorConfig};
pub use error::{DomainError, DomainResult, ErrorCode, HttpErrorBody};
pub use models::{
    Category, Comment, ExportArtifact, ExportFormat, Task, TaskPriority, TaskStatus,
};
pub use orchestration::{
    AddCommentInput, CreateCategoryInput, CreateTaskInput, TaskOrchestrator, UpdateTaskInput,
};
pub use repository::{PgTaskRepository, TaskFilter, TaskStore};
