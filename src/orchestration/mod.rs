//! # Task Orchestration
//!
//! The single place where business rules, authorization delegation,
//! persistence, and best-effort side effects are sequenced for every task,
//! category, and comment mutation.
//!
//! ## Core Components
//!
//! - **TaskOrchestrator**: Sequences each operation as authorization,
//!   validation, persistence, then side effects, strictly in that order
//! - **Operation inputs**: Plain carriers for create/update payloads; status
//!   and priority travel as raw strings so membership validation happens here
//!   and surfaces catalog errors
//!
//! Side effects (analytics tracking, notification publishing) never affect an
//! operation's outcome: once the primary row mutation succeeds, the operation
//! reports success even if every side effect fails.

pub mod inputs;
pub mod task_orchestrator;

// Re-export key types for convenience
pub use inputs::{AddCommentInput, CreateCategoryInput, CreateTaskInput, UpdateTaskInput};
pub use task_orchestrator::TaskOrchestrator;
