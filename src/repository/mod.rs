//! # Repository Layer
//!
//! Persistence for tasks, categories, and comments over PostgreSQL.
//!
//! ## Overview
//!
//! Every query is owner-scoped: read and write predicates always include the
//! requesting user's id, so cross-tenant access cannot be expressed. Zero-row
//! updates and deletes translate to not-found catalog errors at this boundary,
//! never to a silent no-op.
//!
//! Deleting a task writes a tombstone (`deleted_at`) instead of removing the
//! row; every live read filters tombstoned rows out.
//!
//! ## Transactions
//!
//! Multi-step writes go through [`postgres::PgTaskRepository::with_transaction`],
//! which hands the closure an explicit [`postgres::PgUnitOfWork`] handle. The
//! handle owns the open transaction, commits on success, and rolls back when
//! the closure fails. There is no ambient transaction state: code that wants
//! the transaction must hold the handle.

pub mod filter;
pub mod postgres;
pub mod query;
pub mod store;

// Re-export key types for convenience
pub use filter::TaskFilter;
pub use postgres::{PgTaskRepository, PgUnitOfWork};
pub use query::TaskQuery;
pub use store::TaskStore;
