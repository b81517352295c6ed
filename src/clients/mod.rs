//! Client seams for the sibling services the orchestrator delegates to.
//!
//! The orchestrator only ever sees the traits defined here. Concrete gRPC
//! bindings implement them and use the shared translation helpers so remote
//! status codes surface as catalog errors with stable semantics.

pub mod analytics;
pub mod common;
pub mod user_directory;

// Re-export key types for convenience
pub use analytics::{AnalyticsEvent, AnalyticsTracker};
pub use common::GrpcClientConfig;
pub use user_directory::{UserDirectory, UserProfile};
