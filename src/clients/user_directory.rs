//! User directory seam.
//!
//! The task service does not own user records. Ownership checks and email
//! resolution go through this trait, backed by the user service over gRPC in
//! production and by in-memory fakes in tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tonic::Status;

use crate::error::{DomainError, DomainResult};

/// Lightweight user profile returned by the user directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: String,
    pub active: bool,
}

/// Lookup operations required from the user service.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Fetch the profile for a user id.
    ///
    /// Implementations return [`crate::error::ErrorCode::UserNotFound`] when
    /// the directory has no record, including when the remote call succeeds
    /// but carries no profile payload.
    async fn get_user(&self, user_id: i64) -> DomainResult<UserProfile>;
}

/// Map a directory gRPC status onto the error catalog.
///
/// Unrecognized codes collapse to an internal error carrying the original
/// status as cause, so nothing from the remote side escapes the catalog.
pub fn translate_directory_status(status: Status) -> DomainError {
    match status.code() {
        tonic::Code::NotFound => DomainError::user_not_found(),
        tonic::Code::PermissionDenied => DomainError::forbidden(),
        tonic::Code::InvalidArgument => {
            let detail = status.message().to_string();
            DomainError::validation().with_detail(detail)
        }
        _ => DomainError::internal().with_cause(status),
    }
}
