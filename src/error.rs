//! # Error Taxonomy
//!
//! Unified, closed catalog of coded errors shared by every component in the
//! orchestration core, with total mappings onto HTTP status codes and RPC
//! status codes and a single seam for converting foreign errors into the
//! catalog.
//!
//! ## Overview
//!
//! Every failure that crosses a component boundary is a [`DomainError`]: a
//! stable machine-readable [`ErrorCode`], a human message, an optional
//! free-text detail, an optional wrapped cause, and optional string metadata.
//! Control flow branches on codes (via the family predicates), never on
//! message text. Catalog entries are plain values; call sites specialize them
//! with the `with_*` methods, which always return a new value carrying the
//! same code.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Result alias for operations that fail with taxonomy errors.
pub type DomainResult<T> = std::result::Result<T, DomainError>;

/// Machine-readable error code. The set is closed; every code maps to exactly
/// one HTTP status and one RPC status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Generic
    InternalError,
    ValidationFailed,
    NotFound,
    AlreadyExists,
    Forbidden,
    Unauthorized,
    BadRequest,
    Conflict,
    TooManyRequests,
    ServiceUnavailable,
    InvalidArgument,
    // User
    UserNotFound,
    UserAlreadyExists,
    UserInactive,
    UserLocked,
    InvalidCredentials,
    PasswordTooWeak,
    InsufficientPrivileges,
    TokenRevoked,
    TokenExpired,
    TokenInvalid,
    // Task
    TaskNotFound,
    CategoryNotFound,
    CommentNotFound,
    InvalidTaskStatus,
    InvalidPriority,
}

impl ErrorCode {
    /// Every code in the catalog, in declaration order.
    pub const ALL: [ErrorCode; 26] = [
        ErrorCode::InternalError,
        ErrorCode::ValidationFailed,
        ErrorCode::NotFound,
        ErrorCode::AlreadyExists,
        ErrorCode::Forbidden,
        ErrorCode::Unauthorized,
        ErrorCode::BadRequest,
        ErrorCode::Conflict,
        ErrorCode::TooManyRequests,
        ErrorCode::ServiceUnavailable,
        ErrorCode::InvalidArgument,
        ErrorCode::UserNotFound,
        ErrorCode::UserAlreadyExists,
        ErrorCode::UserInactive,
        ErrorCode::UserLocked,
        ErrorCode::InvalidCredentials,
        ErrorCode::PasswordTooWeak,
        ErrorCode::InsufficientPrivileges,
        ErrorCode::TokenRevoked,
        ErrorCode::TokenExpired,
        ErrorCode::TokenInvalid,
        ErrorCode::TaskNotFound,
        ErrorCode::CategoryNotFound,
        ErrorCode::CommentNotFound,
        ErrorCode::InvalidTaskStatus,
        ErrorCode::InvalidPriority,
    ];

    /// Stable wire identifier for this code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InternalError => "INTERNAL_ERROR",
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::AlreadyExists => "ALREADY_EXISTS",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::TooManyRequests => "TOO_MANY_REQUESTS",
            ErrorCode::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            ErrorCode::InvalidArgument => "INVALID_ARGUMENT",
            ErrorCode::UserNotFound => "USER_NOT_FOUND",
            ErrorCode::UserAlreadyExists => "USER_ALREADY_EXISTS",
            ErrorCode::UserInactive => "USER_INACTIVE",
            ErrorCode::UserLocked => "USER_LOCKED",
            ErrorCode::InvalidCredentials => "INVALID_CREDENTIALS",
            ErrorCode::PasswordTooWeak => "PASSWORD_TOO_WEAK",
            ErrorCode::InsufficientPrivileges => "INSUFFICIENT_PRIVILEGES",
            ErrorCode::TokenRevoked => "TOKEN_REVOKED",
            ErrorCode::TokenExpired => "TOKEN_EXPIRED",
            ErrorCode::TokenInvalid => "TOKEN_INVALID",
            ErrorCode::TaskNotFound => "TASK_NOT_FOUND",
            ErrorCode::CategoryNotFound => "CATEGORY_NOT_FOUND",
            ErrorCode::CommentNotFound => "COMMENT_NOT_FOUND",
            ErrorCode::InvalidTaskStatus => "INVALID_TASK_STATUS",
            ErrorCode::InvalidPriority => "INVALID_PRIORITY",
        }
    }

    /// Default catalog message for this code.
    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::InternalError => "internal server error",
            ErrorCode::ValidationFailed => "validation failed",
            ErrorCode::NotFound => "resource not found",
            ErrorCode::AlreadyExists => "resource already exists",
            ErrorCode::Forbidden => "access denied",
            ErrorCode::Unauthorized => "unauthorized",
            ErrorCode::BadRequest => "bad request",
            ErrorCode::Conflict => "conflict detected",
            ErrorCode::TooManyRequests => "too many requests",
            ErrorCode::ServiceUnavailable => "service temporarily unavailable",
            ErrorCode::InvalidArgument => "invalid argument",
            ErrorCode::UserNotFound => "user not found",
            ErrorCode::UserAlreadyExists => "user already exists",
            ErrorCode::UserInactive => "user is inactive",
            ErrorCode::UserLocked => "user account is locked",
            ErrorCode::InvalidCredentials => "invalid credentials",
            ErrorCode::PasswordTooWeak => "password does not meet requirements",
            ErrorCode::InsufficientPrivileges => "insufficient privileges",
            ErrorCode::TokenRevoked => "token has been revoked",
            ErrorCode::TokenExpired => "token has expired",
            ErrorCode::TokenInvalid => "invalid token",
            ErrorCode::TaskNotFound => "task not found",
            ErrorCode::CategoryNotFound => "category not found",
            ErrorCode::CommentNotFound => "comment not found",
            ErrorCode::InvalidTaskStatus => "invalid task status",
            ErrorCode::InvalidPriority => "invalid priority",
        }
    }

    /// True for the not-found family of codes.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ErrorCode::NotFound
                | ErrorCode::UserNotFound
                | ErrorCode::TaskNotFound
                | ErrorCode::CategoryNotFound
                | ErrorCode::CommentNotFound
        )
    }

    /// True for the authentication-failure family of codes.
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            ErrorCode::Unauthorized
                | ErrorCode::InvalidCredentials
                | ErrorCode::TokenRevoked
                | ErrorCode::TokenExpired
                | ErrorCode::TokenInvalid
        )
    }

    /// True for the permission-failure family of codes.
    pub fn is_forbidden(&self) -> bool {
        matches!(
            self,
            ErrorCode::Forbidden
                | ErrorCode::InsufficientPrivileges
                | ErrorCode::UserLocked
                | ErrorCode::UserInactive
        )
    }

    /// True for the validation family of codes.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ErrorCode::ValidationFailed
                | ErrorCode::BadRequest
                | ErrorCode::InvalidArgument
                | ErrorCode::InvalidTaskStatus
                | ErrorCode::InvalidPriority
                | ErrorCode::PasswordTooWeak
        )
    }

    /// HTTP status for this code. Total: codes outside the explicit families
    /// fall through to 500.
    pub fn http_status(&self) -> u16 {
        if self.is_validation() {
            return 400;
        }
        if self.is_unauthorized() {
            return 401;
        }
        if self.is_forbidden() {
            return 403;
        }
        if self.is_not_found() {
            return 404;
        }
        match self {
            ErrorCode::AlreadyExists | ErrorCode::UserAlreadyExists | ErrorCode::Conflict => 409,
            ErrorCode::TooManyRequests => 429,
            ErrorCode::ServiceUnavailable => 503,
            _ => 500,
        }
    }

    /// RPC status for this code. Total: codes outside the explicit families
    /// fall through to `Internal`.
    pub fn rpc_code(&self) -> tonic::Code {
        if self.is_validation() {
            return tonic::Code::InvalidArgument;
        }
        if self.is_unauthorized() {
            return tonic::Code::Unauthenticated;
        }
        if self.is_forbidden() {
            return tonic::Code::PermissionDenied;
        }
        if self.is_not_found() {
            return tonic::Code::NotFound;
        }
        match self {
            ErrorCode::AlreadyExists | ErrorCode::UserAlreadyExists | ErrorCode::Conflict => {
                tonic::Code::AlreadyExists
            }
            ErrorCode::TooManyRequests => tonic::Code::ResourceExhausted,
            ErrorCode::ServiceUnavailable => tonic::Code::Unavailable,
            _ => tonic::Code::Internal,
        }
    }

    /// Inverse mapping from an upstream RPC status code into the catalog.
    /// Unrecognized codes collapse to `InternalError`.
    pub fn from_rpc(code: tonic::Code) -> ErrorCode {
        match code {
            tonic::Code::InvalidArgument => ErrorCode::BadRequest,
            tonic::Code::Unauthenticated => ErrorCode::Unauthorized,
            tonic::Code::PermissionDenied => ErrorCode::Forbidden,
            tonic::Code::NotFound => ErrorCode::NotFound,
            tonic::Code::AlreadyExists => ErrorCode::AlreadyExists,
            tonic::Code::ResourceExhausted => ErrorCode::TooManyRequests,
            tonic::Code::Unavailable => ErrorCode::ServiceUnavailable,
            _ => ErrorCode::InternalError,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured application error.
///
/// Values are immutable once constructed; the `with_*` methods produce a new
/// value sharing the same code, so per-call-site specialization never
/// disturbs other holders of a catalog entry.
#[derive(Debug, Clone)]
pub struct DomainError {
    code: ErrorCode,
    message: Cow<'static, str>,
    detail: Option<String>,
    cause: Option<Arc<dyn std::error::Error + Send + Sync + 'static>>,
    metadata: Option<BTreeMap<String, String>>,
}

impl DomainError {
    /// Create an error with an explicit message.
    pub fn new(code: ErrorCode, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            code,
            message: message.into(),
            detail: None,
            cause: None,
            metadata: None,
        }
    }

    /// Create an error from the catalog with its default message.
    pub fn from_code(code: ErrorCode) -> Self {
        Self::new(code, code.default_message())
    }

    /// Create an error wrapping an underlying cause.
    pub fn wrap<E>(code: ErrorCode, cause: E, message: impl Into<Cow<'static, str>>) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        Self::new(code, message).with_cause(cause)
    }

    // Catalog entries. Each returns a fresh value carrying the default
    // message for its code.

    pub fn internal() -> Self {
        Self::from_code(ErrorCode::InternalError)
    }

    pub fn validation() -> Self {
        Self::from_code(ErrorCode::ValidationFailed)
    }

    pub fn not_found() -> Self {
        Self::from_code(ErrorCode::NotFound)
    }

    pub fn already_exists() -> Self {
        Self::from_code(ErrorCode::AlreadyExists)
    }

    pub fn forbidden() -> Self {
        Self::from_code(ErrorCode::Forbidden)
    }

    pub fn unauthorized() -> Self {
        Self::from_code(ErrorCode::Unauthorized)
    }

    pub fn bad_request() -> Self {
        Self::from_code(ErrorCode::BadRequest)
    }

    pub fn conflict() -> Self {
        Self::from_code(ErrorCode::Conflict)
    }

    pub fn too_many_requests() -> Self {
        Self::from_code(ErrorCode::TooManyRequests)
    }

    pub fn service_unavailable() -> Self {
        Self::from_code(ErrorCode::ServiceUnavailable)
    }

    pub fn invalid_argument() -> Self {
        Self::from_code(ErrorCode::InvalidArgument)
    }

    pub fn user_not_found() -> Self {
        Self::from_code(ErrorCode::UserNotFound)
    }

    pub fn user_already_exists() -> Self {
        Self::from_code(ErrorCode::UserAlreadyExists)
    }

    pub fn user_inactive() -> Self {
        Self::from_code(ErrorCode::UserInactive)
    }

    pub fn user_locked() -> Self {
        Self::from_code(ErrorCode::UserLocked)
    }

    pub fn invalid_credentials() -> Self {
        Self::from_code(ErrorCode::InvalidCredentials)
    }

    pub fn password_too_weak() -> Self {
        Self::from_code(ErrorCode::PasswordTooWeak)
    }

    pub fn insufficient_privileges() -> Self {
        Self::from_code(ErrorCode::InsufficientPrivileges)
    }

    pub fn token_revoked() -> Self {
        Self::from_code(ErrorCode::TokenRevoked)
    }

    pub fn token_expired() -> Self {
        Self::from_code(ErrorCode::TokenExpired)
    }

    pub fn token_invalid() -> Self {
        Self::from_code(ErrorCode::TokenInvalid)
    }

    pub fn task_not_found() -> Self {
        Self::from_code(ErrorCode::TaskNotFound)
    }

    pub fn category_not_found() -> Self {
        Self::from_code(ErrorCode::CategoryNotFound)
    }

    pub fn comment_not_found() -> Self {
        Self::from_code(ErrorCode::CommentNotFound)
    }

    pub fn invalid_task_status() -> Self {
        Self::from_code(ErrorCode::InvalidTaskStatus)
    }

    pub fn invalid_priority() -> Self {
        Self::from_code(ErrorCode::InvalidPriority)
    }

    /// Return a copy with a custom message. The code is unchanged.
    pub fn with_message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.message = message.into();
        self
    }

    /// Return a copy with additional free-text detail.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Return a copy wrapping an underlying cause.
    pub fn with_cause<E>(mut self, cause: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        self.cause = Some(Arc::from(cause.into()));
        self
    }

    /// Return a copy with one more metadata entry. Existing entries are kept.
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    pub fn metadata(&self) -> Option<&BTreeMap<String, String>> {
        self.metadata.as_ref()
    }

    pub fn cause(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// HTTP status for this error's code.
    pub fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    /// RPC status code for this error's code.
    pub fn rpc_code(&self) -> tonic::Code {
        self.code.rpc_code()
    }

    /// Check whether this error carries the given code. This, and the family
    /// predicates below, are how callers branch on error kind.
    pub fn is_code(&self, code: ErrorCode) -> bool {
        self.code == code
    }

    pub fn is_not_found(&self) -> bool {
        self.code.is_not_found()
    }

    pub fn is_unauthorized(&self) -> bool {
        self.code.is_unauthorized()
    }

    pub fn is_forbidden(&self) -> bool {
        self.code.is_forbidden()
    }

    pub fn is_validation(&self) -> bool {
        self.code.is_validation()
    }

    /// Convert any foreign error into the taxonomy.
    ///
    /// A `DomainError` passes through unchanged. An upstream RPC status is
    /// translated through the inverse code map with the original kept as the
    /// cause. Anything else collapses to an unclassified internal error.
    pub fn from_foreign(err: anyhow::Error) -> Self {
        let err = match err.downcast::<DomainError>() {
            Ok(domain) => return domain,
            Err(other) => other,
        };
        match err.downcast::<tonic::Status>() {
            Ok(status) => DomainError::from(status),
            Err(other) => DomainError::internal().with_cause(other),
        }
    }

    /// Render this error as an HTTP status line plus JSON envelope body.
    pub fn to_http(&self) -> (u16, HttpErrorBody) {
        (
            self.http_status(),
            HttpErrorBody {
                error: self.message.clone().into_owned(),
                code: self.code.as_str().to_string(),
                details: self.detail.clone(),
                meta: self.metadata.clone(),
            },
        )
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{}: {}", self.message, detail),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for DomainError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn std::error::Error + 'static))
    }
}

impl From<ErrorCode> for DomainError {
    fn from(code: ErrorCode) -> Self {
        DomainError::from_code(code)
    }
}

/// Translate an upstream RPC status into the local taxonomy, keeping the
/// status message and the status itself as the cause.
impl From<tonic::Status> for DomainError {
    fn from(status: tonic::Status) -> Self {
        let code = ErrorCode::from_rpc(status.code());
        let message = status.message().to_string();
        DomainError::new(code, message).with_cause(status)
    }
}

/// Produce an outbound RPC status: code from the mapping table, message equal
/// to the error's message (never its code string).
impl From<DomainError> for tonic::Status {
    fn from(err: DomainError) -> Self {
        tonic::Status::new(err.rpc_code(), err.message().to_string())
    }
}

/// JSON error envelope returned to REST callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpErrorBody {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<BTreeMap<String, String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_message_preserves_code() {
        for code in ErrorCode::ALL {
            let err = DomainError::from_code(code).with_message("overridden");
            assert!(err.is_code(code), "code changed for {code}");
            assert_eq!(err.message(), "overridden");
        }
    }

    #[test]
    fn test_with_detail_and_cause_preserve_code() {
        for code in ErrorCode::ALL {
            let err = DomainError::from_code(code)
                .with_detail("context")
                .with_cause(std::io::Error::other("boom"))
                .with_meta("k", "v");
            assert!(err.is_code(code));
        }
    }

    #[test]
    fn test_http_mapping_families() {
        assert_eq!(ErrorCode::ValidationFailed.http_status(), 400);
        assert_eq!(ErrorCode::InvalidTaskStatus.http_status(), 400);
        assert_eq!(ErrorCode::InvalidPriority.http_status(), 400);
        assert_eq!(ErrorCode::Unauthorized.http_status(), 401);
        assert_eq!(ErrorCode::TokenExpired.http_status(), 401);
        assert_eq!(ErrorCode::Forbidden.http_status(), 403);
        assert_eq!(ErrorCode::UserInactive.http_status(), 403);
        assert_eq!(ErrorCode::TaskNotFound.http_status(), 404);
        assert_eq!(ErrorCode::CommentNotFound.http_status(), 404);
        assert_eq!(ErrorCode::UserAlreadyExists.http_status(), 409);
        assert_eq!(ErrorCode::TooManyRequests.http_status(), 429);
        assert_eq!(ErrorCode::ServiceUnavailable.http_status(), 503);
        assert_eq!(ErrorCode::InternalError.http_status(), 500);
    }

    #[test]
    fn test_rpc_mapping_families() {
        assert_eq!(
            ErrorCode::ValidationFailed.rpc_code(),
            tonic::Code::InvalidArgument
        );
        assert_eq!(
            ErrorCode::Unauthorized.rpc_code(),
            tonic::Code::Unauthenticated
        );
        assert_eq!(
            ErrorCode::UserLocked.rpc_code(),
            tonic::Code::PermissionDenied
        );
        assert_eq!(ErrorCode::CategoryNotFound.rpc_code(), tonic::Code::NotFound);
        assert_eq!(ErrorCode::Conflict.rpc_code(), tonic::Code::AlreadyExists);
        assert_eq!(
            ErrorCode::TooManyRequests.rpc_code(),
            tonic::Code::ResourceExhausted
        );
        assert_eq!(
            ErrorCode::ServiceUnavailable.rpc_code(),
            tonic::Code::Unavailable
        );
        assert_eq!(ErrorCode::InternalError.rpc_code(), tonic::Code::Internal);
    }

    #[test]
    fn test_mappings_are_total() {
        for code in ErrorCode::ALL {
            let status = code.http_status();
            assert!((400..=599).contains(&status));
            // Round trip through the inverse map stays inside the catalog.
            let _ = ErrorCode::from_rpc(code.rpc_code());
        }
    }

    #[test]
    fn test_inverse_rpc_mapping() {
        assert_eq!(
            ErrorCode::from_rpc(tonic::Code::InvalidArgument),
            ErrorCode::BadRequest
        );
        assert_eq!(
            ErrorCode::from_rpc(tonic::Code::Unauthenticated),
            ErrorCode::Unauthorized
        );
        assert_eq!(
            ErrorCode::from_rpc(tonic::Code::PermissionDenied),
            ErrorCode::Forbidden
        );
        assert_eq!(ErrorCode::from_rpc(tonic::Code::NotFound), ErrorCode::NotFound);
        assert_eq!(
            ErrorCode::from_rpc(tonic::Code::AlreadyExists),
            ErrorCode::AlreadyExists
        );
        assert_eq!(
            ErrorCode::from_rpc(tonic::Code::ResourceExhausted),
            ErrorCode::TooManyRequests
        );
        assert_eq!(
            ErrorCode::from_rpc(tonic::Code::Unavailable),
            ErrorCode::ServiceUnavailable
        );
        assert_eq!(
            ErrorCode::from_rpc(tonic::Code::DataLoss),
            ErrorCode::InternalError
        );
        assert_eq!(
            ErrorCode::from_rpc(tonic::Code::Unknown),
            ErrorCode::InternalError
        );
    }

    #[test]
    fn test_display_with_and_without_detail() {
        let plain = DomainError::task_not_found();
        assert_eq!(plain.to_string(), "task not found");

        let detailed = DomainError::task_not_found().with_detail("id 42");
        assert_eq!(detailed.to_string(), "task not found: id 42");
    }

    #[test]
    fn test_family_predicates() {
        assert!(DomainError::task_not_found().is_not_found());
        assert!(DomainError::comment_not_found().is_not_found());
        assert!(!DomainError::forbidden().is_not_found());

        assert!(DomainError::token_expired().is_unauthorized());
        assert!(!DomainError::user_locked().is_unauthorized());

        assert!(DomainError::user_inactive().is_forbidden());
        assert!(DomainError::insufficient_privileges().is_forbidden());

        assert!(DomainError::invalid_task_status().is_validation());
        assert!(DomainError::password_too_weak().is_validation());
        assert!(!DomainError::internal().is_validation());
    }

    #[test]
    fn test_from_status_preserves_cause() {
        let status = tonic::Status::not_found("task 7 is gone");
        let err = DomainError::from(status);
        assert!(err.is_code(ErrorCode::NotFound));
        assert_eq!(err.message(), "task 7 is gone");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_into_status_uses_message_not_code() {
        let err = DomainError::invalid_priority().with_message("unsupported priority: urgent");
        let status: tonic::Status = err.into();
        assert_eq!(status.code(), tonic::Code::InvalidArgument);
        assert_eq!(status.message(), "unsupported priority: urgent");
    }

    #[test]
    fn test_from_foreign_passthrough() {
        let original = DomainError::category_not_found().with_detail("id 3");
        let converted = DomainError::from_foreign(anyhow::Error::new(original));
        assert!(converted.is_code(ErrorCode::CategoryNotFound));
        assert_eq!(converted.to_string(), "category not found: id 3");
    }

    #[test]
    fn test_from_foreign_rpc_status() {
        let status = tonic::Status::permission_denied("nope");
        let converted = DomainError::from_foreign(anyhow::Error::new(status));
        assert!(converted.is_code(ErrorCode::Forbidden));
        assert_eq!(converted.message(), "nope");
    }

    #[test]
    fn test_from_foreign_unclassified() {
        let io = std::io::Error::other("disk on fire");
        let converted = DomainError::from_foreign(anyhow::Error::new(io));
        assert!(converted.is_code(ErrorCode::InternalError));
        assert_eq!(converted.message(), "internal server error");
        assert!(std::error::Error::source(&converted).is_some());
    }

    #[test]
    fn test_with_meta_accumulates() {
        let err = DomainError::conflict()
            .with_meta("field", "title")
            .with_meta("attempt", "2");
        let meta = err.metadata().unwrap();
        assert_eq!(meta.get("field").map(String::as_str), Some("title"));
        assert_eq!(meta.get("attempt").map(String::as_str), Some("2"));
    }

    #[test]
    fn test_catalog_entries_are_independent() {
        let specialized = DomainError::task_not_found()
            .with_message("task 42 not found for user 7")
            .with_meta("task_id", "42");
        let fresh = DomainError::task_not_found();
        assert_eq!(fresh.message(), "task not found");
        assert!(fresh.metadata().is_none());
        assert!(specialized.is_code(fresh.code()));
    }

    #[test]
    fn test_http_envelope_shape() {
        let err = DomainError::validation()
            .with_message("title is required")
            .with_detail("create_task")
            .with_meta("field", "title");
        let (status, body) = err.to_http();
        assert_eq!(status, 400);

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["error"], "title is required");
        assert_eq!(json["code"], "VALIDATION_FAILED");
        assert_eq!(json["details"], "create_task");
        assert_eq!(json["meta"]["field"], "title");
    }

    #[test]
    fn test_http_envelope_omits_empty_fields() {
        let (_, body) = DomainError::internal().to_http();
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("details").is_none());
        assert!(json.get("meta").is_none());
    }

    #[test]
    fn test_code_serde_wire_strings() {
        let json = serde_json::to_string(&ErrorCode::TaskNotFound).unwrap();
        assert_eq!(json, "\"TASK_NOT_FOUND\"");
        let parsed: ErrorCode = serde_json::from_str("\"INVALID_TASK_STATUS\"").unwrap();
        assert_eq!(parsed, ErrorCode::InvalidTaskStatus);
    }
}
