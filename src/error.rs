/// Core error taxonomy
///
/// Every engine operation returns `Result<T, CoreError>`. The variants map
/// 1:1 to the failure kinds the boundary layer turns into HTTP status codes:
/// NotFound (404), Forbidden (403), Conflict (409), InvalidAssignee (400),
/// Unauthorized (401), Internal (500). Failures are never swallowed; the only
/// local recovery is the idempotent re-use in membership activation, which
/// treats "already active" as success.
///
/// # Example
///
/// ```
/// use taskboard::error::CoreError;
///
/// let err = CoreError::Forbidden("not a member of this project".to_string());
/// assert_eq!(err.kind(), "forbidden");
/// ```
use serde::{Deserialize, Serialize};

use crate::auth::password::PasswordError;
use crate::auth::project_token::TokenError;
use crate::email::EmailError;
use crate::repo::RepoError;

/// Result type alias used across the engines
pub type CoreResult<T> = Result<T, CoreError>;

/// Unified core error type
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Entity absent
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller lacks the required role or membership
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Duplicate invite / duplicate membership
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Assignee is not an active member of the task's project
    ///
    /// Distinct from `Forbidden`, which is about the caller.
    #[error("Invalid assignee: {0}")]
    InvalidAssignee(String),

    /// Token missing, malformed, expired, or of the wrong type
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Unexpected store or collaborator failure
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Structured failure shape handed to the boundary layer
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Stable error code (e.g. "not_found", "forbidden")
    pub error: String,

    /// Human-readable message
    pub message: String,
}

impl CoreError {
    /// Stable error code for the boundary layer's status mapping
    pub fn kind(&self) -> &'static str {
        match self {
            CoreError::NotFound(_) => "not_found",
            CoreError::Forbidden(_) => "forbidden",
            CoreError::Conflict(_) => "conflict",
            CoreError::InvalidAssignee(_) => "invalid_assignee",
            CoreError::Unauthorized(_) => "unauthorized",
            CoreError::Internal(_) => "internal_error",
        }
    }

    /// Serializable failure body
    ///
    /// Internal errors are logged here and replaced with a generic message so
    /// store details never leak past the boundary.
    pub fn to_body(&self) -> ErrorBody {
        let message = match self {
            CoreError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        };

        ErrorBody {
            error: self.kind().to_string(),
            message,
        }
    }
}

/// Store failures are internal unless a variant says otherwise
impl From<RepoError> for CoreError {
    fn from(err: RepoError) -> Self {
        CoreError::Internal(err.to_string())
    }
}

/// Token failures all surface as Unauthorized
impl From<TokenError> for CoreError {
    fn from(err: TokenError) -> Self {
        CoreError::Unauthorized(err.to_string())
    }
}

impl From<PasswordError> for CoreError {
    fn from(err: PasswordError) -> Self {
        CoreError::Internal(format!("Password operation failed: {}", err))
    }
}

impl From<EmailError> for CoreError {
    fn from(err: EmailError) -> Self {
        CoreError::Internal(format!("Email delivery failed: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::NotFound("Task not found".to_string());
        assert_eq!(err.to_string(), "Not found: Task not found");

        let err = CoreError::InvalidAssignee("user is not an active member".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid assignee: user is not an active member"
        );
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(CoreError::NotFound(String::new()).kind(), "not_found");
        assert_eq!(CoreError::Forbidden(String::new()).kind(), "forbidden");
        assert_eq!(CoreError::Conflict(String::new()).kind(), "conflict");
        assert_eq!(
            CoreError::InvalidAssignee(String::new()).kind(),
            "invalid_assignee"
        );
        assert_eq!(
            CoreError::Unauthorized(String::new()).kind(),
            "unauthorized"
        );
        assert_eq!(CoreError::Internal(String::new()).kind(), "internal_error");
    }

    #[test]
    fn test_internal_body_is_generic() {
        let body = CoreError::Internal("connection reset by peer".to_string()).to_body();
        assert_eq!(body.error, "internal_error");
        assert_eq!(body.message, "An internal error occurred");
    }
}
