/// Project-access tokens
///
/// A project-access token is a signed, self-contained credential binding one
/// user to one project for a limited time. It is issued when a member is
/// invited (the emailed link carries it) and accepted wherever task-service
/// calls authenticate, so its validity window and signature are the sole
/// source of truth for the `(user, project)` identity.
///
/// Tokens are HS256 JWTs with the payload
/// `{sub: userId, project: projectId, type: "projectAccess", iat, exp}`.
///
/// The service is pure and stateless: nothing is persisted and there is no
/// revocation list, so a leaked or replayed token remains valid until natural
/// expiry. That is an accepted tradeoff of the design, not a bug.
///
/// # Example
///
/// ```
/// use taskboard::auth::project_token::ProjectTokenService;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let service = ProjectTokenService::new("a-signing-secret-of-32-bytes-min!", 60);
///
/// let user_id = Uuid::new_v4();
/// let project_id = Uuid::new_v4();
///
/// let token = service.issue(user_id, project_id)?;
/// let access = service.verify(&token)?;
/// assert_eq!(access.user_id, user_id);
/// assert_eq!(access.project_id, project_id);
/// # Ok(())
/// # }
/// ```
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Type tag carried in every project-access token
const PROJECT_ACCESS_TYPE: &str = "projectAccess";

/// Error type for token operations
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// No token was supplied
    #[error("Token is required")]
    Missing,

    /// Token could not be decoded
    #[error("Invalid token: {0}")]
    Malformed(String),

    /// Signature did not verify
    #[error("Invalid token signature")]
    InvalidSignature,

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Payload carries a type tag other than the project-access kind
    #[error("Invalid token payload")]
    WrongType,

    /// Failed to sign a new token
    #[error("Failed to create token: {0}")]
    CreateError(String),
}

/// Claims embedded in a project-access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectClaims {
    /// Subject - user ID
    pub sub: Uuid,

    /// Project the token is scoped to
    pub project: Uuid,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Type tag, always "projectAccess"
    #[serde(rename = "type")]
    pub kind: String,
}

/// The identity a verified token resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectAccess {
    /// User the token was issued to
    pub user_id: Uuid,

    /// Project the token is scoped to
    pub project_id: Uuid,
}

/// Issues and verifies project-access tokens
#[derive(Debug, Clone)]
pub struct ProjectTokenService {
    secret: String,
    ttl_minutes: i64,
}

impl ProjectTokenService {
    /// Creates a token service with the given signing secret and default TTL
    pub fn new(secret: impl Into<String>, ttl_minutes: i64) -> Self {
        Self {
            secret: secret.into(),
            ttl_minutes,
        }
    }

    /// Issues a token for `(user_id, project_id)` with the configured TTL
    pub fn issue(&self, user_id: Uuid, project_id: Uuid) -> Result<String, TokenError> {
        self.issue_with_ttl(user_id, project_id, self.ttl_minutes)
    }

    /// Issues a token expiring `ttl_minutes` from now
    ///
    /// # Errors
    ///
    /// Returns `TokenError::CreateError` if signing fails
    pub fn issue_with_ttl(
        &self,
        user_id: Uuid,
        project_id: Uuid,
        ttl_minutes: i64,
    ) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = ProjectClaims {
            sub: user_id,
            project: project_id,
            iat: now.timestamp(),
            exp: (now + Duration::minutes(ttl_minutes)).timestamp(),
            kind: PROJECT_ACCESS_TYPE.to_string(),
        };

        let header = Header::new(Algorithm::HS256);
        let key = EncodingKey::from_secret(self.secret.as_bytes());

        encode(&header, &claims, &key)
            .map_err(|e| TokenError::CreateError(format!("Token encoding failed: {}", e)))
    }

    /// Verifies a token and resolves the `(user, project)` identity
    ///
    /// Accepts the raw header value: a `Bearer ` prefix is stripped when
    /// present, a bare token is accepted as-is.
    ///
    /// # Errors
    ///
    /// Fails with the matching [`TokenError`] when the token is missing,
    /// malformed, carries a bad signature, has expired, lacks the `project`
    /// claim, or has a type tag other than the project-access kind.
    pub fn verify(&self, raw: &str) -> Result<ProjectAccess, TokenError> {
        let token = strip_bearer(raw);
        if token.is_empty() {
            return Err(TokenError::Missing);
        }

        let key = DecodingKey::from_secret(self.secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        let data = decode::<ProjectClaims>(token, &key, &validation).map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
            jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            _ => TokenError::Malformed(e.to_string()),
        })?;

        // A well-signed token of any other kind is still not a project pass
        if data.claims.kind != PROJECT_ACCESS_TYPE {
            return Err(TokenError::WrongType);
        }

        Ok(ProjectAccess {
            user_id: data.claims.sub,
            project_id: data.claims.project,
        })
    }
}

/// Strips an optional bearer-style prefix from a header value
fn strip_bearer(raw: &str) -> &str {
    let trimmed = raw.trim();
    match trimmed.strip_prefix("Bearer ") {
        Some(rest) => rest.trim(),
        None => trimmed,
    }
}
