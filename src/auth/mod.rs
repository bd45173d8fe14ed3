/// Authentication primitives
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing, used by the join-completion flow
/// - [`project_token`]: Signed, time-bound, project-scoped access tokens
///
/// # Security
///
/// - **Password Hashing**: Argon2id with 64 MB memory, 3 iterations
/// - **Project Tokens**: HS256 signing with configurable expiry; stateless,
///   no revocation list — a leaked token stays valid until natural expiry
///   (accepted tradeoff, see `project_token`)
pub mod password;
pub mod project_token;
